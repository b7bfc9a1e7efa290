use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for role
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
