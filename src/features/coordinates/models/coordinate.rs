use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for an induk unit coordinate
#[derive(Debug, Clone, FromRow)]
pub struct Coordinate {
    pub id: Uuid,
    pub induk_unit: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
