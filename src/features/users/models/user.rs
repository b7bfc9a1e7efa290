use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;

/// Database model for a portal account, joined with its role name
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
    pub role_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn to_authenticated(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role_name.clone(),
        }
    }
}
