use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{Role, User};

/// Request DTO for creating an account
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub role_id: i32,
}

/// Request DTO for updating an account
///
/// Absent fields are left unchanged. An empty password also keeps the
/// current one.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,

    pub password: Option<String>,

    pub role_id: Option<i32>,
}

impl UpdateUserDto {
    /// The new password, if one was actually given
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    pub fn validate_password(&self) -> Result<(), String> {
        match self.new_password() {
            Some(p) if p.chars().count() < 6 => {
                Err("Password must be at least 6 characters".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Response DTO for an account; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role_id: i32,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role_id: u.role_id,
            role: u.role_name,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleResponseDto {
    pub id: i32,
    pub name: String,
}

impl From<Role> for RoleResponseDto {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::{Password, SafeEmail};
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn create_dto() -> CreateUserDto {
        CreateUserDto {
            name: "Operator Lombok Timur".to_string(),
            email: "operator.lotim@kemenag-ntb.test".to_string(),
            password: "rahasia".to_string(),
            role_id: 2,
        }
    }

    #[test]
    fn test_create_dto_valid() {
        assert!(create_dto().validate().is_ok());
    }

    #[test]
    fn test_create_dto_accepts_generated_accounts() {
        for _ in 0..20 {
            let dto = CreateUserDto {
                name: Name().fake(),
                email: SafeEmail().fake(),
                password: Password(6..32).fake(),
                role_id: 3,
            };
            assert!(dto.validate().is_ok(), "{:?}", dto.email);
        }
    }

    #[test]
    fn test_create_dto_rejects_bad_fields() {
        let mut dto = create_dto();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());

        let mut dto = create_dto();
        dto.password = "12345".to_string();
        assert!(dto.validate().is_err());

        let mut dto = create_dto();
        dto.name = String::new();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_empty_password_is_ignored() {
        let dto = UpdateUserDto {
            password: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(dto.new_password(), None);
        assert!(dto.validate_password().is_ok());
    }

    #[test]
    fn test_update_dto_short_password_is_rejected() {
        let dto = UpdateUserDto {
            password: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(dto.new_password(), Some("abc"));
        assert!(dto.validate_password().is_err());
    }

    #[test]
    fn test_response_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::nil(),
            name: "Admin".to_string(),
            email: "admin@kemenag-ntb.test".to_string(),
            password_hash: "v1$00$00".to_string(),
            role_id: 1,
            role_name: "admin".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserResponseDto::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
