use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::config::BootstrapAdminConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::{AccountLookup, PasswordHasher};
use crate::features::users::dtos::{CreateUserDto, RoleResponseDto, UpdateUserDto, UserResponseDto};
use crate::features::users::models::{Role, User};
use crate::shared::constants::ROLE_ADMIN;

const USER_SELECT: &str = r#"
    SELECT u.id, u.name, u.email, u.password_hash, u.role_id, r.name AS role_name,
           u.created_at, u.updated_at
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

const EMAIL_TAKEN: &str = "Email is already registered";

/// Service for account and role operations
pub struct UserService {
    pool: PgPool,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(pool: PgPool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// List all accounts ordered by name
    pub async fn list(&self) -> Result<Vec<UserResponseDto>> {
        let users = sqlx::query_as::<_, User>(&format!("{} ORDER BY u.name", USER_SELECT))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    pub async fn list_roles(&self) -> Result<Vec<RoleResponseDto>> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list roles: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(roles.into_iter().map(|r| r.into()).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("{} WHERE u.id = $1", USER_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user by id: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Look up an account by exact email or case-insensitive name.
    ///
    /// An email match wins over a name match.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "{} WHERE u.email = $1 OR LOWER(u.name) = LOWER($1)
             ORDER BY (u.email = $1) DESC, u.created_at
             LIMIT 1",
            USER_SELECT
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by identifier: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn create(&self, dto: CreateUserDto) -> Result<UserResponseDto> {
        self.ensure_role_exists(dto.role_id).await?;

        let password_hash = self.hasher.hash_blocking(dto.password.clone()).await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (name, email, password_hash, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(dto.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::from_db(e, EMAIL_TAKEN)
        })?;

        tracing::info!(user_id = %id, email = %dto.email, "User created");

        self.get(id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateUserDto) -> Result<UserResponseDto> {
        if let Some(role_id) = dto.role_id {
            self.ensure_role_exists(role_id).await?;
        }

        let password_hash = match dto.new_password() {
            Some(p) => Some(self.hasher.hash_blocking(p.to_string()).await?),
            None => None,
        };

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                role_id = COALESCE($5, role_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(dto.role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user: {:?}", e);
            AppError::from_db(e, EMAIL_TAKEN)
        })?;

        match updated {
            Some(id) => self.get(id).await,
            None => Err(AppError::NotFound(format!("User {} not found", id))),
        }
    }

    /// Delete an account. `current_user` cannot delete itself.
    pub async fn delete(&self, id: Uuid, current_user: Uuid) -> Result<()> {
        if id == current_user {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete user: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Create the configured admin account when its email is not taken yet
    pub async fn ensure_bootstrap_admin(&self, config: &BootstrapAdminConfig) -> Result<()> {
        let password_hash = self.hasher.hash_blocking(config.password.clone()).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role_id)
            SELECT $1, $2, $3, r.id FROM roles r WHERE r.name = $4
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(&config.name)
        .bind(&config.email)
        .bind(&password_hash)
        .bind(ROLE_ADMIN)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to bootstrap admin account: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() > 0 {
            tracing::info!(email = %config.email, "Bootstrap admin account created");
        } else {
            tracing::debug!(email = %config.email, "Bootstrap admin account already exists");
        }

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<UserResponseDto> {
        self.find_by_id(id)
            .await?
            .map(|u| u.into())
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn ensure_role_exists(&self, role_id: i32) -> Result<()> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE id = $1)")
            .bind(role_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check role: {:?}", e);
                AppError::Database(e)
            })?;

        if !exists {
            return Err(AppError::BadRequest(format!("Role {} does not exist", role_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountLookup for UserService {
    async fn find_account(&self, user_id: Uuid) -> Result<Option<AuthenticatedUser>> {
        Ok(self.find_by_id(user_id).await?.map(|u| u.to_authenticated()))
    }
}
