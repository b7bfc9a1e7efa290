use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, AuthUserDto, LoginRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::token_service::TokenService;
use crate::features::users::models::User;
use crate::features::users::UserService;
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Service for authentication operations (login, refresh)
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_service,
            token_service,
        }
    }

    /// Login with email or name and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .user_service
            .find_by_identifier(dto.identifier.trim())
            .await?;

        let verified = match &user {
            Some(u) => {
                self.user_service
                    .hasher()
                    .verify_blocking(dto.password.clone(), u.password_hash.clone())
                    .await
            }
            None => false,
        };

        // Same error for unknown account and wrong password
        let user = match user {
            Some(u) if verified => u,
            _ => {
                tracing::warn!(identifier = %dto.identifier, "Failed login attempt");
                return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
            }
        };

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue_for(&user)
    }

    /// Get the current account, re-read from the database
    pub async fn me(&self, user: &AuthenticatedUser) -> Result<AuthUserDto> {
        let account = self.current_account(user).await?;
        Ok(account.to_authenticated().into())
    }

    /// Issue a fresh token for the current account
    ///
    /// Role and name changes made since the last token take effect here.
    pub async fn refresh(&self, user: &AuthenticatedUser) -> Result<AuthResponseDto> {
        let account = self.current_account(user).await?;
        self.issue_for(&account)
    }

    async fn current_account(&self, user: &AuthenticatedUser) -> Result<User> {
        self.user_service
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))
    }

    fn issue_for(&self, user: &User) -> Result<AuthResponseDto> {
        let authenticated = user.to_authenticated();
        let issued = self.token_service.issue(&authenticated)?;

        Ok(AuthResponseDto {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            user: authenticated.into(),
        })
    }
}
