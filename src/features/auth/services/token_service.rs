use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, TokenClaims};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Issues HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    issuer: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, issuer: String, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            issuer,
            ttl_secs,
        }
    }

    pub fn issue(&self, user: &AuthenticatedUser) -> Result<IssuedToken> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user.user_id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to sign access token: {:?}", e);
                AppError::Internal(format!("Failed to sign access token: {}", e))
            })?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_secs,
        })
    }
}
