use super::model::{AuthenticatedUser, TokenClaims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::time::Duration;
use uuid::Uuid;

pub struct JwtValidator {
    decoding_key: DecodingKey,
    issuer: String,
    leeway: u64,
}

impl JwtValidator {
    pub fn new(secret: &str, issuer: String, leeway: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            leeway: leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Invalid subject in token".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::services::TokenService;
    use crate::shared::test_helpers::create_user_with_role;
    use tokio_test::{assert_err, assert_ok};

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

    fn token_service(ttl_secs: i64) -> TokenService {
        TokenService::new(SECRET, "sdm-test".to_string(), ttl_secs)
    }

    #[test]
    fn test_issued_token_validates() {
        let user = create_user_with_role("operator");
        let issued = assert_ok!(token_service(3600).issue(&user));

        let validator = JwtValidator::new(SECRET, "sdm-test".to_string(), Duration::from_secs(0));
        let decoded = assert_ok!(validator.validate_token(&issued.token));

        assert_eq!(decoded.user_id, user.user_id);
        assert_eq!(decoded.email, user.email);
        assert_eq!(decoded.role, "operator");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let user = create_user_with_role("admin");
        let issued = assert_ok!(token_service(3600).issue(&user));

        let validator = JwtValidator::new(
            "another-secret-that-is-also-32-bytes-long",
            "sdm-test".to_string(),
            Duration::from_secs(0),
        );
        assert_err!(validator.validate_token(&issued.token));
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let user = create_user_with_role("admin");
        let issued = assert_ok!(token_service(3600).issue(&user));

        let validator = JwtValidator::new(SECRET, "someone-else".to_string(), Duration::from_secs(0));
        assert_err!(validator.validate_token(&issued.token));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let user = create_user_with_role("user");
        let issued = assert_ok!(token_service(-120).issue(&user));

        let validator = JwtValidator::new(SECRET, "sdm-test".to_string(), Duration::from_secs(0));
        assert_err!(validator.validate_token(&issued.token));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let validator = JwtValidator::new(SECRET, "sdm-test".to_string(), Duration::from_secs(60));
        assert_err!(validator.validate_token("not-a-jwt"));
    }
}
