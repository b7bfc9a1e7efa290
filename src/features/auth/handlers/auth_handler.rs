use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{AuthResponseDto, AuthUserDto, LoginRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

/// Login with email or name and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth_response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(auth_response),
        Some("Login successful".to_string()),
        None,
    )))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<AuthUserDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<AuthUserDto>>> {
    let me = service.me(&user).await?;
    Ok(Json(ApiResponse::success(Some(me), None, None)))
}

/// Issue a fresh access token for the current user
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Token refreshed", body = ApiResponse<AuthResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn refresh(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    let auth_response = service.refresh(&user).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

#[cfg(test)]
mod tests {
    use crate::core::middleware::{auth_middleware, AuthState};
    use crate::features::auth::services::{AuthService, TokenService};
    use crate::features::auth::{routes, JwtValidator, PasswordHasher};
    use crate::features::users::UserService;
    use crate::shared::test_helpers::lazy_pool;
    use axum::{http::StatusCode, middleware::from_fn_with_state, Router};
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

    fn server() -> TestServer {
        let users = Arc::new(UserService::new(lazy_pool(), PasswordHasher::new("pepper")));
        let tokens = Arc::new(TokenService::new(SECRET, "sdm-test".to_string(), 3600));
        let service = Arc::new(AuthService::new(users.clone(), tokens));
        let state = AuthState {
            validator: Arc::new(JwtValidator::new(
                SECRET,
                "sdm-test".to_string(),
                Duration::from_secs(0),
            )),
            accounts: users,
        };

        let app = Router::new()
            .merge(routes::public_routes(service.clone()))
            .merge(
                routes::protected_routes(service)
                    .route_layer(from_fn_with_state(state, auth_middleware)),
            );

        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_login_requires_identifier_and_password() {
        server()
            .post("/api/auth/login")
            .json(&json!({ "identifier": "", "password": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_json() {
        server()
            .post("/api/auth/login")
            .json(&json!({ "identifier": "admin" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_requires_bearer_token() {
        let server = server();

        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/api/auth/me")
            .authorization("Basic Zm9vOmJhcg==")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .post("/api/auth/refresh")
            .authorization_bearer("not-a-jwt")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
