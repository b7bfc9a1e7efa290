use crate::core::error::AppError;
use crate::features::auth::{AccountLookup, JwtValidator};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let provided = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok())
                .and_then(|header| header.strip_prefix("Basic "))
                .and_then(|encoded| BASE64_STANDARD.decode(encoded).ok())
                .and_then(|decoded| String::from_utf8(decoded).ok());

            if provided.as_deref() == Some(credentials.as_str()) {
                return Ok(next.run(req).await);
            }

            let mut response = Response::new(Body::from("Unauthorized"));
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"Swagger UI\""),
            );

            Err(response)
        })
    }
}

/// State for [`auth_middleware`]
#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<JwtValidator>,
    pub accounts: Arc<dyn AccountLookup>,
}

/// Validate the bearer token and attach the current [`AuthenticatedUser`]
/// to the request. Name and role come from the account, not the token.
///
/// [`AuthenticatedUser`]: crate::features::auth::model::AuthenticatedUser
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let claimed = state.validator.validate_token(token)?;

    let user = state
        .accounts
        .find_account(claimed.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = %claimed.user_id, "Token for a deleted account");
            AppError::Unauthorized("Account no longer exists".to_string())
        })?;

    if user.role != claimed.role {
        tracing::debug!(
            user_id = %user.user_id,
            token_role = %claimed.role,
            current_role = %user.role,
            "Role changed since token was issued"
        );
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result as AppResult;
    use crate::features::auth::guards::RequireAdmin;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::auth::services::TokenService;
    use crate::shared::test_helpers::create_user_with_role;
    use async_trait::async_trait;
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;
    use std::collections::HashMap;
    use std::time::Duration;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

    struct InMemoryAccounts(HashMap<Uuid, AuthenticatedUser>);

    #[async_trait]
    impl AccountLookup for InMemoryAccounts {
        async fn find_account(&self, user_id: Uuid) -> AppResult<Option<AuthenticatedUser>> {
            Ok(self.0.get(&user_id).cloned())
        }
    }

    async fn admin_only(RequireAdmin(user): RequireAdmin) -> String {
        user.role
    }

    async fn whoami(user: AuthenticatedUser) -> String {
        user.role
    }

    fn server(accounts: Vec<AuthenticatedUser>) -> TestServer {
        let state = AuthState {
            validator: Arc::new(JwtValidator::new(
                SECRET,
                "sdm-test".to_string(),
                Duration::from_secs(0),
            )),
            accounts: Arc::new(InMemoryAccounts(
                accounts.into_iter().map(|u| (u.user_id, u)).collect(),
            )),
        };

        let app = Router::new()
            .route("/admin", get(admin_only))
            .route("/whoami", get(whoami))
            .route_layer(from_fn_with_state(state, auth_middleware));

        TestServer::new(app).unwrap()
    }

    fn token_for(user: &AuthenticatedUser) -> String {
        TokenService::new(SECRET, "sdm-test".to_string(), 3600)
            .issue(user)
            .unwrap()
            .token
    }

    #[tokio::test]
    async fn test_current_role_is_used() {
        let admin = create_user_with_role("admin");
        let server = server(vec![admin.clone()]);

        server
            .get("/admin")
            .authorization_bearer(token_for(&admin))
            .await
            .assert_text("admin");
    }

    #[tokio::test]
    async fn test_demoted_admin_loses_access_with_old_token() {
        let admin = create_user_with_role("admin");
        let old_token = token_for(&admin);

        let demoted = AuthenticatedUser {
            role: "operator".to_string(),
            ..admin
        };
        let server = server(vec![demoted]);

        server
            .get("/admin")
            .authorization_bearer(&old_token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/whoami")
            .authorization_bearer(&old_token)
            .await
            .assert_text("operator");
    }

    #[tokio::test]
    async fn test_deleted_account_is_unauthorized() {
        let user = create_user_with_role("user");
        let server = server(vec![]);

        server
            .get("/whoami")
            .authorization_bearer(token_for(&user))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header() {
        let server = server(vec![create_user_with_role("admin")]);

        server
            .get("/whoami")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/whoami")
            .authorization("Token abc")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
