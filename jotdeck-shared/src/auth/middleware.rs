/// Authentication middleware for Axum
///
/// Extracts the identity provider's bearer token from the Authorization
/// header, validates it, resolves the identity to an internal user
/// (creating one on first sight), and inserts a `CurrentUser` extension for
/// handlers to consume. Identity threading is explicit: every handler takes
/// the resolved user from the request rather than reading ambient state.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use jotdeck_shared::auth::middleware::{identity_auth, AuthState, CurrentUser};
/// use sqlx::PgPool;
///
/// async fn whoami(Extension(CurrentUser(user)): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.name)
/// }
///
/// # fn example(pool: PgPool) {
/// let auth = AuthState::new(pool, "identity-token-secret".to_string());
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn_with_state(auth, identity_auth));
/// # }
/// ```

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use tracing::{debug, warn};

use super::claims::validate_identity_token;
use crate::models::user::User;

/// State the middleware needs: a pool to resolve users and the token secret
#[derive(Clone)]
pub struct AuthState {
    /// Database pool for user resolution
    pub pool: PgPool,

    /// Shared secret the identity provider signs tokens with
    pub token_secret: String,
}

impl AuthState {
    /// Creates middleware state
    pub fn new(pool: PgPool, token_secret: String) -> Self {
        Self { pool, token_secret }
    }
}

/// Resolved user for the current request
///
/// Inserted into request extensions after successful authentication.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Bearer-token authentication middleware
///
/// Rejects with 401 when the Authorization header is missing, malformed,
/// or carries an invalid/expired token. On success the request proceeds
/// with a `CurrentUser` extension attached.
pub async fn identity_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(token) => token,
        None => {
            debug!("Request without bearer token");
            return unauthenticated("Missing bearer token");
        }
    };

    let claims = match validate_identity_token(token, &state.token_secret) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Token rejected: {}", e);
            return unauthenticated(&e.to_string());
        }
    };

    // Lazy user creation: first authenticated call mints the user record
    let user = match User::find_or_create(
        &state.pool,
        &claims.sub,
        claims.display_name(),
        claims.email_or_empty(),
    )
    .await
    {
        Ok(user) => user,
        Err(e) => {
            warn!("User resolution failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An internal error occurred",
                })),
            )
                .into_response();
        }
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

/// Pulls the token out of `Authorization: Bearer <token>`
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthenticated(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthenticated",
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extraction() {
        let req = request_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&req), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_or_malformed_header() {
        assert_eq!(bearer_token(&request_with_auth(None)), None);
        assert_eq!(bearer_token(&request_with_auth(Some("Basic xyz"))), None);
        assert_eq!(bearer_token(&request_with_auth(Some("bearer abc"))), None);
    }
}
