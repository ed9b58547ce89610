/// Application state and router builder
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/                          # Authenticated (bearer token)
///     ├── POST   /items             # Create item (may start a search)
///     ├── GET    /items/:id         # Item with tags, or null
///     ├── PATCH  /items/:id         # Sparse update
///     ├── DELETE /items/:id         # Creator-only delete
///     ├── PUT    /items/:id/tags    # Full tag replacement
///     ├── GET    /todos             # Dated items, by completion state
///     ├── GET    /notes             # Undated items
///     ├── POST   /tags              # Create-or-get tag by name
///     └── GET    /tags              # All tags (autocomplete)
/// ```
///
/// # Middleware stack
///
/// Applied bottom to top: request tracing (tower-http TraceLayer), CORS,
/// then bearer-token auth on the /v1 subtree only.

use crate::config::Config;
use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use jotdeck_shared::auth::middleware::{identity_auth, AuthState};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into each handler via Axum's `State` extractor; cheap because
/// the pool is internally reference-counted and the config is in an Arc.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth = AuthState::new(
        state.db.clone(),
        state.config.identity.token_secret.clone(),
    );

    let api_routes = Router::new()
        .route("/items", post(routes::items::create::create_item))
        .route("/items/:id", get(routes::items::get::get_item))
        .route("/items/:id", patch(routes::items::update::update_item))
        .route("/items/:id", delete(routes::items::remove::remove_item))
        .route(
            "/items/:id/tags",
            put(routes::items::replace_tags::replace_item_tags),
        )
        .route("/todos", get(routes::items::list_todos::list_todos))
        .route("/notes", get(routes::items::list_notes::list_notes))
        .route("/tags", post(routes::tags::create_or_get_tag))
        .route("/tags", get(routes::tags::list_tags))
        .layer(middleware::from_fn_with_state(auth, identity_auth));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
