/// Common test utilities for integration tests
///
/// Shared infrastructure for the HTTP-level tests:
/// - Test database setup and migration
/// - Test user creation and identity token minting
/// - Request helpers against the in-process router
///
/// Requires a running PostgreSQL database; set `DATABASE_URL` and
/// `IDENTITY_TOKEN_SECRET` before running.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use jotdeck_api::app::{build_router, AppState};
use jotdeck_api::config::Config;
use jotdeck_shared::auth::claims::IdentityClaims;
use jotdeck_shared::models::user::User;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Migrations path is relative to Cargo.toml, not this file
        sqlx::migrate!("../jotdeck-shared/migrations").run(&db).await?;

        let subject = format!("idp|test-{}", Uuid::new_v4());
        let user = User::find_or_create(
            &db,
            &subject,
            "Test User",
            &format!("test-{}@example.com", Uuid::new_v4()),
        )
        .await?;

        let token = mint_token(&config.identity.token_secret, &subject, "Test User")?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            token,
        })
    }

    /// Returns authorization header value for the context's user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Creates an additional user with its own bearer token
    pub async fn other_user(&self) -> anyhow::Result<(User, String)> {
        let subject = format!("idp|test-{}", Uuid::new_v4());
        let user = User::find_or_create(
            &self.db,
            &subject,
            "Other User",
            &format!("other-{}@example.com", Uuid::new_v4()),
        )
        .await?;

        let token = mint_token(&self.config.identity.token_secret, &subject, "Other User")?;
        Ok((user, format!("Bearer {token}")))
    }

    /// Deletes everything the context's users created
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // item_tags rows go with the items via ON DELETE CASCADE
        sqlx::query(
            "DELETE FROM items WHERE creator_id IN
                 (SELECT id FROM users WHERE subject LIKE 'idp|test-%')",
        )
        .execute(&self.db)
        .await?;

        sqlx::query("DELETE FROM users WHERE subject LIKE 'idp|test-%'")
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Signs an identity token the way the external provider would
pub fn mint_token(secret: &str, subject: &str, name: &str) -> anyhow::Result<String> {
    let claims = IdentityClaims::new(subject, Some(name), None);
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Sends a request through the in-process router
pub async fn send(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Creates an item via the API and returns its id
pub async fn create_test_item(
    ctx: &TestContext,
    auth: &str,
    body: serde_json::Value,
) -> anyhow::Result<Uuid> {
    let (status, json) = send(ctx, "POST", "/v1/items", Some(auth), Some(body)).await;
    anyhow::ensure!(
        status == StatusCode::CREATED,
        "expected 201 Created, got {status}: {json}"
    );

    let id = json["id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("missing id in create response: {json}"))?;
    Ok(Uuid::parse_str(id)?)
}

/// Polls a condition until it holds or the timeout elapses
pub async fn wait_for<F, Fut>(mut condition: F, timeout_secs: u64) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(timeout_secs);
    loop {
        if condition().await {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            anyhow::bail!("condition not met within {timeout_secs}s");
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }
}
