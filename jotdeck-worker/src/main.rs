//! # Jotdeck Search Worker
//!
//! Background process completing the search workflow: polls for items
//! created with a search request, queries the external search API with the
//! item's title, and writes the result (or the failure note) back into the
//! item.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p jotdeck-worker
//! ```

use jotdeck_shared::db::migrations::run_migrations;
use jotdeck_shared::db::pool::{create_pool, DatabaseConfig};
use jotdeck_worker::config::Config;
use jotdeck_worker::orchestrator::{OrchestratorConfig, SearchOrchestrator};
use jotdeck_worker::provider::PerplexityProvider;
use jotdeck_worker::queue::SearchQueue;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jotdeck_worker=debug,jotdeck_shared=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Jotdeck worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database_url.clone(),
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    if config.perplexity_api_key.is_none() {
        tracing::warn!("PERPLEXITY_API_KEY not set; all searches will fail");
    }

    let provider = Arc::new(PerplexityProvider::new(
        config.perplexity_api_key.clone(),
        config.request_timeout,
    ));

    let queue = SearchQueue::with_config(
        pool.clone(),
        config.batch_size,
        config.claim_timeout_secs,
    );

    let orchestrator = SearchOrchestrator::with_config(
        pool,
        queue,
        provider,
        OrchestratorConfig {
            poll_interval_secs: config.poll_interval_secs,
            max_concurrent_searches: config.max_concurrent,
        },
    );

    let shutdown = orchestrator.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    orchestrator.run().await
}
