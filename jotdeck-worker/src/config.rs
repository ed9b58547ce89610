/// Configuration for the search worker
///
/// Loaded from environment variables:
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `PERPLEXITY_API_KEY`: search API credential (optional; searches fail
///   with the user-visible error note when absent)
/// - `WORKER_POLL_INTERVAL_S`: queue poll interval (default 2)
/// - `WORKER_MAX_CONCURRENT`: concurrent searches (default 8)
/// - `WORKER_BATCH_SIZE`: claims per poll (default 10)
/// - `JOTDECK_SEARCH_CLAIM_TIMEOUT_S`: stale-claim redelivery window
///   (default 300)
/// - `SEARCH_REQUEST_TIMEOUT_S`: per-request upstream timeout (default 60)

use std::env;
use std::time::Duration;

/// Worker configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Search API credential, if configured
    pub perplexity_api_key: Option<String>,

    /// Seconds between queue polls when idle
    pub poll_interval_secs: u64,

    /// Maximum concurrent searches
    pub max_concurrent: usize,

    /// Items claimed per poll
    pub batch_size: usize,

    /// Stale-claim redelivery window in seconds
    pub claim_timeout_secs: u64,

    /// Upstream request timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric variable
    /// fails to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let perplexity_api_key = env::var("PERPLEXITY_API_KEY").ok();

        let poll_interval_secs = env::var("WORKER_POLL_INTERVAL_S")
            .unwrap_or_else(|_| "2".to_string())
            .parse::<u64>()?;

        let max_concurrent = env::var("WORKER_MAX_CONCURRENT")
            .unwrap_or_else(|_| "8".to_string())
            .parse::<usize>()?;

        let batch_size = env::var("WORKER_BATCH_SIZE")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<usize>()?;

        let claim_timeout_secs = env::var("JOTDECK_SEARCH_CLAIM_TIMEOUT_S")
            .unwrap_or_else(|_| "300".to_string())
            .parse::<u64>()?;

        let request_timeout_secs = env::var("SEARCH_REQUEST_TIMEOUT_S")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()?;

        Ok(Self {
            database_url,
            perplexity_api_key,
            poll_interval_secs,
            max_concurrent,
            batch_size,
            claim_timeout_secs,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}
