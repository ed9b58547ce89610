/// Search workflow orchestrator
///
/// Runs the Searching → {Completed, Failed} half of the search state
/// machine. The API's create call performs the one-time Idle → Searching
/// transition and returns immediately; this loop picks the item up later,
/// queries the provider with the item's title, and writes exactly one
/// terminal state back:
///
/// - success: `note = result markdown, is_searching = false,
///   has_unseen_results = true`
/// - failure: `note = "Error performing search. Please try again.",
///   is_searching = false, has_unseen_results = false`
///
/// The distinction matters downstream: `has_unseen_results` stays false on
/// failure so the UI does not badge an error note as a fresh result. A
/// provider failure never propagates anywhere else; by the time it occurs
/// the triggering request has long since returned.
///
/// There is no cancellation and no retry: once claimed, a search always
/// terminates in one of the two writes, and a failed search stays failed
/// until the user creates a new item.

use jotdeck_shared::models::item::{Item, UpdateItem};
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::provider::SearchProvider;
use crate::queue::SearchQueue;

/// User-visible body written when a search fails
pub const SEARCH_FAILED_NOTE: &str = "Error performing search. Please try again.";

/// Orchestrator tuning
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Seconds between queue polls when idle
    pub poll_interval_secs: u64,

    /// Maximum searches in flight at once
    pub max_concurrent_searches: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
            max_concurrent_searches: 8,
        }
    }
}

/// Drives claimed searches to their terminal state
pub struct SearchOrchestrator {
    db: PgPool,
    queue: SearchQueue,
    provider: Arc<dyn SearchProvider>,
    config: OrchestratorConfig,
    shutdown_token: CancellationToken,
}

impl SearchOrchestrator {
    /// Creates an orchestrator with default configuration
    pub fn new(db: PgPool, queue: SearchQueue, provider: Arc<dyn SearchProvider>) -> Self {
        Self::with_config(db, queue, provider, OrchestratorConfig::default())
    }

    /// Creates an orchestrator with explicit configuration
    pub fn with_config(
        db: PgPool,
        queue: SearchQueue,
        provider: Arc<dyn SearchProvider>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            db,
            queue,
            provider,
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Token that stops the loop after in-flight searches finish
    ///
    /// Shutdown is graceful by construction: claimed searches keep running
    /// until they write a terminal state, honoring the no-abandonment rule.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the poll-claim-dispatch loop until shutdown
    ///
    /// # Errors
    ///
    /// Never returns an error during steady-state operation; claim failures
    /// are logged and retried on the next poll.
    pub async fn run(&self) -> anyhow::Result<()> {
        info!(provider = self.provider.name(), "Search orchestrator starting");

        // Searches currently in flight in this process; completion is
        // reported back over a channel so the loop never double-claims a
        // row it is already working on.
        let mut in_flight: HashSet<Uuid> = HashSet::new();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Uuid>();

        loop {
            while let Ok(done_id) = done_rx.try_recv() {
                in_flight.remove(&done_id);
            }

            if self.shutdown_token.is_cancelled() {
                info!(
                    in_flight = in_flight.len(),
                    "Shutdown requested, draining in-flight searches"
                );
                while !in_flight.is_empty() {
                    if let Some(done_id) = done_rx.recv().await {
                        in_flight.remove(&done_id);
                    } else {
                        break;
                    }
                }
                info!("Search orchestrator shut down");
                return Ok(());
            }

            let slots = self
                .config
                .max_concurrent_searches
                .saturating_sub(in_flight.len());
            if slots == 0 {
                sleep(Duration::from_millis(100)).await;
                continue;
            }

            let items = match self.queue.claim(Some(slots)).await {
                Ok(items) => items,
                Err(e) => {
                    error!(error = %e, "Failed to claim pending searches");
                    sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
                    continue;
                }
            };

            if items.is_empty() {
                sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
                continue;
            }

            for item in items {
                if !in_flight.insert(item.id) {
                    continue;
                }

                let db = self.db.clone();
                let provider = self.provider.clone();
                let done_tx = done_tx.clone();

                tokio::spawn(async move {
                    let item_id = item.id;
                    execute_search(&db, provider.as_ref(), item).await;
                    let _ = done_tx.send(item_id);
                });
            }
        }
    }
}

/// Runs one claimed search to its terminal state
///
/// Queries the provider with the item's title and writes back success or
/// failure. The write targets exactly the claimed item and runs without a
/// user auth context: it is a system-initiated follow-up to the creation
/// the user already authorized.
pub async fn execute_search(db: &PgPool, provider: &dyn SearchProvider, item: Item) {
    info!(item_id = %item.id, "Executing search");

    let update = match provider.search(&item.title).await {
        Ok(result) => {
            info!(item_id = %item.id, citations = result.citations.len(), "Search succeeded");
            UpdateItem {
                note: Some(result.to_markdown()),
                is_searching: Some(Some(false)),
                has_unseen_results: Some(Some(true)),
                ..Default::default()
            }
        }
        Err(e) => {
            warn!(item_id = %item.id, error = %e, "Search failed");
            UpdateItem {
                note: Some(SEARCH_FAILED_NOTE.to_string()),
                is_searching: Some(Some(false)),
                has_unseen_results: Some(Some(false)),
                ..Default::default()
            }
        }
    };

    match Item::update(db, item.id, update).await {
        Ok(Some(_)) => {}
        // The item was deleted while the search was in flight; the result
        // has nowhere to land, which is fine.
        Ok(None) => warn!(item_id = %item.id, "Item vanished before search write-back"),
        Err(e) => error!(item_id = %item.id, error = %e, "Search write-back failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_note_text() {
        // The exact string is user-visible contract, rendered as item content
        assert_eq!(SEARCH_FAILED_NOTE, "Error performing search. Please try again.");
    }

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.max_concurrent_searches, 8);
    }
}
