/// Database migration runner
///
/// Migrations live in `jotdeck-shared/migrations/` and are embedded into the
/// binary at compile time via `sqlx::migrate!`. Both the API and the worker
/// call `run_migrations` on startup, so whichever process boots first brings
/// the schema up to date.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending migrations
///
/// # Errors
///
/// Returns an error if a migration file fails to apply; applied migrations
/// are not rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
