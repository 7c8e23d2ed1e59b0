use sqlx::migrate::Migrator;
use sqlx::{Connection, PgConnection};
use url::Url;

use crate::error::AppError;

/// Scripts under `migrations/`, embedded at compile time and applied in
/// ascending version (file name) order.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedMigration {
    pub version: i64,
    pub description: String,
}

/// The migrations compiled into this binary.
pub fn embedded() -> Vec<EmbeddedMigration> {
    MIGRATOR
        .iter()
        .map(|m| EmbeddedMigration {
            version: m.version,
            description: m.description.to_string(),
        })
        .collect()
}

/// Apply every pending migration to the PostgreSQL database at `database_url`.
///
/// Opens a single connection, which is closed again before returning whether
/// or not the migrations succeed. Applied versions are tracked in
/// `_sqlx_migrations`; concurrent runners serialize on an advisory lock.
pub async fn run(database_url: &str) -> Result<(), AppError> {
    check_dialect(database_url)?;

    tracing::debug!(embedded = MIGRATOR.iter().count(), "Running database migrations");

    let mut conn = PgConnection::connect(database_url)
        .await
        .map_err(|e| AppError::Connection(e.to_string()))?;

    let result = MIGRATOR.run(&mut conn).await;

    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "Failed to close migration connection");
    }

    result.map_err(|e| AppError::Migration(e.to_string()))?;

    tracing::info!("Database migrations complete");
    Ok(())
}

/// Only PostgreSQL connection strings are accepted.
fn check_dialect(database_url: &str) -> Result<(), AppError> {
    let url = Url::parse(database_url)
        .map_err(|e| AppError::Connection(format!("invalid database URL: {e}")))?;
    match url.scheme() {
        "postgres" | "postgresql" => Ok(()),
        other => Err(AppError::Dialect(format!(
            "unsupported database scheme '{other}', expected postgres"
        ))),
    }
}
