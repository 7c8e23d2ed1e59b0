pub mod migrations;

use crate::config::AppConfig;
use crate::error::AppError;

/// Bring the issuer database schema up to date. Called once at startup.
pub async fn init_db(config: &AppConfig) -> Result<(), AppError> {
    let database_url = config.require_database_url()?;

    for migration in migrations::embedded() {
        tracing::debug!(
            version = migration.version,
            description = %migration.description,
            "Embedded migration"
        );
    }

    migrations::run(database_url).await?;
    tracing::info!("Database initialized successfully");
    Ok(())
}
