pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod schema;
mod validation;

pub use config::AppConfig;
pub use error::AppError;
pub use schema::JsonSchema;

/// Startup sequence: logging, configuration, database migrations.
pub async fn run() -> Result<(), AppError> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init(config::LogFormat::Compact);
            return Err(e);
        }
    };
    logging::init(config.log_format);

    tracing::info!("Starting credential-schema v{}", env!("CARGO_PKG_VERSION"));

    db::init_db(&config).await?;
    Ok(())
}
