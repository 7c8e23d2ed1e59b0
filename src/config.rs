use std::time::Duration;

use crate::error::AppError;

const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Runtime configuration resolved from the process environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string. `None` when not configured.
    pub database_url: Option<String>,
    pub ipfs_gateway_url: String,
    pub schema_fetch_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            ipfs_gateway_url: DEFAULT_IPFS_GATEWAY.into(),
            schema_fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            log_format: LogFormat::Compact,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present) and read configuration from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        // A missing .env file is normal outside local development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_nonempty = |keys: &[&str]| {
            keys.iter().find_map(|key| {
                lookup(key)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            })
        };

        let mut config = Self::default();
        config.database_url = first_nonempty(&["DATABASE_URL", "ISSUER_DATABASE_URL"]);

        if let Some(gateway) = first_nonempty(&["IPFS_GATEWAY_URL"]) {
            url::Url::parse(&gateway)
                .map_err(|e| AppError::Config(format!("IPFS_GATEWAY_URL is not a valid URL: {e}")))?;
            config.ipfs_gateway_url = gateway.trim_end_matches('/').to_string();
        }

        if let Some(secs) = first_nonempty(&["SCHEMA_FETCH_TIMEOUT_SECS"]) {
            let secs: u64 = secs.parse().map_err(|_| {
                AppError::Config(format!("SCHEMA_FETCH_TIMEOUT_SECS must be a positive integer, got '{secs}'"))
            })?;
            if secs == 0 {
                return Err(AppError::Config("SCHEMA_FETCH_TIMEOUT_SECS must be greater than zero".into()));
            }
            config.schema_fetch_timeout = Duration::from_secs(secs);
        }

        if let Some(format) = first_nonempty(&["LOG_FORMAT"]) {
            config.log_format = match format.to_ascii_lowercase().as_str() {
                "compact" => LogFormat::Compact,
                "json" => LogFormat::Json,
                other => {
                    return Err(AppError::Config(format!(
                        "LOG_FORMAT must be 'compact' or 'json', got '{other}'"
                    )))
                }
            };
        }

        Ok(config)
    }

    /// The database URL, or a config error when it was never set.
    pub fn require_database_url(&self) -> Result<&str, AppError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| AppError::Config("DATABASE_URL not configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = config_from(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.ipfs_gateway_url, "https://ipfs.io");
        assert_eq!(config.schema_fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Compact);
        assert_eq!(config.require_database_url().unwrap_err().kind(), "config");
    }

    #[test]
    fn test_database_url_alias_and_blank_values() {
        let config = config_from(&[
            ("DATABASE_URL", "  "),
            ("ISSUER_DATABASE_URL", "postgres://issuer@localhost/issuer"),
        ])
        .unwrap();
        assert_eq!(
            config.require_database_url().unwrap(),
            "postgres://issuer@localhost/issuer"
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("IPFS_GATEWAY_URL", "https://gateway.pinata.cloud/"),
            ("SCHEMA_FETCH_TIMEOUT_SECS", "5"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.ipfs_gateway_url, "https://gateway.pinata.cloud");
        assert_eq!(config.schema_fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_from(&[("SCHEMA_FETCH_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("SCHEMA_FETCH_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("LOG_FORMAT", "pretty")]).is_err());
        assert!(config_from(&[("IPFS_GATEWAY_URL", "not a url")]).is_err());
    }
}
