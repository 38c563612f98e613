//! Server configuration

use std::time::Duration;

use crate::db::DbConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_DATABASE_URL: &str = "sqlite://gastromind.db";

/// Server configuration, read from the environment (`.env` is honoured)
#[derive(Debug, Clone)]
pub struct Config {
    /// `sqlite://path/to/file.db`
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    pub log_json: bool,
    /// Enables daily rolling log files under this directory
    pub log_dir: Option<String>,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    /// Grace period for in-flight requests after Ctrl-C
    pub shutdown_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `DATABASE_URL` is mandatory outside development
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None if environment == "development" => DEFAULT_DATABASE_URL.into(),
            None => return Err(format!("DATABASE_URL must be set in {environment} environment").into()),
        };

        Ok(Self {
            database_url,
            http_port: var("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: var("LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(environment == "production"),
            log_dir: var("LOG_DIR"),
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(8),
            db_acquire_timeout: Duration::from_millis(
                var("DB_ACQUIRE_TIMEOUT_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5_000),
            ),
            shutdown_timeout: Duration::from_millis(
                var("SHUTDOWN_TIMEOUT_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10_000),
            ),
            environment,
        })
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.database_url.clone(),
            max_connections: self.db_max_connections,
            acquire_timeout: self.db_acquire_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.environment, "development");
        assert!(!config.log_json);
        assert!(config.log_dir.is_none());
        assert_eq!(config.db_max_connections, 8);
        assert_eq!(config.db_acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("HTTP_PORT", "8081"),
            ("LOG_JSON", "true"),
            ("LOG_DIR", "/tmp/gastro-logs"),
            ("DB_MAX_CONNECTIONS", "2"),
            ("DB_ACQUIRE_TIMEOUT_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 8081);
        assert!(config.log_json);
        assert_eq!(config.log_dir.as_deref(), Some("/tmp/gastro-logs"));
        let db = config.db_config();
        assert_eq!(db.url, "sqlite::memory:");
        assert_eq!(db.max_connections, 2);
        assert_eq!(db.acquire_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("HTTP_PORT", "eighty"),
            ("DB_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.db_max_connections, 8);
    }

    #[test]
    fn test_production_requires_database_url() {
        let err = Config::from_lookup(lookup(&[("ENVIRONMENT", "production")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let config = Config::from_lookup(lookup(&[
            ("ENVIRONMENT", "production"),
            ("DATABASE_URL", "sqlite:///var/lib/gastromind/gastromind.db"),
        ]))
        .unwrap();
        assert!(config.log_json);
    }
}
