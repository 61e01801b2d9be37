use std::str::FromStr;
use std::time::Duration;

use crate::application::fault_policy::FaultTag;
use crate::infrastructure::database::DatabaseConfig;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub cors_origins: Vec<String>,
    /// Operation forced to fail, for exercising error paths.
    pub force_errors: Option<FaultTag>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database = database_config(&lookup)?;
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let force_errors = lookup("FORCE_ERRORS")
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match raw.parse::<FaultTag>() {
                Ok(tag) => Some(tag),
                Err(e) => {
                    warn!("ignoring FORCE_ERRORS: {}", e);
                    None
                }
            });

        Ok(Self {
            host,
            port,
            database,
            cors_origins,
            force_errors,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", key, e)),
        None => Ok(default),
    }
}

fn database_config(lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<DatabaseConfig> {
    let url = lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let max_connections = parse_or(
        lookup,
        "DB_MAX_CONNECTIONS",
        DatabaseConfig::DEFAULT_MAX_CONNECTIONS,
    )?;
    let min_connections = parse_or(
        lookup,
        "DB_MIN_CONNECTIONS",
        DatabaseConfig::DEFAULT_MIN_CONNECTIONS,
    )?;
    let timeout_secs = parse_or(
        lookup,
        "DB_ACQUIRE_TIMEOUT_SECS",
        DatabaseConfig::DEFAULT_ACQUIRE_TIMEOUT_SECS,
    )?;

    if max_connections == 0 || min_connections > max_connections {
        anyhow::bail!(
            "DB_MIN_CONNECTIONS ({}) must not exceed DB_MAX_CONNECTIONS ({}), which must be positive",
            min_connections,
            max_connections
        );
    }

    Ok(DatabaseConfig {
        url,
        max_connections,
        min_connections,
        acquire_timeout: Duration::from_secs(timeout_secs),
    })
}
