use std::str::FromStr;
use std::time::Duration;

use spectra_db::PoolConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    /// A single `*` entry allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deadline for a single store operation in seconds (default: `15`).
    pub store_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `8080`    |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `STORE_TIMEOUT_SECS`   | `15`      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
        );

        Self {
            host,
            port: env_or("PORT", 8080),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            store_timeout_secs: env_or("STORE_TIMEOUT_SECS", 15),
        }
    }

    /// Whether CORS should allow any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

/// Load database pool settings from environment variables.
///
/// | Env Var                   | Default    |
/// |---------------------------|------------|
/// | `DATABASE_URL`            | (required) |
/// | `DB_MAX_CONNECTIONS`      | `10`       |
/// | `DB_MIN_CONNECTIONS`      | `0`        |
/// | `DB_ACQUIRE_TIMEOUT_SECS` | `10`       |
/// | `DB_MAX_LIFETIME_SECS`    | `300`      |
/// | `DB_IDLE_TIMEOUT_SECS`    | `600`      |
///
/// Panics if `DATABASE_URL` is unset or a numeric variable does not parse.
pub fn pool_config_from_env() -> PoolConfig {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let defaults = PoolConfig::new(database_url);

    PoolConfig {
        max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
        min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections),
        acquire_timeout: env_secs_or("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout),
        max_lifetime: env_secs_or("DB_MAX_LIFETIME_SECS", defaults.max_lifetime),
        idle_timeout: env_secs_or("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout),
        ..defaults
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

fn env_secs_or(key: &str, default: Duration) -> Duration {
    Duration::from_secs(env_or(key, default.as_secs()))
}
