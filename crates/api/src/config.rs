/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to stop after shutdown starts (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Remote catalog document URL. Sync is disabled when unset.
    pub catalog_sync_url: Option<String>,
    /// Seconds between catalog sync attempts (default: `300`).
    pub catalog_sync_interval_secs: u64,
    /// Per-request timeout for the catalog fetch (default: `10`).
    pub catalog_sync_timeout_secs: u64,
    /// Fixed seed for all game rolls. Unset means OS entropy.
    pub rng_seed: Option<u64>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `30`                       |
    /// | `CATALOG_SYNC_URL`           | unset (sync disabled)      |
    /// | `CATALOG_SYNC_INTERVAL_SECS` | `300`                      |
    /// | `CATALOG_SYNC_TIMEOUT_SECS`  | `10`                       |
    /// | `RNG_SEED`                   | unset (OS entropy)         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let catalog_sync_url = std::env::var("CATALOG_SYNC_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let catalog_sync_interval_secs: u64 = std::env::var("CATALOG_SYNC_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("CATALOG_SYNC_INTERVAL_SECS must be a valid u64");

        let catalog_sync_timeout_secs: u64 = std::env::var("CATALOG_SYNC_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("CATALOG_SYNC_TIMEOUT_SECS must be a valid u64");

        let rng_seed: Option<u64> = std::env::var("RNG_SEED")
            .ok()
            .map(|v| v.parse().expect("RNG_SEED must be a valid u64"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            catalog_sync_url,
            catalog_sync_interval_secs,
            catalog_sync_timeout_secs,
            rng_seed,
        }
    }
}
