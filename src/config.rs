//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

use crate::triangle::DedupStrategy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Exchange Endpoints ===
    /// Markets endpoint listing every symbol with its trading state.
    #[serde(default = "default_markets_url")]
    pub markets_url: String,

    /// Ticker endpoint with best bid/ask per symbol.
    #[serde(default = "default_ticker_url")]
    pub ticker_url: String,

    /// Market state that counts as tradeable.
    #[serde(default = "default_tradeable_state")]
    pub tradeable_state: String,

    // === Triangle Structuring ===
    /// Where the structured triangle set is persisted.
    #[serde(default = "default_triangles_path")]
    pub triangles_path: PathBuf,

    /// How duplicates are collapsed (`canonical` or `first-seen`).
    #[serde(default)]
    pub dedup_strategy: DedupStrategy,

    /// Enumerate starting pairs in parallel.
    #[serde(default)]
    pub parallel: bool,

    // === Pacing / HTTP ===
    /// Delay between successive priced-triangle emissions (0 disables).
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Observability ===
    /// Expose Prometheus metrics.
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Prometheus exporter port.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_markets_url() -> String {
    "https://api.poloniex.com/markets".to_string()
}

fn default_ticker_url() -> String {
    "https://api.poloniex.com/markets/ticker24h".to_string()
}

fn default_tradeable_state() -> String {
    "NORMAL".to_string()
}

fn default_triangles_path() -> PathBuf {
    PathBuf::from("data/structured_triangles.json")
}

fn default_pacing_ms() -> u64 {
    300
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markets_url: default_markets_url(),
            ticker_url: default_ticker_url(),
            tradeable_state: default_tradeable_state(),
            triangles_path: default_triangles_path(),
            dedup_strategy: DedupStrategy::default(),
            parallel: false,
            pacing_ms: default_pacing_ms(),
            http_timeout_ms: default_http_timeout_ms(),
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
            rust_log: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("MARKETS_URL", &self.markets_url), ("TICKER_URL", &self.ticker_url)] {
            Url::parse(value).map_err(|e| format!("{} is not a valid URL: {}", name, e))?;
        }

        if self.tradeable_state.trim().is_empty() {
            return Err("TRADEABLE_STATE must not be empty".to_string());
        }

        if self.triangles_path.as_os_str().is_empty() {
            return Err("TRIANGLES_PATH must not be empty".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        Ok(())
    }
}
