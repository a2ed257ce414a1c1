use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// File path or http(s) URL of the puzzle catalog.
    pub puzzle_source: String,
    pub catalog_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub cors_allow_any: bool,
    /// Sittings untouched for this long are dropped.
    pub sitting_idle_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            puzzle_source: env::var("PUZZLE_SOURCE")
                .unwrap_or_else(|_| "data/puzzles.json".to_string()),
            catalog_timeout_secs: env::var("CATALOG_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            cors_allow_any: env::var("CORS_ALLOW_ANY")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            sitting_idle_secs: env::var("SITTING_IDLE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        }
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn sitting_idle(&self) -> Duration {
        Duration::from_secs(self.sitting_idle_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            puzzle_source: "data/puzzles.json".to_string(),
            catalog_timeout_secs: 30,
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_allow_any: true,
            sitting_idle_secs: 3600,
        }
    }
}
