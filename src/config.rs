//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Cache and admin server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote store URL; `None` selects the in-process fallback
    pub redis_url: Option<String>,
    /// Admin HTTP server port
    pub server_port: u16,
    /// Fallback store sweep interval in seconds
    pub sweep_interval: u64,
    /// Timeout applied to every remote store call, in milliseconds
    pub store_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Remote store URL (default: unset, in-process fallback)
    /// - `SERVER_PORT` - Admin HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Fallback sweep frequency in seconds (default: 60)
    /// - `STORE_TIMEOUT_MS` - Remote store call timeout in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            sweep_interval: parse_var("SWEEP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            store_timeout_ms: parse_var("STORE_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.store_timeout_ms),
        }
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    /// Store call timeout as a `Duration`.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            server_port: 3000,
            sweep_interval: 60,
            store_timeout_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.redis_url.is_none());
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.store_timeout(), Duration::from_millis(1000));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        env::remove_var("REDIS_URL");
        env::remove_var("SERVER_PORT");
        env::remove_var("SWEEP_INTERVAL");
        env::remove_var("STORE_TIMEOUT_MS");

        let config = Config::from_env();
        assert!(config.redis_url.is_none());
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 60);
        assert_eq!(config.store_timeout_ms, 1000);

        env::set_var("REDIS_URL", "   ");
        env::set_var("SWEEP_INTERVAL", "0");
        env::set_var("STORE_TIMEOUT_MS", "not-a-number");
        let config = Config::from_env();
        assert!(config.redis_url.is_none());
        assert_eq!(config.sweep_interval, 60);
        assert_eq!(config.store_timeout_ms, 1000);

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("SERVER_PORT", "8080");
        let config = Config::from_env();
        assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1:6379"));
        assert_eq!(config.server_port, 8080);

        env::remove_var("REDIS_URL");
        env::remove_var("SERVER_PORT");
        env::remove_var("SWEEP_INTERVAL");
        env::remove_var("STORE_TIMEOUT_MS");
    }
}
