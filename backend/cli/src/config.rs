use modfed_core::{EnvironmentMode, OriginPolicy};

/// Host tooling configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the remote-products configuration feed.
    pub config_url: String,
    /// Active environment mode (selects the origin policy).
    pub mode: EnvironmentMode,
    /// Log level
    pub log_level: String,
    /// Optional directory for rolling file logs.
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_url: "http://localhost:3000/config.json".to_string(),
            mode: EnvironmentMode::Development,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            config_url: std::env::var("MODFED_CONFIG_URL").unwrap_or(defaults.config_url),
            mode: modfed_config::mode_from_env(),
            log_level: std::env::var("MODFED_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("MODFED_LOG_DIR").ok(),
        }
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::defaults_for(self.mode)
    }
}
