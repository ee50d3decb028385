//! Environment policy inputs for origin validation.

use serde::{Deserialize, Serialize};

/// Which origin and protocol policy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    Production,
    Development,
}

impl EnvironmentMode {
    pub fn is_production(self) -> bool {
        matches!(self, EnvironmentMode::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnvironmentMode::Production => "production",
            EnvironmentMode::Development => "development",
        }
    }
}

/// Origin allowlist plus protocol requirement for one environment mode.
///
/// Entries are prefix-matched against a URL's origin
/// (`scheme://host[:port]`), so an entry may name an exact origin or a
/// common prefix shared by several trusted hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginPolicy {
    pub mode: EnvironmentMode,
    pub allowed_origins: Vec<String>,
}

impl OriginPolicy {
    /// Trusted CDN and product origins served over HTTPS.
    pub fn production_defaults() -> Self {
        Self {
            mode: EnvironmentMode::Production,
            allowed_origins: vec![
                "https://cdn.example.com".to_string(),
                "https://auto-mfe.example.com".to_string(),
                "https://home-mfe.example.com".to_string(),
                "https://life-mfe.example.com".to_string(),
            ],
        }
    }

    /// Local loopback origins for each known remote's dev-server port.
    pub fn development_defaults() -> Self {
        Self {
            mode: EnvironmentMode::Development,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
                "http://localhost:3002".to_string(),
                "http://localhost:3003".to_string(),
            ],
        }
    }

    pub fn defaults_for(mode: EnvironmentMode) -> Self {
        match mode {
            EnvironmentMode::Production => Self::production_defaults(),
            EnvironmentMode::Development => Self::development_defaults(),
        }
    }
}
