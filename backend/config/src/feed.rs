//! Configuration feed.
//!
//! Fetches the products document once and caches whichever outcome it got
//! for the process lifetime; when the feed is unreachable or malformed the
//! host falls back to the built-in product list so the wizard stays usable.

use anyhow::Result;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::schema::{RemoteConfig, RemoteProductConfig};

/// Products every install knows about even without a reachable feed.
pub fn fallback_config() -> RemoteConfig {
    RemoteConfig {
        products: vec![
            RemoteProductConfig {
                id: "auto".to_string(),
                name: "Seguro Auto".to_string(),
                scope: "autoMfe".to_string(),
                url: "http://localhost:3002/remoteEntry.js".to_string(),
                enabled: true,
            },
            RemoteProductConfig {
                id: "home".to_string(),
                name: "Seguro Residencial".to_string(),
                scope: "homeMfe".to_string(),
                url: "http://localhost:3001/remoteEntry.js".to_string(),
                enabled: true,
            },
        ],
    }
}

pub struct ConfigFeed {
    client: reqwest::Client,
    url: String,
    cached: OnceCell<RemoteConfig>,
}

impl ConfigFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            cached: OnceCell::new(),
        }
    }

    /// Fetch the configuration document, caching the result (fetched or
    /// fallback) for the process lifetime.
    pub async fn load(&self) -> &RemoteConfig {
        self.cached
            .get_or_init(|| async {
                match self.fetch().await {
                    Ok(config) => {
                        info!(url = %self.url, products = config.products.len(), "Remote config loaded");
                        config
                    }
                    Err(error) => {
                        warn!(url = %self.url, error = %error, "Config feed unavailable, using fallback products");
                        fallback_config()
                    }
                }
            })
            .await
    }

    async fn fetch(&self) -> Result<RemoteConfig> {
        let response = self
            .client
            .get(&self.url)
            .header("Cache-Control", "no-cache")
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("config fetch failed: HTTP {}", response.status());
        }
        Ok(response.json::<RemoteConfig>().await?)
    }
}
