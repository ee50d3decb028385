//! HTTP-backed script host.
//!
//! Downloads a remote entry script and hands the bytes to a
//! [`BundleExecutor`], the engine-specific piece that actually runs the
//! bundle. Executing must, as a side effect, publish the bundle's container
//! into the directory under its scope name; this shim stays thin so the
//! acquisition layer above it can be tested against in-memory hosts.

use std::collections::HashSet;

use async_trait::async_trait;
use modfed_core::{CacheKey, LoadError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::script::ScriptHost;

/// Runs a downloaded bundle in the host environment.
#[async_trait]
pub trait BundleExecutor: Send + Sync {
    async fn execute(&self, scope: &str, url: &str, bytes: &[u8]) -> anyhow::Result<()>;
}

pub struct HttpScriptHost {
    client: reqwest::Client,
    executor: Arc<dyn BundleExecutor>,
    injected: RwLock<HashSet<CacheKey>>,
}

impl HttpScriptHost {
    pub fn new(executor: Arc<dyn BundleExecutor>) -> Self {
        Self::with_client(reqwest::Client::new(), executor)
    }

    pub fn with_client(client: reqwest::Client, executor: Arc<dyn BundleExecutor>) -> Self {
        Self {
            client,
            executor,
            injected: RwLock::new(HashSet::new()),
        }
    }

    fn script_failure(url: &str, reason: impl Into<String>) -> LoadError {
        LoadError::ScriptLoadFailure {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ScriptHost for HttpScriptHost {
    async fn inject(&self, scope: &str, url: &str) -> Result<(), LoadError> {
        // Marker goes in first, mirroring an injected-but-still-loading
        // artifact; the acquirer rolls it back if anything below fails.
        self.injected.write().await.insert(CacheKey::new(scope, url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| Self::script_failure(url, error.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::script_failure(url, format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|error| Self::script_failure(url, error.to_string()))?;
        debug!(scope = %scope, url = %url, bytes = bytes.len(), "Remote entry script downloaded");

        self.executor
            .execute(scope, url, &bytes)
            .await
            .map_err(|error| Self::script_failure(url, format!("bundle execution failed: {error}")))
    }

    async fn has_script(&self, scope: &str, url: &str) -> bool {
        self.injected.read().await.contains(&CacheKey::new(scope, url))
    }

    async fn remove_script(&self, scope: &str, url: &str) {
        self.injected.write().await.remove(&CacheKey::new(scope, url));
    }

    async fn clear_scripts(&self) {
        self.injected.write().await.clear();
    }
}
