//! Container registry.
//!
//! Process-wide cache of initialized containers. An entry is written only
//! after the shared-scope handshake fully succeeded, so a cached handle is
//! always safe to hand to module resolution; failed attempts leave nothing
//! behind. No eviction beyond explicit deletion.

use std::collections::HashMap;
use std::sync::Arc;

use modfed_core::{CacheKey, RemoteContainer};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct ContainerRegistry {
    containers: RwLock<HashMap<CacheKey, Arc<dyn RemoteContainer>>>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<dyn RemoteContainer>> {
        self.containers.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: CacheKey, container: Arc<dyn RemoteContainer>) {
        self.containers.write().await.insert(key, container);
    }

    pub async fn delete(&self, key: &CacheKey) -> bool {
        self.containers.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.containers.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.containers.read().await.len()
    }
}
