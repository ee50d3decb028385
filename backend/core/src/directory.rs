//! Container publication directory.
//!
//! Executing a remote entry script must, as a side effect, publish the
//! bundle's container under its scope name. The runtime depends on this
//! injected service rather than ambient global state; [`InMemoryDirectory`]
//! is the process-wide namespace remotes publish into.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::traits::RemoteContainer;

#[async_trait]
pub trait ContainerDirectory: Send + Sync {
    async fn register(&self, scope: &str, container: Arc<dyn RemoteContainer>);
    async fn lookup(&self, scope: &str) -> Option<Arc<dyn RemoteContainer>>;
    async fn unregister(&self, scope: &str);
}

/// Process-wide in-memory publication namespace.
#[derive(Default)]
pub struct InMemoryDirectory {
    containers: RwLock<HashMap<String, Arc<dyn RemoteContainer>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContainerDirectory for InMemoryDirectory {
    async fn register(&self, scope: &str, container: Arc<dyn RemoteContainer>) {
        debug!(scope = %scope, "Container published");
        self.containers.write().await.insert(scope.to_string(), container);
    }

    async fn lookup(&self, scope: &str) -> Option<Arc<dyn RemoteContainer>> {
        self.containers.read().await.get(scope).cloned()
    }

    async fn unregister(&self, scope: &str) {
        self.containers.write().await.remove(scope);
    }
}
