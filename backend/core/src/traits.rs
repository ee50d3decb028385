//! Service traits at the seams of the loading pipeline.

use async_trait::async_trait;

use crate::types::{ModuleFactory, SharedScope};

/// Capability published by an executed remote bundle under its scope name.
///
/// `init` accepts the host's shared dependency scope; the runtime calls it at
/// most once per container, before the container is handed to any module
/// request. `get` returns a factory for a named exported module; one
/// container may serve several module names without re-initialization.
#[async_trait]
pub trait RemoteContainer: Send + Sync {
    async fn init(&self, share_scope: SharedScope) -> anyhow::Result<()>;
    async fn get(&self, module_name: &str) -> anyhow::Result<ModuleFactory>;
}
