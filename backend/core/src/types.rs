//! Shared vocabulary for the remote-module runtime.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Identifies one loadable unit served by a remote origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDescriptor {
    /// Absolute URL of the remote entry script.
    pub url: String,
    /// Global name the remote publishes its container under.
    pub scope: String,
    /// Named module entry point to resolve from the container.
    pub module_name: String,
}

impl RemoteDescriptor {
    pub fn new(
        url: impl Into<String>,
        scope: impl Into<String>,
        module_name: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            scope: scope.into(),
            module_name: module_name.into(),
        }
    }

    /// Cache identity of the descriptor's container.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.scope, &self.url)
    }
}

/// Cache identity of a container: derived from `(scope, url)` and excluding
/// the module name, because one container can expose several modules.
///
/// Scopes are bundle identifiers (no `@`), so `scope@url` is collision-free
/// for distinct remotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(scope: &str, url: &str) -> Self {
        Self(format!("{scope}@{url}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of wizard entry points a product remote exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryModule {
    #[serde(rename = "./Step2")]
    Step2,
    #[serde(rename = "./Step3")]
    Step3,
}

impl EntryModule {
    /// Wire name of the entry point as exported by the remote bundle.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryModule::Step2 => "./Step2",
            EntryModule::Step3 => "./Step3",
        }
    }
}

impl fmt::Display for EntryModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dependency instance the host offers to remotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedDependency {
    pub version: String,
    /// Only one instance may exist across host and remotes.
    #[serde(default)]
    pub singleton: bool,
}

/// The negotiated set of dependency instances shared between the host and
/// its remotes. Cloning is shallow; every clone views the same scope.
#[derive(Debug, Clone, Default)]
pub struct SharedScope {
    deps: Arc<RwLock<HashMap<String, SharedDependency>>>,
}

impl SharedScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a dependency instance under `name`, replacing any previous offer.
    pub async fn provide(&self, name: impl Into<String>, dep: SharedDependency) {
        self.deps.write().await.insert(name.into(), dep);
    }

    pub async fn get(&self, name: &str) -> Option<SharedDependency> {
        self.deps.read().await.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.deps.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.deps.read().await.is_empty()
    }
}

/// Opaque handle to a loaded component. Shared read-only by every consumer
/// of the resolved module; the UI edge downcasts to the concrete type.
#[derive(Clone)]
pub struct ComponentHandle(Arc<dyn Any + Send + Sync>);

impl ComponentHandle {
    pub fn new<T: Any + Send + Sync>(component: T) -> Self {
        Self(Arc::new(component))
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.0.clone().downcast::<T>().ok()
    }
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComponentHandle")
    }
}

/// What a module factory evaluates to: the module object whose `default`
/// export is the loadable component.
pub struct RemoteModule {
    pub default: ComponentHandle,
}

/// Deferred constructor for a module, as handed out by a container.
pub type ModuleFactory = Box<dyn FnOnce() -> anyhow::Result<RemoteModule> + Send>;
