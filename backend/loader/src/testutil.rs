//! In-memory doubles shared by the loader and binding tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use modfed_core::{
    CacheKey, ComponentHandle, ContainerDirectory, LoadError, ModuleFactory, RemoteContainer,
    RemoteModule, SharedScope,
};
use tokio::sync::RwLock;

use crate::script::ScriptHost;

/// Container double: counts handshakes, serves string components per module.
pub(crate) struct FakeContainer {
    init_calls: AtomicUsize,
    fail_init: AtomicBool,
    modules: HashMap<String, String>,
}

impl FakeContainer {
    pub fn with_modules(entries: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            init_calls: AtomicUsize::new(0),
            fail_init: AtomicBool::new(false),
            modules: entries
                .iter()
                .map(|(name, component)| (name.to_string(), component.to_string()))
                .collect(),
        })
    }

    pub fn failing_init(entries: &[(&str, &str)]) -> Arc<Self> {
        let container = Self::with_modules(entries);
        container.fail_init.store(true, Ordering::SeqCst);
        container
    }

    pub fn inits(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteContainer for FakeContainer {
    async fn init(&self, _share_scope: SharedScope) -> anyhow::Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.load(Ordering::SeqCst) {
            anyhow::bail!("handshake refused");
        }
        Ok(())
    }

    async fn get(&self, module_name: &str) -> anyhow::Result<ModuleFactory> {
        let Some(component) = self.modules.get(module_name).cloned() else {
            anyhow::bail!("module {module_name} is not exported");
        };
        Ok(Box::new(move || {
            Ok(RemoteModule {
                default: ComponentHandle::new(component),
            })
        }))
    }
}

/// Script host double that "executes" a bundle by publishing its prepared
/// container into the directory, optionally after a delay.
pub(crate) struct FakeBundleHost {
    directory: Arc<dyn ContainerDirectory>,
    bundles: RwLock<HashMap<CacheKey, Arc<FakeContainer>>>,
    injected: RwLock<HashSet<CacheKey>>,
    inject_calls: AtomicUsize,
    fail_injects: AtomicBool,
    inject_delay: Duration,
    publish_delay: Duration,
}

impl FakeBundleHost {
    pub fn new(directory: Arc<dyn ContainerDirectory>) -> Self {
        Self::with_delays(directory, Duration::ZERO, Duration::ZERO)
    }

    pub fn with_delays(
        directory: Arc<dyn ContainerDirectory>,
        inject_delay: Duration,
        publish_delay: Duration,
    ) -> Self {
        Self {
            directory,
            bundles: RwLock::new(HashMap::new()),
            injected: RwLock::new(HashSet::new()),
            inject_calls: AtomicUsize::new(0),
            fail_injects: AtomicBool::new(false),
            inject_delay,
            publish_delay,
        }
    }

    pub async fn serve(&self, scope: &str, url: &str, container: Arc<FakeContainer>) {
        self.bundles
            .write()
            .await
            .insert(CacheKey::new(scope, url), container);
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_injects.store(failing, Ordering::SeqCst);
    }

    pub fn injects(&self) -> usize {
        self.inject_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScriptHost for FakeBundleHost {
    async fn inject(&self, scope: &str, url: &str) -> Result<(), LoadError> {
        let key = CacheKey::new(scope, url);
        self.inject_calls.fetch_add(1, Ordering::SeqCst);
        self.injected.write().await.insert(key.clone());

        if !self.inject_delay.is_zero() {
            tokio::time::sleep(self.inject_delay).await;
        }
        if self.fail_injects.load(Ordering::SeqCst) {
            return Err(LoadError::ScriptLoadFailure {
                url: url.to_string(),
                reason: "simulated network failure".to_string(),
            });
        }

        if let Some(container) = self.bundles.read().await.get(&key).cloned() {
            if self.publish_delay.is_zero() {
                self.directory.register(scope, container).await;
            } else {
                let directory = self.directory.clone();
                let scope = scope.to_string();
                let delay = self.publish_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    directory.register(&scope, container).await;
                });
            }
        }
        Ok(())
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
