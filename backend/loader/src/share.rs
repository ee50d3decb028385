//! Shared-scope negotiation.
//!
//! Two steps: initialize the host's shared-dependency scope once per
//! process, then hand that scope to a container's `init` exactly once for
//! that container. Callers never negotiate a container that is already in
//! the registry; the cache-only-on-success rule keeps re-initialization out.

use modfed_core::{LoadError, RemoteContainer, SharedDependency, SharedScope};
use tokio::sync::OnceCell;
use tracing::debug;

pub struct SharedScopeNegotiator {
    host_deps: Vec<(String, SharedDependency)>,
    scope: OnceCell<SharedScope>,
}

impl SharedScopeNegotiator {
    pub fn new() -> Self {
        Self::with_host_deps(Vec::new())
    }

    /// Seed the shared scope with the dependency instances the host provides.
    pub fn with_host_deps(host_deps: Vec<(String, SharedDependency)>) -> Self {
        Self {
            host_deps,
            scope: OnceCell::new(),
        }
    }

    /// Initialize (once) and return the shared dependency scope.
    /// Idempotent: later calls return the already-built scope.
    pub async fn share_scope(&self) -> SharedScope {
        self.scope
            .get_or_init(|| async {
                let scope = SharedScope::new();
                for (name, dep) in &self.host_deps {
                    scope.provide(name.clone(), dep.clone()).await;
                }
                debug!(provided = self.host_deps.len(), "Shared dependency scope initialized");
                scope
            })
            .await
            .clone()
    }

    /// Hand the shared scope to a freshly published container.
    pub async fn negotiate(
        &self,
        scope_name: &str,
        url: &str,
        container: &dyn RemoteContainer,
    ) -> Result<(), LoadError> {
        let share_scope = self.share_scope().await;
        container
            .init(share_scope)
            .await
            .map_err(|error| LoadError::ScriptLoadFailure {
                url: url.to_string(),
                reason: format!("container \"{scope_name}\" init failed: {error}"),
            })
    }
}

impl Default for SharedScopeNegotiator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use modfed_core::ModuleFactory;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct InitSpy {
        init_calls: AtomicUsize,
        fail: bool,
        seen_deps: AtomicUsize,
    }

    impl InitSpy {
        fn new(fail: bool) -> Self {
            Self {
                init_calls: AtomicUsize::new(0),
                fail,
                seen_deps: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RemoteContainer for InitSpy {
        async fn init(&self, share_scope: SharedScope) -> anyhow::Result<()> {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_deps.store(share_scope.len().await, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("remote rejected the shared scope");
            }
            Ok(())
        }

        async fn get(&self, module_name: &str) -> anyhow::Result<ModuleFactory> {
            anyhow::bail!("no module {module_name}")
        }
    }

    #[tokio::test]
    async fn scope_initialization_is_idempotent() {
        let negotiator = SharedScopeNegotiator::new();
        let first = negotiator.share_scope().await;
        first
            .provide("design-system", SharedDependency { version: "2.1.0".into(), singleton: true })
            .await;

        // The second call must return the same scope, not a fresh one.
        let second = negotiator.share_scope().await;
        assert!(second.get("design-system").await.is_some());
    }

    #[tokio::test]
    async fn container_sees_host_provided_dependencies() {
        let negotiator = SharedScopeNegotiator::with_host_deps(vec![
            ("design-system".to_string(), SharedDependency { version: "2.1.0".into(), singleton: true }),
            ("http-client".to_string(), SharedDependency { version: "1.4.2".into(), singleton: false }),
        ]);
        let container = InitSpy::new(false);

        negotiator
            .negotiate("autoMfe", "http://localhost:3002/remoteEntry.js", &container)
            .await
            .unwrap();

        assert_eq!(container.init_calls.load(Ordering::SeqCst), 1);
        assert_eq!(container.seen_deps.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn init_failure_maps_to_script_load_failure() {
        let negotiator = SharedScopeNegotiator::new();
        let container = InitSpy::new(true);

        let err = negotiator
            .negotiate("autoMfe", "http://localhost:3002/remoteEntry.js", &container)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::ScriptLoadFailure { .. }));
    }
}
