//! The remote-module loading pipeline.
//!
//! Order per load: origin validation, registry hit check, deduplicated
//! script acquisition, readiness polling, shared-scope negotiation, registry
//! write, module resolution. The container-producing half is itself
//! deduplicated per cache key, so concurrent first loads for one remote
//! share a single acquisition and observe a single handshake outcome, while
//! each caller still resolves its own module name.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use modfed_core::{
    CacheKey, ComponentHandle, ContainerDirectory, LoadError, OriginPolicy, RemoteContainer,
    RemoteDescriptor, SharedDependency,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::origin::validate_remote_url;
use crate::readiness::{PollPolicy, wait_for_container};
use crate::registry::ContainerRegistry;
use crate::resolver::resolve_module;
use crate::script::{ScriptAcquirer, ScriptHost};
use crate::share::SharedScopeNegotiator;

type SharedContainer = Shared<BoxFuture<'static, Result<Arc<dyn RemoteContainer>, LoadError>>>;

pub struct RemoteModuleLoader {
    policy: OriginPolicy,
    script_host: Arc<dyn ScriptHost>,
    directory: Arc<dyn ContainerDirectory>,
    acquirer: Arc<ScriptAcquirer>,
    negotiator: Arc<SharedScopeNegotiator>,
    pub(crate) registry: Arc<ContainerRegistry>,
    poll: PollPolicy,
    pending: Arc<Mutex<HashMap<CacheKey, SharedContainer>>>,
}

impl RemoteModuleLoader {
    pub fn new(
        policy: OriginPolicy,
        script_host: Arc<dyn ScriptHost>,
        directory: Arc<dyn ContainerDirectory>,
    ) -> Self {
        Self {
            acquirer: Arc::new(ScriptAcquirer::new(script_host.clone())),
            negotiator: Arc::new(SharedScopeNegotiator::new()),
            registry: Arc::new(ContainerRegistry::new()),
            poll: PollPolicy::default(),
            pending: Arc::new(Mutex::new(HashMap::new())),
            policy,
            script_host,
            directory,
        }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_grace_window(mut self, grace_window: Duration) -> Self {
        self.acquirer = Arc::new(ScriptAcquirer::with_grace_window(
            self.script_host.clone(),
            grace_window,
        ));
        self
    }

    /// Dependency instances the host offers to every remote.
    pub fn with_host_deps(mut self, host_deps: Vec<(String, SharedDependency)>) -> Self {
        self.negotiator = Arc::new(SharedScopeNegotiator::with_host_deps(host_deps));
        self
    }

    pub fn policy(&self) -> &OriginPolicy {
        &self.policy
    }

    /// Load one remote module end to end.
    pub async fn load(&self, descriptor: &RemoteDescriptor) -> Result<ComponentHandle, LoadError> {
        let result = self.load_inner(descriptor).await;
        match &result {
            Ok(_) => {
                debug!(
                    scope = %descriptor.scope,
                    module = %descriptor.module_name,
                    "Remote module loaded"
                );
            }
            // Security rejections get their own audit trail; everything else
            // is an ordinary load failure.
            Err(LoadError::SecurityViolation { url, reason }) => {
                warn!(
                    target: "security",
                    url = %url,
                    reason = %reason,
                    "Remote load blocked by origin policy"
                );
            }
            Err(other) => {
                error!(
                    scope = %descriptor.scope,
                    url = %descriptor.url,
                    module = %descriptor.module_name,
                    error = %other,
                    "Remote module load failed"
                );
            }
        }
        result
    }

    async fn load_inner(&self, descriptor: &RemoteDescriptor) -> Result<ComponentHandle, LoadError> {
        let container = self.container_for(&descriptor.scope, &descriptor.url).await?;
        resolve_module(container.as_ref(), &descriptor.scope, &descriptor.module_name).await
    }

    /// Return the initialized container for `(scope, url)`, producing it if
    /// this is the first request for the key. Concurrent requests for one
    /// key join the same pending production.
    async fn container_for(
        &self,
        scope: &str,
        url: &str,
    ) -> Result<Arc<dyn RemoteContainer>, LoadError> {
        validate_remote_url(&self.policy, url)?;

        let key = CacheKey::new(scope, url);
        let pending = {
            let mut pending_map = self.pending.lock().await;
            if let Some(cached) = self.registry.get(&key).await {
                return Ok(cached);
            }
            if let Some(pending) = pending_map.get(&key) {
                debug!(key = %key, "Joining pending container initialization");
                pending.clone()
            } else {
                let fut = Self::initialize_container(
                    self.acquirer.clone(),
                    self.directory.clone(),
                    self.negotiator.clone(),
                    self.registry.clone(),
                    self.poll.clone(),
                    key.clone(),
                    scope.to_string(),
                    url.to_string(),
                )
                .boxed()
                .shared();
                pending_map.insert(key.clone(), fut.clone());

                // The settle task drives the shared future to completion and
                // drops the pending entry; successes live on in the registry,
                // failures leave nothing behind. Removal checks identity so
                // an invalidate-and-retry that already replaced the entry is
                // left alone.
                let pending_entries = self.pending.clone();
                let settle = fut.clone();
                tokio::spawn(async move {
                    let _ = settle.clone().await;
                    let mut pending_map = pending_entries.lock().await;
                    if pending_map.get(&key).is_some_and(|current| current.ptr_eq(&settle)) {
                        pending_map.remove(&key);
                    }
                });
                fut
            }
        };

        pending.await
    }

    async fn initialize_container(
        acquirer: Arc<ScriptAcquirer>,
        directory: Arc<dyn ContainerDirectory>,
        negotiator: Arc<SharedScopeNegotiator>,
        registry: Arc<ContainerRegistry>,
        poll: PollPolicy,
        key: CacheKey,
        scope: String,
        url: String,
    ) -> Result<Arc<dyn RemoteContainer>, LoadError> {
        acquirer.acquire(&scope, &url).await?;

        let container = wait_for_container(directory.as_ref(), &scope, &poll)
            .await
            .ok_or_else(|| LoadError::ContainerNotFound {
                scope: scope.clone(),
                url: url.clone(),
            })?;

        negotiator.negotiate(&scope, &url, container.as_ref()).await?;

        registry.set(key, container.clone()).await;
        info!(scope = %scope, url = %url, "Remote container initialized");
        Ok(container)
    }

    /// Invalidate every cache layer for `(scope, url)` so the next load
    /// starts from a fresh acquisition and handshake.
    pub async fn invalidate(&self, scope: &str, url: &str) {
        let key = CacheKey::new(scope, url);
        self.pending.lock().await.remove(&key);
        self.registry.delete(&key).await;
        self.acquirer.invalidate(scope, url).await;
        debug!(key = %key, "Remote cache invalidated");
    }

    /// Drop every cached container, pending production, in-flight
    /// acquisition, and injected script.
    pub async fn clear_cache(&self) {
        self.pending.lock().await.clear();
        self.registry.clear().await;
        self.acquirer.clear().await;
    }
}
