//! Script acquisition.
//!
//! Ensures a remote entry script executes in the host environment exactly
//! once per `(scope, url)`, while every concurrent caller awaits the same
//! outcome. The environment itself sits behind the [`ScriptHost`] seam; the
//! acquirer owns deduplication, rollback on failure, and entry cleanup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use modfed_core::{CacheKey, LoadError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Environment capable of executing a remote entry script.
///
/// `inject` places a loader marker for `(scope, url)`, downloads the script,
/// and executes it; the executed bundle is expected to publish its container
/// into the directory as a side effect. The marker survives a successful
/// execution so later acquisitions can short-circuit without re-running the
/// bundle. On failure the marker is left in place; the acquirer rolls it
/// back via `remove_script` before settling.
#[async_trait]
pub trait ScriptHost: Send + Sync {
    async fn inject(&self, scope: &str, url: &str) -> Result<(), LoadError>;
    async fn has_script(&self, scope: &str, url: &str) -> bool;
    async fn remove_script(&self, scope: &str, url: &str);
    async fn clear_scripts(&self);
}

type SharedAcquisition = Shared<BoxFuture<'static, Result<(), LoadError>>>;

/// How long a settled acquisition entry lingers before removal. Absorbs
/// near-simultaneous duplicate calls without a duplicate side effect, while
/// an explicit invalidation can still force a fresh attempt immediately.
pub const DEFAULT_GRACE_WINDOW: Duration = Duration::from_millis(1_000);

pub struct ScriptAcquirer {
    host: Arc<dyn ScriptHost>,
    in_flight: Arc<Mutex<HashMap<CacheKey, SharedAcquisition>>>,
    grace_window: Duration,
}

impl ScriptAcquirer {
    pub fn new(host: Arc<dyn ScriptHost>) -> Self {
        Self::with_grace_window(host, DEFAULT_GRACE_WINDOW)
    }

    pub fn with_grace_window(host: Arc<dyn ScriptHost>, grace_window: Duration) -> Self {
        Self {
            host,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            grace_window,
        }
    }

    /// Ensure the entry script for `(scope, url)` has executed.
    ///
    /// Concurrent calls for one key share a single attempt; a call arriving
    /// after the in-flight entry expired but while the executed script still
    /// exists resolves immediately.
    pub async fn acquire(&self, scope: &str, url: &str) -> Result<(), LoadError> {
        let key = CacheKey::new(scope, url);

        let acquisition = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(pending) = in_flight.get(&key) {
                debug!(key = %key, "Joining in-flight script acquisition");
                pending.clone()
            } else if self.host.has_script(scope, url).await {
                return Ok(());
            } else {
                let fut = Self::run(self.host.clone(), scope.to_string(), url.to_string())
                    .boxed()
                    .shared();
                in_flight.insert(key.clone(), fut.clone());
                self.schedule_cleanup(key.clone(), fut.clone());
                fut
            }
        };

        acquisition.await
    }

    async fn run(host: Arc<dyn ScriptHost>, scope: String, url: String) -> Result<(), LoadError> {
        debug!(scope = %scope, url = %url, "Acquiring remote entry script");
        match host.inject(&scope, &url).await {
            Ok(()) => Ok(()),
            Err(error) => {
                // Roll back the injected artifact so a retry is not blocked
                // by a half-loaded script.
                host.remove_script(&scope, &url).await;
                warn!(scope = %scope, url = %url, error = %error, "Remote script acquisition failed");
                Err(error)
            }
        }
    }

    /// The cleanup task also drives the shared future, so an acquisition runs
    /// to settlement even if every caller stops observing it. Removal is
    /// guarded by identity: an invalidation may already have replaced the
    /// entry with a fresh attempt that must not be evicted.
    fn schedule_cleanup(&self, key: CacheKey, acquisition: SharedAcquisition) {
        let in_flight = self.in_flight.clone();
        let grace_window = self.grace_window;
        tokio::spawn(async move {
            let _ = acquisition.clone().await;
            tokio::time::sleep(grace_window).await;
            let mut in_flight = in_flight.lock().await;
            if in_flight.get(&key).is_some_and(|current| current.ptr_eq(&acquisition)) {
                in_flight.remove(&key);
            }
        });
    }

    /// Drop the in-flight entry and the injected artifact for `(scope, url)`
    /// so the next acquisition starts fresh.
    pub async fn invalidate(&self, scope: &str, url: &str) {
        let key = CacheKey::new(scope, url);
        self.in_flight.lock().await.remove(&key);
        self.host.remove_script(scope, url).await;
    }

    /// Drop every in-flight entry and injected artifact.
    pub async fn clear(&self) {
        self.in_flight.lock().await.clear();
        self.host.clear_scripts().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    /// Script host double that records injections and can be told to fail.
    struct RecordingHost {
        injected: RwLock<HashSet<CacheKey>>,
        inject_calls: AtomicUsize,
        fail: AtomicBool,
        inject_delay: Duration,
    }

    impl RecordingHost {
        fn new() -> Self {
            Self {
                injected: RwLock::new(HashSet::new()),
                inject_calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                inject_delay: Duration::ZERO,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                inject_delay: delay,
                ..Self::new()
            }
        }

        fn set_failing(&self, failing: bool) {
            self.fail.store(failing, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.inject_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScriptHost for RecordingHost {
        async fn inject(&self, scope: &str, url: &str) -> Result<(), LoadError> {
            self.inject_calls.fetch_add(1, Ordering::SeqCst);
            self.injected.write().await.insert(CacheKey::new(scope, url));
            if !self.inject_delay.is_zero() {
                tokio::time::sleep(self.inject_delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(LoadError::ScriptLoadFailure {
                    url: url.to_string(),
                    reason: "simulated network failure".to_string(),
                });
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

    const URL: &str = "http://localhost:3002/remoteEntry.js";

    #[tokio::test]
    async fn concurrent_acquires_share_one_injection() {
        let host = Arc::new(RecordingHost::slow(Duration::from_millis(20)));
        let acquirer = Arc::new(ScriptAcquirer::new(host.clone()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let acquirer = acquirer.clone();
                tokio::spawn(async move { acquirer.acquire("autoMfe", URL).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(host.calls(), 1);
    }

    #[tokio::test]
    async fn existing_script_short_circuits_after_entry_expiry() {
        let host = Arc::new(RecordingHost::new());
        let acquirer = ScriptAcquirer::with_grace_window(host.clone(), Duration::from_millis(5));

        acquirer.acquire("autoMfe", URL).await.unwrap();
        // Let the grace window lapse so the in-flight entry is gone.
        tokio::time::sleep(Duration::from_millis(30)).await;

        acquirer.acquire("autoMfe", URL).await.unwrap();
        assert_eq!(host.calls(), 1, "persisted script must not be re-acquired");
    }

    #[tokio::test]
    async fn failure_rolls_back_the_injected_artifact() {
        let host = Arc::new(RecordingHost::new());
        host.set_failing(true);
        let acquirer = ScriptAcquirer::new(host.clone());

        let err = acquirer.acquire("autoMfe", URL).await.unwrap_err();
        assert!(matches!(err, LoadError::ScriptLoadFailure { .. }));
        assert!(!host.has_script("autoMfe", URL).await);
    }

    #[tokio::test]
    async fn duplicate_callers_observe_the_same_failure() {
        let host = Arc::new(RecordingHost::slow(Duration::from_millis(20)));
        host.set_failing(true);
        let acquirer = Arc::new(ScriptAcquirer::new(host.clone()));

        let first = {
            let acquirer = acquirer.clone();
            tokio::spawn(async move { acquirer.acquire("autoMfe", URL).await })
        };
        let second = {
            let acquirer = acquirer.clone();
            tokio::spawn(async move { acquirer.acquire("autoMfe", URL).await })
        };

        assert!(first.await.unwrap().is_err());
        assert!(second.await.unwrap().is_err());
        assert_eq!(host.calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_acquisition() {
        let host = Arc::new(RecordingHost::new());
        let acquirer = ScriptAcquirer::new(host.clone());

        acquirer.acquire("autoMfe", URL).await.unwrap();
        acquirer.invalidate("autoMfe", URL).await;
        acquirer.acquire("autoMfe", URL).await.unwrap();

        assert_eq!(host.calls(), 2);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_share_acquisitions() {
        let host = Arc::new(RecordingHost::new());
        let acquirer = ScriptAcquirer::new(host.clone());

        acquirer.acquire("autoMfe", URL).await.unwrap();
        acquirer
            .acquire("homeMfe", "http://localhost:3001/remoteEntry.js")
            .await
            .unwrap();

        assert_eq!(host.calls(), 2);
    }
}
