//! Bounded polling for container publication.
//!
//! An executed bundle registers its container under its scope name, but
//! nothing ties that registration to the script's load signal; it may land
//! on a later tick of the event loop. Rather than demanding a richer remote
//! contract, poll the directory on a fixed interval with a bounded attempt
//! count and let the caller turn exhaustion into a typed failure.

use std::sync::Arc;
use std::time::Duration;

use modfed_core::{ContainerDirectory, RemoteContainer};
use tracing::debug;

/// Poll cadence for container readiness. Tests inject near-zero intervals.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_attempts: 10,
        }
    }
}

/// Wait until a container is published under `scope`, or exhaust the policy.
///
/// Looks up immediately, then sleeps `interval` between attempts, for
/// `max_attempts` lookups in total.
pub async fn wait_for_container(
    directory: &dyn ContainerDirectory,
    scope: &str,
    policy: &PollPolicy,
) -> Option<Arc<dyn RemoteContainer>> {
    for attempt in 1..=policy.max_attempts {
        if let Some(container) = directory.lookup(scope).await {
            debug!(scope = %scope, attempt, "Remote container ready");
            return Some(container);
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    None
}
