//! Consumer-facing load binding.
//!
//! Owns the {Idle, Loading, Ready, Failed} state for one remote descriptor.
//! State is private to its binding: two bindings over the same remote share
//! the loader's caches but never a state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use modfed_core::{ComponentHandle, LoadError, RemoteDescriptor};
use tokio::sync::watch;
use tracing::debug;

use crate::loader::RemoteModuleLoader;

/// Load attempt state. Transitions within one attempt are monotonic:
/// Loading precedes exactly one of Ready or Failed; a retry starts a new
/// attempt rather than resuming the old one.
#[derive(Debug, Clone)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(ComponentHandle),
    Failed(LoadError),
}

impl LoadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Ready(_) | LoadState::Failed(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn component(&self) -> Option<&ComponentHandle> {
        match self {
            LoadState::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

pub struct RemoteLoadBinding {
    loader: Arc<RemoteModuleLoader>,
    descriptor: RemoteDescriptor,
    state_tx: Arc<watch::Sender<LoadState>>,
    attempt: Arc<AtomicU64>,
}

impl RemoteLoadBinding {
    pub fn new(loader: Arc<RemoteModuleLoader>, descriptor: RemoteDescriptor) -> Self {
        let (state_tx, _) = watch::channel(LoadState::Idle);
        Self {
            loader,
            descriptor,
            state_tx: Arc::new(state_tx),
            attempt: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn descriptor(&self) -> &RemoteDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> LoadState {
        self.state_tx.borrow().clone()
    }

    /// Observe state transitions without polling.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state_tx.subscribe()
    }

    /// Begin a load attempt from Idle or Failed; a no-op (returning false)
    /// from Loading or Ready.
    ///
    /// The pipeline runs on a spawned task holding only a weak handle to the
    /// binding's state: dropping the binding lets the underlying acquisition
    /// settle, but its result is discarded on arrival. A result from an
    /// attempt superseded by a later `start` is likewise discarded.
    pub fn start(&self) -> bool {
        let startable = matches!(&*self.state_tx.borrow(), LoadState::Idle | LoadState::Failed(_));
        if !startable {
            return false;
        }

        let this_attempt = self.attempt.fetch_add(1, Ordering::SeqCst) + 1;
        self.state_tx.send_replace(LoadState::Loading);

        let loader = self.loader.clone();
        let descriptor = self.descriptor.clone();
        let attempt = self.attempt.clone();
        let state_tx = Arc::downgrade(&self.state_tx);
        tokio::spawn(async move {
            let result = loader.load(&descriptor).await;
            let Some(state_tx) = state_tx.upgrade() else {
                debug!(scope = %descriptor.scope, "Binding disposed, discarding load result");
                return;
            };
            if attempt.load(Ordering::SeqCst) != this_attempt {
                debug!(scope = %descriptor.scope, "Attempt superseded, discarding load result");
                return;
            }
            let next = match result {
                Ok(handle) => LoadState::Ready(handle),
                Err(error) => LoadState::Failed(error),
            };
            state_tx.send_replace(next);
        });
        true
    }

    /// Wait for the current attempt to reach Ready or Failed. Call after
    /// `start`; an Idle binding that is never started waits indefinitely.
    pub async fn wait(&self) -> LoadState {
        let mut rx = self.state_tx.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if current.is_terminal() {
                return current;
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }

    /// From Failed only: invalidate every cache layer for this remote and
    /// start a fresh attempt.
    pub async fn retry(&self) -> bool {
        if !matches!(&*self.state_tx.borrow(), LoadState::Failed(_)) {
            debug!(scope = %self.descriptor.scope, "Retry ignored, binding is not in a failed state");
            return false;
        }
        self.loader
            .invalidate(&self.descriptor.scope, &self.descriptor.url)
            .await;
        self.start()
    }
}
