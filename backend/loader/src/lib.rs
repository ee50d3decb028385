//! `modfed-loader` — the remote-module loading runtime.
//!
//! Fetches independently deployed UI bundles at runtime, validates their
//! origin against the active environment policy, executes each entry script
//! exactly once, waits for the bundle to publish its container, negotiates
//! the shared dependency scope, caches initialized containers, and resolves
//! named modules into component handles. Consumers drive the pipeline
//! through [`RemoteLoadBinding`].

pub mod binding;
pub mod http_host;
pub mod loader;
pub mod origin;
pub mod readiness;
pub mod registry;
pub mod resolver;
pub mod script;
pub mod share;

#[cfg(test)]
pub(crate) mod testutil;

pub use binding::{LoadState, RemoteLoadBinding};
pub use http_host::{BundleExecutor, HttpScriptHost};
pub use loader::RemoteModuleLoader;
pub use origin::validate_remote_url;
pub use readiness::{PollPolicy, wait_for_container};
pub use registry::ContainerRegistry;
pub use resolver::resolve_module;
pub use script::{DEFAULT_GRACE_WINDOW, ScriptAcquirer, ScriptHost};
pub use share::SharedScopeNegotiator;
