//! Telemetry and structured logging components for the modfed host.
//!
//! Handles log redaction, JSON output generation, and file rotation.

pub mod logger;
pub mod redact;

pub use logger::{init_console, init_logger};
pub use redact::redact_remote_refs;
