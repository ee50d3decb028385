//! `modfed-config` — configuration surface for the modfed host.
//!
//! Provides:
//! - Typed schema for the remote-products document
//! - Fetch-once feed with a built-in fallback product list
//! - Environment mode / origin policy resolution from process env

pub mod environment;
pub mod feed;
pub mod schema;

pub use environment::{mode_from_env, mode_from_value, policy_from_env, ENV_VAR};
pub use feed::{fallback_config, ConfigFeed};
pub use schema::{RemoteConfig, RemoteProductConfig};
