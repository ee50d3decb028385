//! Origin and protocol validation for remote entry URLs.
//!
//! A pure decision function: parse the URL, enforce the production HTTPS
//! requirement, then prefix-match the URL's origin against the active
//! allowlist. Always runs before any network access.

use modfed_core::{LoadError, OriginPolicy};
use tracing::debug;
use url::Url;

pub fn validate_remote_url(policy: &OriginPolicy, raw_url: &str) -> Result<(), LoadError> {
    let parsed = Url::parse(raw_url).map_err(|_| LoadError::InvalidUrl {
        url: raw_url.to_string(),
    })?;

    if policy.mode.is_production() && parsed.scheme() != "https" {
        return Err(LoadError::SecurityViolation {
            url: raw_url.to_string(),
            reason: format!("https required in production, got {}", parsed.scheme()),
        });
    }

    // Default ports are omitted, and opaque origins serialize to "null",
    // which can never match an allowlist entry.
    let origin = parsed.origin().ascii_serialization();
    let allowed = policy
        .allowed_origins
        .iter()
        .any(|entry| origin.starts_with(entry.as_str()));

    if !allowed {
        return Err(LoadError::SecurityViolation {
            url: raw_url.to_string(),
            reason: format!("origin {origin} not in allowlist"),
        });
    }

    debug!(origin = %origin, "Remote origin accepted");
    Ok(())
}
