//! Environment mode resolution.

use modfed_core::{EnvironmentMode, OriginPolicy};

/// Environment variable selecting the origin-policy mode.
pub const ENV_VAR: &str = "MODFED_ENV";

/// Resolve the environment mode from an optional variable value. Anything
/// other than `production` (case-insensitive) selects development policy.
pub fn mode_from_value(value: Option<&str>) -> EnvironmentMode {
    match value {
        Some(v) if v.eq_ignore_ascii_case("production") => EnvironmentMode::Production,
        _ => EnvironmentMode::Development,
    }
}

/// Resolve the active environment mode from the process environment.
pub fn mode_from_env() -> EnvironmentMode {
    mode_from_value(std::env::var(ENV_VAR).ok().as_deref())
}

/// The default origin policy for the active environment.
pub fn policy_from_env() -> OriginPolicy {
    OriginPolicy::defaults_for(mode_from_env())
}
