use thiserror::Error;

/// Typed failure taxonomy for the remote-module loading pipeline.
///
/// Every pipeline stage folds its failure into exactly one of these variants
/// before it reaches a load binding. Variants carry owned strings rather than
/// source chains so that a settled outcome can be cloned to every caller that
/// awaited the same deduplicated attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The remote URL string could not be parsed at all.
    #[error("invalid remote URL: {url}")]
    InvalidUrl { url: String },

    /// Protocol or origin policy rejected the remote before any network access.
    #[error("security policy rejected remote: {reason}")]
    SecurityViolation { url: String, reason: String },

    /// The remote entry script failed to download or execute.
    #[error("remote script failed to load from {url}: {reason}")]
    ScriptLoadFailure { url: String, reason: String },

    /// The script executed but never published a container under its scope.
    #[error("remote container \"{scope}\" not found at {url}")]
    ContainerNotFound { scope: String, url: String },

    /// The container does not expose the requested module.
    #[error("module \"{module}\" not found in container \"{scope}\"")]
    ModuleNotFound { scope: String, module: String },

    /// The module factory failed while instantiating the component.
    #[error("module factory for \"{module}\" failed: {reason}")]
    FactoryError { module: String, reason: String },
}

impl LoadError {
    /// Generic user-facing text, identical across variants so that security
    /// failures disclose no origin or allowlist detail to the UI.
    pub fn user_message(&self) -> &'static str {
        "Failed to load remote component"
    }

    /// Whether a `retry()` on the owning binding has a chance of succeeding
    /// with the same descriptor.
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::InvalidUrl { .. } | LoadError::SecurityViolation { .. } => false,
            LoadError::ScriptLoadFailure { .. }
            | LoadError::ContainerNotFound { .. }
            | LoadError::ModuleNotFound { .. }
            | LoadError::FactoryError { .. } => true,
        }
    }
}
