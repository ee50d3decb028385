//! Module resolution: named entry point → instantiated component handle.

use modfed_core::{ComponentHandle, LoadError, RemoteContainer};
use tracing::debug;

/// Retrieve `module_name` from an initialized container and instantiate it.
///
/// Each call re-invokes the factory; factories are not assumed to be pure,
/// so nothing at this layer memoizes their results.
pub async fn resolve_module(
    container: &dyn RemoteContainer,
    scope: &str,
    module_name: &str,
) -> Result<ComponentHandle, LoadError> {
    let factory = match container.get(module_name).await {
        Ok(factory) => factory,
        Err(error) => {
            debug!(scope = %scope, module = %module_name, error = %error, "Container rejected module request");
            return Err(LoadError::ModuleNotFound {
                scope: scope.to_string(),
                module: module_name.to_string(),
            });
        }
    };

    let module = factory().map_err(|error| LoadError::FactoryError {
        module: module_name.to_string(),
        reason: error.to_string(),
    })?;

    Ok(module.default)
}
