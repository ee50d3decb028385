//! Typed schema for the remote-products configuration document.

use modfed_core::{EntryModule, RemoteDescriptor};
use serde::{Deserialize, Serialize};

/// One product entry in the configuration feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProductConfig {
    pub id: String,
    /// Display name shown in the product selector.
    pub name: String,
    /// Global name the product's container registers under.
    pub scope: String,
    /// Absolute URL of the product's remote entry script.
    pub url: String,
    pub enabled: bool,
}

impl RemoteProductConfig {
    /// Build the loader descriptor for one of the wizard entry points.
    pub fn descriptor(&self, entry: EntryModule) -> RemoteDescriptor {
        RemoteDescriptor::new(&self.url, &self.scope, entry.as_str())
    }
}

/// The configuration document: `{ "products": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub products: Vec<RemoteProductConfig>,
}

impl RemoteConfig {
    pub fn enabled_products(&self) -> Vec<&RemoteProductConfig> {
        self.products.iter().filter(|product| product.enabled).collect()
    }

    pub fn product(&self, id: &str) -> Option<&RemoteProductConfig> {
        self.products.iter().find(|product| product.id == id)
    }
}
