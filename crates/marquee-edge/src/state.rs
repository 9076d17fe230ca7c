//! Shared application state.

use std::sync::Arc;

use marquee_core::BrandDefaults;

use crate::assets::{AssetResolver, HttpAssetResolver};
use crate::config::Config;
use crate::store::{DocumentStore, RestDocumentStore};

/// State shared by every request.
///
/// Generic over the asset and store backends so the pipeline can be driven
/// in tests without a network.
pub struct AppState<A, S> {
    pub config: Arc<Config>,
    pub brand: Arc<BrandDefaults>,
    pub assets: Arc<A>,
    pub store: Arc<S>,
}

// Manual impl: a derive would demand A: Clone and S: Clone, but only the
// Arcs are cloned.
impl<A, S> Clone for AppState<A, S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            brand: Arc::clone(&self.brand),
            assets: Arc::clone(&self.assets),
            store: Arc::clone(&self.store),
        }
    }
}

impl AppState<HttpAssetResolver, RestDocumentStore> {
    /// Builds the production state: an HTTP asset resolver and the REST
    /// document store, sharing one HTTP client.
    pub fn new(config: Config) -> Self {
        let client = reqwest::Client::new();
        let asset_origin = config.asset_origin.clone().unwrap_or_else(|| {
            tracing::warn!(
                fallback = %config.public_base_url,
                "MARQUEE_ASSET_ORIGIN unset, fetching assets from the public base url"
            );
            config.public_base_url.clone()
        });
        let assets = HttpAssetResolver::new(client.clone(), asset_origin);
        let store = RestDocumentStore::new(
            client,
            config.docstore_base_url.clone(),
            config.docstore_project_id.clone(),
            config.docstore_collection.clone(),
        );
        Self::with_parts(config, assets, store)
    }
}

impl<A: AssetResolver, S: DocumentStore> AppState<A, S> {
    /// Assembles state from explicit backends.
    pub fn with_parts(config: Config, assets: A, store: S) -> Self {
        let brand = config.brand();
        Self {
            config: Arc::new(config),
            brand: Arc::new(brand),
            assets: Arc::new(assets),
            store: Arc::new(store),
        }
    }
}
