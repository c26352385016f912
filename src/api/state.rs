use std::sync::Arc;

use crate::{
    db::{profiles::InMemoryProfileStore, ProfileStore},
    services::{CatalogClient, ImageUrls, RecommendationEngine},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub engine: RecommendationEngine,
    pub images: ImageUrls,
}

impl AppState {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        catalog: Arc<dyn CatalogClient>,
        images: ImageUrls,
    ) -> Self {
        Self {
            profiles,
            engine: RecommendationEngine::new(catalog),
            images,
        }
    }

    /// State backed by an in-memory profile store, for tests and local runs
    pub fn in_memory(catalog: Arc<dyn CatalogClient>) -> Self {
        Self::new(
            Arc::new(InMemoryProfileStore::new()),
            catalog,
            ImageUrls::new("https://image.tmdb.org/t/p"),
        )
    }
}
