use std::sync::Arc;

use crate::services::providers::{CatalogProvider, KeywordProvider};
use crate::services::SearchService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    pub catalog: Arc<dyn CatalogProvider>,
}

impl AppState {
    /// Wires the search service over the given data sources
    pub fn new(catalog: Arc<dyn CatalogProvider>, archive: Arc<dyn KeywordProvider>) -> Self {
        let search = Arc::new(SearchService::new(Arc::clone(&catalog), archive));
        Self { search, catalog }
    }
}
