//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{CatalogService, OrderService};
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<CatalogService>,
    pub order_service: Arc<OrderService>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(
        catalog_service: Arc<CatalogService>,
        order_service: Arc<OrderService>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            catalog_service,
            order_service,
            cache,
        }
    }
}
