//! Application state management

use domain_products::{ProductRepository, ProductService};

/// Shared application state
///
/// Generic over the repository so the same routes serve either store.
pub struct AppState<R: ProductRepository> {
    pub config: crate::config::Config,
    pub products: ProductService<R>,
}

impl<R: ProductRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            products: self.products.clone(),
        }
    }
}
