//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, InsertedProduct, ListProducts, ProductPage, ReduceOutcome, ReduceProducts,
};
use crate::repository::ProductRepository;

/// Product service providing the inventory use cases
///
/// Validates input, delegates to the repository and logs store failures.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Insert a new product
    #[instrument(skip(self, input), fields(product_name = %input.name, user_id = %input.user_id))]
    pub async fn insert_product(&self, input: CreateProduct) -> ProductResult<InsertedProduct> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let inserted = self
            .repository
            .insert_product(input)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to insert product"))?;

        tracing::info!(product_id = %inserted.id, "Product inserted");
        Ok(inserted)
    }

    /// List products with their window total
    #[instrument(skip(self, query), fields(page = query.page.get(), limit = query.limit.get()))]
    pub async fn list_products(&self, query: ListProducts) -> ProductResult<ProductPage> {
        self.repository
            .list_products(query)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to list products"))
    }

    /// Reduce stock for every item, all-or-nothing
    #[instrument(skip(self, input), fields(items = input.items.len()))]
    pub async fn reduce_products(&self, input: ReduceProducts) -> ProductResult<ReduceOutcome> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let outcome = self
            .repository
            .reduce_products(input)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to reduce products"))?;

        if let ReduceOutcome::InsufficientQuantity { ref product_id } = outcome {
            tracing::info!(%product_id, "Stock reduction refused");
        }
        Ok(outcome)
    }

    /// Readiness of the backing store
    #[instrument(skip(self))]
    pub async fn check_ready(&self) -> ProductResult<()> {
        self.repository
            .ping()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Product store not ready"))
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
