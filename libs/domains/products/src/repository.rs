use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, InsertedProduct, ListProducts, ListingMeta, ProductPage, ReduceOutcome,
    ReduceProducts,
};
use crate::store::{ProductSelection, ProductStore, StoreTransaction};

/// Repository trait for product persistence
///
/// Implementations guarantee that `reduce_products` either applies every
/// item or none of them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product inside its own transaction
    async fn insert_product(&self, input: CreateProduct) -> ProductResult<InsertedProduct>;

    /// One page of products, or every product in `query.product_ids`
    async fn list_products(&self, query: ListProducts) -> ProductResult<ProductPage>;

    /// Decrement stock for each item in order, stopping at the first one that
    /// cannot be satisfied
    async fn reduce_products(&self, input: ReduceProducts) -> ProductResult<ReduceOutcome>;

    /// Check that the backing store answers
    async fn ping(&self) -> ProductResult<()>;
}

/// [`ProductRepository`] over any [`ProductStore`]
pub struct ProductStoreRepository<S: ProductStore> {
    store: Arc<S>,
}

impl<S: ProductStore> ProductStoreRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ProductStore> Clone for ProductStoreRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<S: ProductStore> ProductRepository for ProductStoreRepository<S> {
    async fn insert_product(&self, input: CreateProduct) -> ProductResult<InsertedProduct> {
        let mut tx = self.store.begin().await?;
        let id = tx.insert_product(&input).await?;
        tx.commit().await?;

        Ok(InsertedProduct { id })
    }

    async fn list_products(&self, query: ListProducts) -> ProductResult<ProductPage> {
        let selection = match query.product_ids {
            Some(ref ids) if !ids.is_empty() => ProductSelection::Ids(ids.clone()),
            _ => ProductSelection::Window {
                limit: u64::from(query.limit.get()),
                offset: query.offset(),
            },
        };

        let rows = self.store.select_products(&selection).await?;
        let total_data = rows
            .first()
            .map(|row| u64::try_from(row.total_data).unwrap_or(0))
            .unwrap_or(0);

        Ok(ProductPage {
            items: rows.into_iter().map(Into::into).collect(),
            meta: ListingMeta::new(total_data, query.page, query.limit),
        })
    }

    async fn reduce_products(&self, input: ReduceProducts) -> ProductResult<ReduceOutcome> {
        let mut tx = self.store.begin().await?;

        for item in &input.items {
            let affected = tx.decrement_quantity(&item.product_id, item.qty).await?;
            if affected == 0 {
                tracing::debug!(product_id = %item.product_id, qty = item.qty, "Insufficient quantity, rolling back");
                if let Err(e) = tx.rollback().await {
                    tracing::warn!(error = %e, "Rollback after insufficient quantity failed");
                }
                return Ok(ReduceOutcome::InsufficientQuantity {
                    product_id: item.product_id.clone(),
                });
            }
        }

        tx.commit().await?;
        Ok(ReduceOutcome::Reduced)
    }

    async fn ping(&self) -> ProductResult<()> {
        self.store.ping().await
    }
}
