//! In-process product store.
//!
//! A transaction holds the table's write lock from `begin` until it is
//! committed or dropped, so writers are serialized the way row locks
//! serialize conflicting updates in PostgreSQL. Listings take the read lock
//! and only ever see committed rows.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product};
use crate::store::{ProductRow, ProductSelection, ProductStore, StoreTransaction};

/// Rows are kept in insertion order, which doubles as creation order.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    rows: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `products`, in the given order.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(products.into_iter().collect())),
        }
    }

    /// Committed stock of one product
    pub async fn quantity_of(&self, product_id: &str) -> Option<i32> {
        self.rows
            .read()
            .await
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.qty)
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.rows.read().await.clone()
    }
}

fn to_rows<'a>(products: impl Iterator<Item = &'a Product>, total: usize) -> Vec<ProductRow> {
    let total_data = i64::try_from(total).unwrap_or(i64::MAX);
    products
        .map(|p| ProductRow {
            total_data,
            id: p.id.clone(),
            user_id: p.user_id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price,
            qty: p.qty,
        })
        .collect()
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> ProductResult<MemoryTransaction> {
        let guard = self.rows.clone().write_owned().await;
        let staged = guard.clone();
        Ok(MemoryTransaction { guard, staged })
    }

    async fn select_products(&self, selection: &ProductSelection) -> ProductResult<Vec<ProductRow>> {
        let rows = self.rows.read().await;

        let selected = match selection {
            ProductSelection::Window { limit, offset } => {
                let skip = usize::try_from(*offset).unwrap_or(usize::MAX);
                let take = usize::try_from(*limit).unwrap_or(usize::MAX);
                to_rows(rows.iter().skip(skip).take(take), rows.len())
            }
            ProductSelection::Ids(ids) => {
                let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
                let matching: Vec<&Product> = rows
                    .iter()
                    .filter(|p| wanted.contains(p.id.as_str()))
                    .collect();
                to_rows(matching.iter().copied(), matching.len())
            }
        };

        Ok(selected)
    }

    async fn ping(&self) -> ProductResult<()> {
        Ok(())
    }
}

/// Writes go to `staged`; commit swaps them into the table.
pub struct MemoryTransaction {
    guard: OwnedRwLockWriteGuard<Vec<Product>>,
    staged: Vec<Product>,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn insert_product(&mut self, input: &CreateProduct) -> ProductResult<String> {
        if input.qty < 0 {
            return Err(ProductError::Database("qty must be non-negative".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        self.staged.push(Product {
            id: id.clone(),
            user_id: input.user_id.clone(),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            qty: input.qty,
        });
        Ok(id)
    }

    async fn decrement_quantity(&mut self, product_id: &str, delta: i32) -> ProductResult<u64> {
        match self
            .staged
            .iter_mut()
            .find(|p| p.id == product_id && p.qty >= delta)
        {
            Some(product) => {
                product.qty -= delta;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn commit(self) -> ProductResult<()> {
        let MemoryTransaction { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self) -> ProductResult<()> {
        Ok(())
    }
}
