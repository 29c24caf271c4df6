//! Storage capability the repository runs against.
//!
//! A store hands out transactions for writes and runs listing queries
//! directly. Transactions that are dropped without [`StoreTransaction::commit`]
//! leave the store unchanged.

use async_trait::async_trait;
use sea_orm::FromQueryResult;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product};

/// Which rows a listing reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSelection {
    /// One page in creation order
    Window { limit: u64, offset: u64 },
    /// Every product whose id is in the set, unpaged
    Ids(Vec<String>),
}

/// A listed product plus the window count of all rows matching the selection.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ProductRow {
    pub total_data: i64,
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub qty: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            price: row.price,
            qty: row.qty,
        }
    }
}

#[async_trait]
pub trait ProductStore: Send + Sync + 'static {
    type Tx: StoreTransaction;

    async fn begin(&self) -> ProductResult<Self::Tx>;

    async fn select_products(&self, selection: &ProductSelection) -> ProductResult<Vec<ProductRow>>;

    /// Cheap round trip used by readiness checks
    async fn ping(&self) -> ProductResult<()>;
}

#[async_trait]
pub trait StoreTransaction: Send {
    /// Insert one product and return its generated id.
    async fn insert_product(&mut self, input: &CreateProduct) -> ProductResult<String>;

    /// `qty = qty - delta` when the product exists and holds at least `delta`.
    ///
    /// Returns the number of rows changed: 0 when the product is missing or short.
    async fn decrement_quantity(&mut self, product_id: &str, delta: i32) -> ProductResult<u64>;

    async fn commit(self) -> ProductResult<()>;

    async fn rollback(self) -> ProductResult<()>;
}
