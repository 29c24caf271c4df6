//! Products Domain
//!
//! Product inventory: inserting products, paged listing with a window total,
//! and all-or-nothing stock reduction across several products.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, logging
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Transactions, paging math, stop-at-first-shortage
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Store    │  ← PostgreSQL or in-memory
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, PgProductStore, ProductService, ProductStoreRepository};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://localhost/products").await?;
//!
//! let repository = ProductStoreRepository::new(PgProductStore::new(db));
//! let service = ProductService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::{ApiDoc, ListProductsQuery};
pub use memory::InMemoryProductStore;
pub use models::{
    CreateProduct, InsertProductResponse, InsertedProduct, ListProducts, ListingMeta, Product,
    ProductPage, ReduceOutcome, ReduceProducts, ReduceResponse, ReductionItem,
};
pub use postgres::PgProductStore;
pub use repository::{ProductRepository, ProductStoreRepository};
pub use service::ProductService;
pub use store::{ProductRow, ProductSelection, ProductStore, StoreTransaction};
