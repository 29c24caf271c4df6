//! Repository behavior tests for Products domain
//!
//! These run against the in-memory store and check:
//! - Window totals and page math
//! - All-or-nothing stock reduction
//! - Rollback on technical errors
//! - Concurrent reductions never oversell

use async_trait::async_trait;
use domain_products::*;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use test_utils::assertions::*;

fn nz(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn product(id: &str, qty: i32) -> Product {
    Product {
        id: id.to_string(),
        user_id: "u1".to_string(),
        name: format!("product {id}"),
        description: String::new(),
        price: 5.0,
        qty,
    }
}

fn item(product_id: &str, qty: i32) -> ReductionItem {
    ReductionItem {
        product_id: product_id.to_string(),
        qty,
    }
}

fn order(items: Vec<ReductionItem>) -> ReduceProducts {
    ReduceProducts { items }
}

fn seeded(count: usize) -> InMemoryProductStore {
    InMemoryProductStore::with_products((1..=count).map(|i| product(&format!("p{i:02}"), 1)))
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_twenty_rows_gives_two_pages() {
    let repo = ProductStoreRepository::new(seeded(20));

    let page = repo
        .list_products(ListProducts::page(nz(1), nz(10)))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.meta.total_data, 20);
    assert_eq!(page.meta.total_page, 2);
}

#[tokio::test]
async fn test_list_twenty_one_rows_gives_three_pages() {
    let repo = ProductStoreRepository::new(seeded(21));

    let page = repo
        .list_products(ListProducts::page(nz(3), nz(10)))
        .await
        .unwrap();

    let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p21"]);
    assert_eq!(page.meta.total_data, 21);
    assert_eq!(page.meta.total_page, 3);
    assert_eq!(page.meta.current_page, 3);
}

#[tokio::test]
async fn test_list_empty_store() {
    let repo = ProductStoreRepository::new(InMemoryProductStore::new());

    let page = repo.list_products(ListProducts::default()).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.meta.total_data, 0);
    assert_eq!(page.meta.total_page, 1);
    assert_eq!(page.meta.current_page, 1);
    assert_eq!(page.meta.limit, 10);
}

#[tokio::test]
async fn test_list_page_past_the_end_is_empty() {
    let repo = ProductStoreRepository::new(seeded(5));

    let page = repo
        .list_products(ListProducts::page(nz(4), nz(5)))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.meta.total_data, 0);
    assert_eq!(page.meta.total_page, 1);
    assert_eq!(page.meta.current_page, 4);
}

#[tokio::test]
async fn test_list_by_ids_returns_only_matches() {
    let repo = ProductStoreRepository::new(seeded(20));

    let page = repo
        .list_products(ListProducts::by_ids(vec![
            "p03".to_string(),
            "p17".to_string(),
            "unknown".to_string(),
        ]))
        .await
        .unwrap();

    let mut ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, ["p03", "p17"]);
    assert_eq!(page.meta.total_data, 2);
    assert_eq!(page.meta.total_page, 1);
}

#[tokio::test]
async fn test_list_by_empty_ids_falls_back_to_paging() {
    let repo = ProductStoreRepository::new(seeded(12));

    let page = repo
        .list_products(ListProducts::by_ids(Vec::new()))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.meta.total_data, 12);
}

// ============================================================================
// Insert
// ============================================================================

#[tokio::test]
async fn test_insert_then_list_by_id() {
    let store = InMemoryProductStore::new();
    let repo = ProductStoreRepository::new(store.clone());

    let inserted = repo
        .insert_product(CreateProduct {
            user_id: "u9".to_string(),
            name: "Lamp".to_string(),
            description: "desk lamp".to_string(),
            price: 42.0,
            qty: 3,
        })
        .await
        .unwrap();

    let page = repo
        .list_products(ListProducts::by_ids(vec![inserted.id.clone()]))
        .await
        .unwrap();
    let listed = assert_some(page.items.into_iter().next(), "inserted product");

    assert_eq!(listed.id, inserted.id);
    assert_eq!(listed.name, "Lamp");
    assert_eq!(listed.description, "desk lamp");
    assert_qty(store.quantity_of(&inserted.id).await, 3, "Lamp");
}

// ============================================================================
// Reduce
// ============================================================================

#[tokio::test]
async fn test_reduce_applies_every_item() {
    let store = InMemoryProductStore::with_products([product("P1", 10), product("P2", 5)]);
    let repo = ProductStoreRepository::new(store.clone());

    let outcome = repo
        .reduce_products(order(vec![item("P1", 3), item("P2", 2)]))
        .await
        .unwrap();

    assert_eq!(outcome, ReduceOutcome::Reduced);
    assert_qty(store.quantity_of("P1").await, 7, "P1");
    assert_qty(store.quantity_of("P2").await, 3, "P2");
}

#[tokio::test]
async fn test_reduce_is_all_or_nothing() {
    let store = InMemoryProductStore::with_products([product("P1", 10), product("P2", 3)]);
    let repo = ProductStoreRepository::new(store.clone());

    let outcome = repo
        .reduce_products(order(vec![item("P1", 5), item("P2", 5)]))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReduceOutcome::InsufficientQuantity {
            product_id: "P2".to_string()
        }
    );
    assert_qty(store.quantity_of("P1").await, 10, "P1");
    assert_qty(store.quantity_of("P2").await, 3, "P2");
}

#[tokio::test]
async fn test_reduce_unknown_product_is_insufficient() {
    let store = InMemoryProductStore::with_products([product("P1", 10)]);
    let repo = ProductStoreRepository::new(store.clone());

    let outcome = repo
        .reduce_products(order(vec![item("P1", 1), item("ghost", 1)]))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReduceOutcome::InsufficientQuantity {
            product_id: "ghost".to_string()
        }
    );
    assert_qty(store.quantity_of("P1").await, 10, "P1");
}

#[tokio::test]
async fn test_reduce_stops_at_first_insufficient_item() {
    let store = InMemoryProductStore::with_products([
        product("P1", 1),
        product("P2", 1),
        product("P3", 1),
    ]);
    let repo = ProductStoreRepository::new(store);

    let outcome = repo
        .reduce_products(order(vec![item("P1", 1), item("P2", 2), item("P3", 2)]))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReduceOutcome::InsufficientQuantity {
            product_id: "P2".to_string()
        }
    );
}

#[tokio::test]
async fn test_reduce_to_exactly_zero() {
    let store = InMemoryProductStore::with_products([product("P1", 4)]);
    let repo = ProductStoreRepository::new(store.clone());

    assert!(repo
        .reduce_products(order(vec![item("P1", 4)]))
        .await
        .unwrap()
        .is_reduced());
    assert_qty(store.quantity_of("P1").await, 0, "P1");

    let again = repo.reduce_products(order(vec![item("P1", 1)])).await.unwrap();
    assert!(!again.is_reduced());
    assert_qty(store.quantity_of("P1").await, 0, "P1");
}

#[tokio::test]
async fn test_reduce_same_product_twice_in_one_order() {
    let store = InMemoryProductStore::with_products([product("P1", 5)]);
    let repo = ProductStoreRepository::new(store.clone());

    let outcome = repo
        .reduce_products(order(vec![item("P1", 3), item("P1", 3)]))
        .await
        .unwrap();

    assert!(!outcome.is_reduced());
    assert_qty(store.quantity_of("P1").await, 5, "P1");
}

#[tokio::test]
async fn test_concurrent_reductions_never_oversell() {
    let store = InMemoryProductStore::with_products([product("P1", 10)]);
    let repo = ProductStoreRepository::new(store.clone());

    let tasks = (0..5).map(|_| {
        let repo = repo.clone();
        tokio::spawn(async move { repo.reduce_products(order(vec![item("P1", 3)])).await })
    });

    let outcomes: Vec<ReduceOutcome> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let reduced = outcomes.iter().filter(|o| o.is_reduced()).count();
    assert_eq!(reduced, 3);
    assert_qty(store.quantity_of("P1").await, 1, "P1");
}

// ============================================================================
// Technical errors
// ============================================================================

/// Store wrapper that fails on demand.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: InMemoryProductStore,
    fail_decrement_of: Arc<std::sync::Mutex<Option<String>>>,
    fail_commit: Arc<AtomicBool>,
    down: Arc<AtomicBool>,
}

impl FlakyStore {
    fn new(inner: InMemoryProductStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    fn fail_decrement_of(&self, product_id: &str) {
        *self.fail_decrement_of.lock().unwrap() = Some(product_id.to_string());
    }

    fn heal(&self) {
        *self.fail_decrement_of.lock().unwrap() = None;
        self.fail_commit.store(false, Ordering::SeqCst);
        self.down.store(false, Ordering::SeqCst);
    }
}

struct FlakyTransaction {
    inner: <InMemoryProductStore as ProductStore>::Tx,
    fail_decrement_of: Option<String>,
    fail_commit: bool,
}

#[async_trait]
impl ProductStore for FlakyStore {
    type Tx = FlakyTransaction;

    async fn begin(&self) -> ProductResult<FlakyTransaction> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ProductError::Unavailable("connection refused".to_string()));
        }
        let fail_decrement_of = self.fail_decrement_of.lock().unwrap().clone();
        let fail_commit = self.fail_commit.load(Ordering::SeqCst);
        Ok(FlakyTransaction {
            inner: self.inner.begin().await?,
            fail_decrement_of,
            fail_commit,
        })
    }

    async fn select_products(&self, selection: &ProductSelection) -> ProductResult<Vec<ProductRow>> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ProductError::Unavailable("connection refused".to_string()));
        }
        self.inner.select_products(selection).await
    }

    async fn ping(&self) -> ProductResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ProductError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreTransaction for FlakyTransaction {
    async fn insert_product(&mut self, input: &CreateProduct) -> ProductResult<String> {
        self.inner.insert_product(input).await
    }

    async fn decrement_quantity(&mut self, product_id: &str, delta: i32) -> ProductResult<u64> {
        if self.fail_decrement_of.as_deref() == Some(product_id) {
            return Err(ProductError::Database("connection reset by peer".to_string()));
        }
        self.inner.decrement_quantity(product_id, delta).await
    }

    async fn commit(self) -> ProductResult<()> {
        if self.fail_commit {
            return Err(ProductError::Database("could not serialize access".to_string()));
        }
        self.inner.commit().await
    }

    async fn rollback(self) -> ProductResult<()> {
        self.inner.rollback().await
    }
}

#[tokio::test]
async fn test_technical_error_mid_reduction_changes_nothing() {
    let inner = InMemoryProductStore::with_products([product("P1", 10), product("P2", 10)]);
    let store = FlakyStore::new(inner.clone());
    store.fail_decrement_of("P2");
    let repo = ProductStoreRepository::new(store.clone());

    let err = repo
        .reduce_products(order(vec![item("P1", 4), item("P2", 4)]))
        .await
        .unwrap_err();

    assert!(matches!(err, ProductError::Database(_)));
    assert_qty(inner.quantity_of("P1").await, 10, "P1");
    assert_qty(inner.quantity_of("P2").await, 10, "P2");

    // Retrying the same order after recovery applies it exactly once
    store.heal();
    let outcome = repo
        .reduce_products(order(vec![item("P1", 4), item("P2", 4)]))
        .await
        .unwrap();
    assert!(outcome.is_reduced());
    assert_qty(inner.quantity_of("P1").await, 6, "P1");
    assert_qty(inner.quantity_of("P2").await, 6, "P2");
}

#[tokio::test]
async fn test_commit_failure_changes_nothing() {
    let inner = InMemoryProductStore::with_products([product("P1", 10)]);
    let store = FlakyStore::new(inner.clone());
    store.fail_commit.store(true, Ordering::SeqCst);
    let repo = ProductStoreRepository::new(store);

    let err = repo.reduce_products(order(vec![item("P1", 2)])).await.unwrap_err();

    assert!(matches!(err, ProductError::Database(_)));
    assert_qty(inner.quantity_of("P1").await, 10, "P1");
}

#[tokio::test]
async fn test_failed_insert_commit_leaves_no_row() {
    let inner = InMemoryProductStore::new();
    let store = FlakyStore::new(inner.clone());
    store.fail_commit.store(true, Ordering::SeqCst);
    let repo = ProductStoreRepository::new(store);

    let result = repo
        .insert_product(CreateProduct {
            user_id: "u1".to_string(),
            name: "Widget".to_string(),
            description: String::new(),
            price: 1.0,
            qty: 1,
        })
        .await;

    assert!(result.is_err());
    assert!(inner.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_store_is_reported_as_unavailable() {
    let store = FlakyStore::new(InMemoryProductStore::new());
    store.down.store(true, Ordering::SeqCst);
    let repo = ProductStoreRepository::new(store);

    assert!(matches!(repo.ping().await, Err(ProductError::Unavailable(_))));
    assert!(matches!(
        repo.list_products(ListProducts::default()).await,
        Err(ProductError::Unavailable(_))
    ));
    assert!(matches!(
        repo.reduce_products(order(vec![item("P1", 1)])).await,
        Err(ProductError::Unavailable(_))
    ));
}
