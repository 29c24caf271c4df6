//! Handler tests for Products domain
//!
//! These tests drive the products router over the in-memory store:
//! - Request deserialization and validation
//! - Response bodies and status codes
//! - Error responses
//!
//! Only the domain router is exercised here, not the full application with
//! CORS, timeouts and health endpoints.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::ErrorResponse;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::json;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app(store: InMemoryProductStore) -> Router {
    handlers::router(ProductService::new(ProductStoreRepository::new(store)))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn product(id: &str, qty: i32) -> Product {
    Product {
        id: id.to_string(),
        user_id: "u1".to_string(),
        name: format!("product {id}"),
        description: String::new(),
        price: 10.0,
        qty,
    }
}

#[tokio::test]
async fn test_insert_product_handler_returns_201() {
    let store = InMemoryProductStore::new();
    let builder = TestDataBuilder::from_test_name("handler_insert_201");

    let response = app(store.clone())
        .oneshot(post_json(
            "/",
            json!({
                "user_id": builder.user_id(),
                "name": builder.name("product", "widget"),
                "description": "Handler test",
                "price": 19.99,
                "qty": 7
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: InsertProductResponse = json_body(response.into_body()).await;
    assert!(!body.id.is_empty());
    assert_eq!(body.msg, format!("Product inserted successfully: {}", body.id));
    assert_eq!(store.quantity_of(&body.id).await, Some(7));
}

#[tokio::test]
async fn test_insert_product_handler_validates_input() {
    let store = InMemoryProductStore::new();

    let response = app(store.clone())
        .oneshot(post_json(
            "/",
            json!({
                "user_id": "u1",
                "name": "",  // Invalid!
                "price": 1.0,
                "qty": 1
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "VALIDATION_ERROR");
    assert!(store.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_insert_product_handler_rejects_negative_qty() {
    let response = app(InMemoryProductStore::new())
        .oneshot(post_json(
            "/",
            json!({ "user_id": "u1", "name": "Widget", "price": 1.0, "qty": -1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_products_handler_defaults_paging() {
    let store = InMemoryProductStore::with_products((1..=12).map(|i| product(&format!("p{i}"), i)));

    let response = app(store).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.meta.total_data, 12);
    assert_eq!(page.meta.total_page, 2);
    assert_eq!(page.meta.current_page, 1);
    assert_eq!(page.meta.limit, 10);
}

#[tokio::test]
async fn test_list_products_handler_replaces_non_positive_paging() {
    let store = InMemoryProductStore::with_products((1..=3).map(|i| product(&format!("p{i}"), i)));

    let response = app(store)
        .oneshot(get("/?page=0&limit=-4"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.meta.current_page, 1);
    assert_eq!(page.meta.limit, 10);
    assert_eq!(page.items.len(), 3);
}

#[tokio::test]
async fn test_list_products_handler_second_page() {
    let store = InMemoryProductStore::with_products((1..=5).map(|i| product(&format!("p{i}"), i)));

    let response = app(store)
        .oneshot(get("/?page=2&limit=2"))
        .await
        .unwrap();

    let page: ProductPage = json_body(response.into_body()).await;
    let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p3", "p4"]);
    assert_eq!(page.meta.total_data, 5);
    assert_eq!(page.meta.total_page, 3);
    assert_eq!(page.meta.current_page, 2);
}

#[tokio::test]
async fn test_list_products_handler_by_ids() {
    let store = InMemoryProductStore::with_products((1..=5).map(|i| product(&format!("p{i}"), i)));

    let response = app(store)
        .oneshot(get("/?product_ids=p4,p1,missing&limit=1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: ProductPage = json_body(response.into_body()).await;
    let mut ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, ["p1", "p4"]);
    assert_eq!(page.meta.total_data, 2);
}

#[tokio::test]
async fn test_list_products_handler_rejects_non_numeric_page() {
    let response = app(InMemoryProductStore::new())
        .oneshot(get("/?page=abc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "INVALID_QUERY");
}

#[tokio::test]
async fn test_reduce_products_handler_success() {
    let store = InMemoryProductStore::with_products([product("p1", 10), product("p2", 5)]);

    let response = app(store.clone())
        .oneshot(post_json(
            "/reduce",
            json!({ "items": [
                { "product_id": "p1", "qty": 3 },
                { "product_id": "p2", "qty": 2 }
            ]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ReduceResponse = json_body(response.into_body()).await;
    assert!(body.success);
    assert_eq!(body.msg, "Product quantity reduced successfully");
    assert_eq!(body.product_id, None);
    assert_eq!(store.quantity_of("p1").await, Some(7));
    assert_eq!(store.quantity_of("p2").await, Some(3));
}

#[tokio::test]
async fn test_reduce_products_handler_insufficient() {
    let store = InMemoryProductStore::with_products([product("p1", 10), product("p2", 3)]);

    let response = app(store.clone())
        .oneshot(post_json(
            "/reduce",
            json!({ "items": [
                { "product_id": "p1", "qty": 5 },
                { "product_id": "p2", "qty": 5 }
            ]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "msg": "Product quantity not sufficient",
            "product_id": "p2"
        })
    );
    assert_eq!(store.quantity_of("p1").await, Some(10));
    assert_eq!(store.quantity_of("p2").await, Some(3));
}

#[tokio::test]
async fn test_reduce_products_handler_validates_items() {
    let store = InMemoryProductStore::with_products([product("p1", 10)]);

    for body in [
        json!({ "items": [] }),
        json!({ "items": [{ "product_id": "p1", "qty": 0 }] }),
        json!({ "items": [{ "product_id": "", "qty": 1 }] }),
    ] {
        let response = app(store.clone())
            .oneshot(post_json("/reduce", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    assert_eq!(store.quantity_of("p1").await, Some(10));
}

#[tokio::test]
async fn test_reduce_products_handler_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/reduce")
        .header("content-type", "application/json")
        .body(Body::from("{"))
        .unwrap();

    let response = app(InMemoryProductStore::new()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "INVALID_JSON");
}
