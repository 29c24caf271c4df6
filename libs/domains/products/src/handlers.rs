//! HTTP handlers for Products API

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse},
    ValidatedJson, ValidatedQuery,
};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};
use validator::Validate;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, InsertProductResponse, ListProducts, ListingMeta, Product, ProductPage,
    ReduceProducts, ReduceResponse, ReductionItem, DEFAULT_LIMIT, DEFAULT_PAGE,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(list_products, insert_product, reduce_products),
    components(
        schemas(
            Product, CreateProduct, InsertProductResponse, ProductPage, ListingMeta,
            ReduceProducts, ReductionItem, ReduceResponse
        ),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Products", description = "Product inventory endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(insert_product))
        .route("/reduce", post(reduce_products))
        .with_state(shared_service)
}

/// Listing query parameters
///
/// Missing or non-positive `page`/`limit` fall back to 1 and 10.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
pub struct ListProductsQuery {
    /// 1-based page number
    pub page: Option<i64>,
    /// Page size
    pub limit: Option<i64>,
    /// Comma-separated product ids; when present, paging is ignored
    pub product_ids: Option<String>,
}

fn positive_or(value: Option<i64>, default: NonZeroU32) -> NonZeroU32 {
    value
        .filter(|v| *v >= 1)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .and_then(NonZeroU32::new)
        .unwrap_or(default)
}

impl From<ListProductsQuery> for ListProducts {
    fn from(query: ListProductsQuery) -> Self {
        let ids: Vec<String> = query
            .product_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        ListProducts {
            page: positive_or(query.page, DEFAULT_PAGE),
            limit: positive_or(query.limit, DEFAULT_LIMIT),
            product_ids: (!ids.is_empty()).then_some(ids),
        }
    }
}

/// List products, paged or by id
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Products with listing metadata", body = ProductPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ListProductsQuery>,
) -> ProductResult<Json<ProductPage>> {
    let page = service.list_products(query.into()).await?;
    Ok(Json(page))
}

/// Insert a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product inserted", body = InsertProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn insert_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let inserted = service.insert_product(input).await?;
    Ok((StatusCode::CREATED, Json(InsertProductResponse::from(inserted))))
}

/// Reduce stock for several products at once
///
/// Either every item is applied or none is. An unsatisfiable item is not an
/// error: the response carries `success = false` and the offending id.
#[utoipa::path(
    post,
    path = "/reduce",
    tag = "Products",
    request_body = ReduceProducts,
    responses(
        (status = 200, description = "Reduction outcome", body = ReduceResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn reduce_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<ReduceProducts>,
) -> ProductResult<Json<ReduceResponse>> {
    let outcome = service.reduce_products(input).await?;
    Ok(Json(outcome.into()))
}
