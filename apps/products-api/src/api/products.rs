//! Products API routes

use axum::Router;
use domain_products::{handlers, ProductRepository};

use crate::state::AppState;

/// Create products router
pub fn router<R: ProductRepository + 'static>(state: &AppState<R>) -> Router {
    handlers::router(state.products.clone())
}
