//! API routes module

pub mod health;
pub mod products;

use axum::{routing::get, Router};
use axum_helpers::server::{create_router, health_router};
use domain_products::ProductRepository;

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// API routes without the `/api` prefix, which `create_router` adds.
pub fn routes<R: ProductRepository + 'static>(state: &AppState<R>) -> Router {
    Router::new().nest("/products", products::router(state))
}

/// `/ready`, backed by a store round trip.
pub fn ready_router<R: ProductRepository + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler::<R>))
        .with_state(state)
}

/// The complete application: documented API routes plus `/health` and `/ready`.
pub fn app<R: ProductRepository + 'static>(state: &AppState<R>) -> std::io::Result<Router> {
    let router = create_router::<ApiDoc>(routes(state), &state.config.server)?;

    Ok(router
        .merge(health_router(state.config.app.clone()))
        .merge(ready_router(state.clone())))
}
