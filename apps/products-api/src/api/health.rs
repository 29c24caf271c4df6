//! Readiness check against the product store

use axum::{extract::State, response::Response};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use domain_products::ProductRepository;

use crate::state::AppState;

/// 200 when the store answers, 503 otherwise.
pub async fn ready_handler<R: ProductRepository>(State(state): State<AppState<R>>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "store",
        Box::pin(async {
            state
                .products
                .check_ready()
                .await
                .map_err(|e| format!("Store ping failed: {}", e))
        }),
    )];

    run_health_checks(checks).await
}
