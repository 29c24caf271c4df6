//! Router assembly, health endpoints and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{
//!     create_production_app, create_router, health_router, ShutdownCoordinator,
//! };
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes, &config.server)?
//!     .merge(health_router(app_info!()));
//!
//! // Other servers in the process wait on `shutdown.notified()` too.
//! let shutdown = ShutdownCoordinator::new();
//! let signals = shutdown.clone();
//! tokio::spawn(async move { signals.wait_for_signal().await });
//!
//! create_production_app(router, &config.server, &shutdown, Duration::from_secs(30), async move {
//!     db.close().await.ok();
//! })
//! .await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
