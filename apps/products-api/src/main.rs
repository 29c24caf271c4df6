//! Products API - REST and gRPC server for the product inventory

use axum_helpers::server::{create_production_app, ShutdownCoordinator};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::{
    InMemoryProductStore, PgProductStore, ProductRepository, ProductService,
    ProductStoreRepository,
};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

mod api;
mod config;
mod grpc;
mod openapi;
mod state;

use config::{Config, StoreKind};
use state::AppState;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        app = config.app.name,
        version = config.app.version,
        store = ?config.store,
        "Starting Products API"
    );

    match config.store {
        StoreKind::Memory => {
            warn!("Using the in-memory product store, data is lost on restart");
            let repository = ProductStoreRepository::new(InMemoryProductStore::new());
            serve(config, repository, async {
                info!("Shutting down: nothing to close for the in-memory store");
            })
            .await?;
        }
        StoreKind::Postgres => {
            let postgres = config
                .postgres
                .clone()
                .ok_or_else(|| eyre::eyre!("PostgreSQL store selected without a DATABASE_URL"))?;

            info!("Connecting to PostgreSQL");
            let db = database::postgres::connect_from_config_with_retry(postgres, None).await?;

            if config.run_migrations {
                database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
                    .await?;
            }

            let repository = ProductStoreRepository::new(PgProductStore::new(db.clone()));
            serve(config, repository, async move {
                info!("Shutting down: closing database connections");
                match db.close().await {
                    Ok(()) => info!("PostgreSQL connection closed successfully"),
                    Err(e) => error!("Error closing PostgreSQL: {}", e),
                }
            })
            .await?;
        }
    }

    info!("Products API shutdown complete");
    Ok(())
}

/// Serve REST and gRPC around `repository` until a shutdown signal.
///
/// Both servers stop on the same [`ShutdownCoordinator`]; `cleanup` runs
/// once the gRPC server has drained.
async fn serve<R, F>(config: Config, repository: R, cleanup: F) -> eyre::Result<()>
where
    R: ProductRepository + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState {
        config,
        products: ProductService::new(repository),
    };

    let app = api::app(&state)?;

    let shutdown = ShutdownCoordinator::new();
    let signals = shutdown.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    let grpc_listener = TcpListener::bind(state.config.grpc_address()).await?;
    let grpc_service = grpc::ProductGrpcService::new(state.products.clone());
    let grpc_stopped = shutdown.clone();
    let grpc_server = tokio::spawn(async move {
        let result = grpc::serve(grpc_listener, grpc_service, grpc_stopped.notified()).await;
        if let Err(ref e) = result {
            error!("gRPC server error: {}", e);
            grpc_stopped.shutdown();
        }
        result
    });

    let stop_grpc = shutdown.clone();
    create_production_app(app, &state.config.server, &shutdown, SHUTDOWN_TIMEOUT, async move {
        stop_grpc.shutdown();
        match grpc_server.await {
            Ok(Ok(())) => info!("gRPC server stopped"),
            Ok(Err(_)) => {}
            Err(e) => error!("gRPC server task failed: {}", e),
        }
        cleanup.await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))
}
