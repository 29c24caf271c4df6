//! Configuration for Products API

use core_config::{
    app_info, env_or_default, env_parse, server::ServerConfig, AppInfo, ConfigError, FromEnv,
};
use database::postgres::PostgresConfig;
use std::str::FromStr;

const DEFAULT_GRPC_PORT: u16 = 50051;

pub use core_config::Environment;

/// Backing store for products
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    /// Process-local, lost on restart
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" | "in-memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store '{other}', expected 'postgres' or 'memory'")),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    /// gRPC listens on `server.host` at this port
    pub grpc_port: u16,
    pub store: StoreKind,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
    /// Present when `store` is [`StoreKind::Postgres`]
    pub postgres: Option<PostgresConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let store: StoreKind = env_or_default("PRODUCTS_STORE", "postgres")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "PRODUCTS_STORE".to_string(),
                details,
            })?;

        let postgres = match store {
            StoreKind::Postgres => Some(PostgresConfig::from_env()?),
            StoreKind::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            grpc_port: env_parse("GRPC_PORT", DEFAULT_GRPC_PORT)?,
            store,
            run_migrations: env_parse("RUN_MIGRATIONS", true)?,
            postgres,
        })
    }

    pub fn grpc_address(&self) -> String {
        format!("{}:{}", self.server.host, self.grpc_port)
    }
}
