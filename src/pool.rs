use deadpool::{managed, Runtime};
use std::time::Duration;

use crate::error::ExplorerError;
use crate::surreal_client::SurrealClient;

#[derive(Debug, Clone)]
pub struct SurrealConnectionConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
}

#[derive(Debug)]
pub struct SurrealConnectionManager {
    config: SurrealConnectionConfig,
}

impl SurrealConnectionManager {
    pub fn new(config: SurrealConnectionConfig) -> Self {
        Self { config }
    }
}

impl managed::Manager for SurrealConnectionManager {
    type Type = SurrealClient;
    type Error = ExplorerError;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        let config = &self.config;
        SurrealClient::new(
            &config.url,
            &config.username,
            &config.password,
            &config.namespace,
            &config.database,
        )
        .await
        .map_err(|e| ExplorerError::Storage(format!("Failed to connect: {:#}", e)))
    }

    async fn recycle(
        &self,
        conn: &mut Self::Type,
        _: &managed::Metrics,
    ) -> managed::RecycleResult<Self::Error> {
        conn.ping().await.map_err(|e| {
            managed::RecycleError::Backend(ExplorerError::Storage(format!(
                "Failed to recycle connection: {}",
                e
            )))
        })
    }
}

pub type SurrealPool = managed::Pool<SurrealConnectionManager>;

#[derive(Clone)]
pub struct PoolConfig {
    pub max_size: usize,
    pub connection_timeout: Duration,
    pub recycle_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        // A single local user rarely needs more than a couple of connections
        Self {
            max_size: 4,
            connection_timeout: Duration::from_secs(30),
            recycle_timeout: Some(Duration::from_secs(10)),
        }
    }
}

pub fn create_pool(
    connection_config: SurrealConnectionConfig,
    pool_config: PoolConfig,
) -> Result<SurrealPool, ExplorerError> {
    let manager = SurrealConnectionManager::new(connection_config);

    managed::Pool::builder(manager)
        .max_size(pool_config.max_size)
        .runtime(Runtime::Tokio1)
        .create_timeout(Some(pool_config.connection_timeout))
        .recycle_timeout(pool_config.recycle_timeout)
        .build()
        .map_err(|e| ExplorerError::Storage(format!("Failed to create connection pool: {}", e)))
}
