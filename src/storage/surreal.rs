use super::Storage;
use crate::error::{ExplorerError, Result};
use crate::pool::SurrealPool;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage entries kept as rows of the `kv` table in SurrealDB.
#[derive(Clone)]
pub struct SurrealStorage {
    pool: Arc<SurrealPool>,
}

impl SurrealStorage {
    pub fn new(pool: Arc<SurrealPool>) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<deadpool::managed::Object<crate::pool::SurrealConnectionManager>> {
        self.pool
            .get()
            .await
            .map_err(|e| ExplorerError::Storage(format!("Failed to get connection from pool: {}", e)))
    }
}

#[async_trait]
impl Storage for SurrealStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connection().await?;
        conn.get_value(key)
            .await
            .map_err(|e| ExplorerError::Storage(format!("{:#}", e)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connection().await?;
        conn.set_value(key, value)
            .await
            .map_err(|e| ExplorerError::Storage(format!("{:#}", e)))
    }

    fn name(&self) -> &'static str {
        "surrealdb"
    }
}
