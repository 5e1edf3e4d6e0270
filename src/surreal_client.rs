use anyhow::{ Context, Result };
use serde::{ Deserialize, Serialize };
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::{ RecordId, Surreal };
use tracing::{ debug, info };

/// Table holding one row per storage key.
pub const KV_TABLE: &str = "kv";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KvEntry {
    value: String,
}

#[derive(Clone, Debug)]
pub struct SurrealClient {
    pub db: Surreal<Any>,
}

impl SurrealClient {
    /// Create a new SurrealDB client
    pub async fn new(
        connection_url: &str,
        username: &str,
        password: &str,
        namespace: &str,
        database: &str
    ) -> Result<Self> {
        info!("Connecting to SurrealDB at {}", connection_url);

        let db: Surreal<Any> = Surreal::init();
        db.connect(connection_url).await.context("Failed to connect to SurrealDB")?;

        db
            .signin(Root { username, password }).await
            .context("Failed to authenticate with SurrealDB")?;

        db
            .use_ns(namespace)
            .use_db(database).await
            .context("Failed to select namespace and database")?;

        info!("Successfully connected to SurrealDB");
        Ok(Self { db })
    }

    fn record_id(key: &str) -> RecordId {
        RecordId::from((KV_TABLE, key.to_string()))
    }

    /// Read the value stored under `key`, if any
    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let mut result = self.db
            .query("SELECT value FROM $id")
            .bind(("id", Self::record_id(key))).await
            .context("Failed to read storage entry")?;

        let rows: Vec<KvEntry> = result.take(0)?;
        debug!(key, found = !rows.is_empty(), "storage entry read");
        Ok(rows.into_iter().next().map(|row| row.value))
    }

    /// Create or replace the value stored under `key`
    pub async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .query("UPSERT $id CONTENT $content")
            .bind(("id", Self::record_id(key)))
            .bind(("content", KvEntry { value: value.to_string() })).await
            .context("Failed to write storage entry")?
            .check()
            .context("Storage write rejected")?;

        debug!(key, bytes = value.len(), "storage entry written");
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        self.db.query("SELECT 1").await.context("SurrealDB ping failed")?;
        Ok(())
    }
}
