use crate::cli::{Cli, StorageKind};
use crate::error::{ExplorerError, Result};
use crate::github::GitHubClient;
use crate::messages::Messages;
use crate::pool::{create_pool, PoolConfig, SurrealConnectionConfig};
use crate::storage::{FileStorage, MemoryStorage, Storage, SurrealStorage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub enum StorageConfig {
    Memory,
    File { data_dir: PathBuf },
    Surreal(SurrealConnectionConfig),
}

/// Settings resolved from flags, environment and `.env`.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub storage: StorageConfig,
    pub messages: Messages,
}

impl ExplorerConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let storage = match cli.storage {
            StorageKind::Memory => StorageConfig::Memory,
            StorageKind::File => {
                let data_dir = cli
                    .data_dir
                    .clone()
                    .or_else(FileStorage::default_dir)
                    .ok_or_else(|| {
                        ExplorerError::Storage(
                            "no data directory available, pass --data-dir".to_string(),
                        )
                    })?;
                StorageConfig::File { data_dir }
            }
            StorageKind::Surreal => StorageConfig::Surreal(SurrealConnectionConfig {
                url: cli.db_url.clone(),
                username: cli.db_user.clone(),
                password: cli.db_pass.clone(),
                namespace: cli.db_namespace.clone(),
                database: cli.db_database.clone(),
            }),
        };

        Ok(Self {
            api_url: cli.api_url.clone(),
            token: cli.token.clone(),
            storage,
            messages: Messages::new(cli.locale, cli.error_messages),
        })
    }

    pub fn build_storage(&self) -> Result<Arc<dyn Storage>> {
        let storage: Arc<dyn Storage> = match &self.storage {
            StorageConfig::Memory => Arc::new(MemoryStorage::new()),
            StorageConfig::File { data_dir } => {
                info!(data_dir = %data_dir.display(), "using file storage");
                Arc::new(FileStorage::new(data_dir))
            }
            StorageConfig::Surreal(connection) => {
                info!(url = %connection.url, "using SurrealDB storage");
                let pool = create_pool(connection.clone(), PoolConfig::default())?;
                Arc::new(SurrealStorage::new(Arc::new(pool)))
            }
        };
        Ok(storage)
    }

    pub fn build_client(&self) -> Result<GitHubClient> {
        GitHubClient::new(&self.api_url, self.token.clone())
    }
}
