use crate::error::Result;
use crate::storage::Storage;
use crate::types::RepositoryRef;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Key under which the serialized repository list lives.
pub const STORAGE_KEY: &str = "@GithubExplorer:repositories";

/// Result of reading the persisted list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedList {
    pub repositories: Vec<RepositoryRef>,
    /// Set when stored data existed but could not be parsed; the list is then empty.
    pub diagnostic: Option<String>,
}

pub async fn load(storage: &dyn Storage) -> Result<LoadedList> {
    let Some(raw) = storage.get(STORAGE_KEY).await? else {
        debug!(backend = storage.name(), "no persisted repository list");
        return Ok(LoadedList::default());
    };

    match serde_json::from_str::<Vec<RepositoryRef>>(&raw) {
        Ok(repositories) => Ok(LoadedList {
            repositories,
            diagnostic: None,
        }),
        Err(e) => {
            warn!(backend = storage.name(), error = %e, "persisted repository list is malformed, starting empty");
            Ok(LoadedList {
                repositories: Vec::new(),
                diagnostic: Some(format!("stored repository list is malformed: {}", e)),
            })
        }
    }
}

pub async fn persist(storage: &dyn Storage, repositories: &[RepositoryRef]) -> Result<()> {
    let serialized = serde_json::to_string(repositories)?;
    storage.set(STORAGE_KEY, &serialized).await
}

pub fn append(repositories: &[RepositoryRef], repository: RepositoryRef) -> Vec<RepositoryRef> {
    let mut next = Vec::with_capacity(repositories.len() + 1);
    next.extend_from_slice(repositories);
    next.push(repository);
    next
}

/// The persisted list of previously looked-up repositories.
pub struct RepositoryStore {
    storage: Arc<dyn Storage>,
    repositories: Vec<RepositoryRef>,
    diagnostic: Option<String>,
}

impl RepositoryStore {
    pub async fn open(storage: Arc<dyn Storage>) -> Result<Self> {
        let loaded = load(storage.as_ref()).await?;
        info!(
            backend = storage.name(),
            repositories = loaded.repositories.len(),
            "repository list loaded"
        );

        Ok(Self {
            storage,
            repositories: loaded.repositories,
            diagnostic: loaded.diagnostic,
        })
    }

    pub fn repositories(&self) -> &[RepositoryRef] {
        &self.repositories
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Appends and writes the whole list back. The in-memory list only
    /// changes once the write has gone through.
    pub async fn add(&mut self, repository: RepositoryRef) -> Result<&[RepositoryRef]> {
        let next = append(&self.repositories, repository);
        persist(self.storage.as_ref(), &next).await?;
        self.repositories = next;
        Ok(&self.repositories)
    }
}
