pub mod file;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::entry::Entry;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} cannot be found!")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("telephone number is empty")]
    EmptyKey,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode phonebook: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Capability set every phonebook backend provides to the HTTP layer.
///
/// Implementations own all entry data and are responsible for their own
/// synchronization; callers share a single instance across requests.
#[async_trait]
pub trait PhoneStore: Send + Sync {
    /// Remove the entry keyed by `key`.
    async fn delete_entry(&self, key: &str) -> Result<(), StoreError>;

    /// Human-readable listing of every entry, empty when the store is empty.
    async fn list(&self) -> String;

    /// Add a new entry keyed by `tel`. An empty `tel` is rejected.
    async fn insert(&self, name: &str, surname: &str, tel: &str) -> Result<(), StoreError>;

    /// Total number of entries.
    async fn status(&self) -> usize;

    /// Look up an entry by key.
    async fn search(&self, key: &str) -> Option<Entry>;
}

pub(crate) fn render_listing(entries: &BTreeMap<String, Entry>) -> String {
    entries.values().map(Entry::list_line).collect()
}
