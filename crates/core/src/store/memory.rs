use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{PhoneStore, StoreError, render_listing};
use crate::entry::Entry;

/// Process-local phonebook, lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let entries = entries.into_iter().map(|e| (e.tel.clone(), e)).collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl PhoneStore for MemoryStore {
    async fn delete_entry(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_none() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        debug!(tel = %key, "entry removed");
        Ok(())
    }

    async fn list(&self) -> String {
        render_listing(&*self.entries.read().await)
    }

    async fn insert(&self, name: &str, surname: &str, tel: &str) -> Result<(), StoreError> {
        if tel.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let mut entries = self.entries.write().await;
        if entries.contains_key(tel) {
            return Err(StoreError::AlreadyExists(tel.to_string()));
        }
        entries.insert(tel.to_string(), Entry::new(name, surname, tel));
        debug!(tel = %tel, "entry added");
        Ok(())
    }

    async fn status(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn search(&self, key: &str) -> Option<Entry> {
        self.entries.read().await.get(key).cloned()
    }
}
