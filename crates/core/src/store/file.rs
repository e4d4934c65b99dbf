use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{PhoneStore, StoreError, render_listing};
use crate::entry::Entry;

/// Phonebook persisted as a JSON array of entries on local disk.
///
/// The whole document is rewritten after every successful mutation while
/// the write lock is held, so the file always matches the in-memory map.
/// Rewrites go to a sibling `.tmp` file that is renamed over the target.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl FileStore {
    /// Open the phonebook at `path`. A missing file is an empty phonebook.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let exists = tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("failed to stat: {}", path.display()))?;
        let entries = if exists {
            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read: {}", path.display()))?;
            decode(&data).with_context(|| format!("failed to parse: {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        info!(path = %path.display(), entries = entries.len(), "Phonebook loaded");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    async fn persist(&self, entries: &BTreeMap<String, Entry>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let records: Vec<&Entry> = entries.values().collect();
        let data = serde_json::to_vec_pretty(&records)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, data).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %self.path.display(), entries = entries.len(), "phonebook saved");
        Ok(())
    }
}

fn decode(data: &[u8]) -> Result<BTreeMap<String, Entry>> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }
    let records: Vec<Entry> = serde_json::from_slice(data)?;
    Ok(records.into_iter().map(|e| (e.tel.clone(), e)).collect())
}

#[async_trait]
impl PhoneStore for FileStore {
    async fn delete_entry(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let removed = entries
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        if let Err(e) = self.persist(&entries).await {
            entries.insert(key.to_string(), removed);
            return Err(e);
        }
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
        if let Err(e) = self.persist(&entries).await {
            entries.remove(tel);
            return Err(e);
        }
        Ok(())
    }

    async fn status(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn search(&self, key: &str) -> Option<Entry> {
        self.entries.read().await.get(key).cloned()
    }
}
