//! Durable storage for the cart snapshot
//!
//! A [`StorageBackend`] is a string key-value slot store, the shape of browser
//! local storage. [`CartStorage`] scopes one backend to one cart key and owns
//! the snapshot format. It never fails: unreadable snapshots load as an empty
//! cart and failed writes are logged, leaving the in-memory cart authoritative.

use crate::config::DEFAULT_CART_KEY;
use crate::core::error::Error;
use crate::models::{checked_line_total, CartLineItem};
use crate::Result;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;

/// Key-value slot store holding serialized snapshots
pub trait StorageBackend: Send {
    /// Reads the value stored under `key`, `None` if the slot is empty
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`
    fn write(&mut self, key: &str, value: String) -> Result<()>;
}

/// Rejects keys that cannot safely name a slot file.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidKey("storage key cannot be empty".to_string()));
    }
    if key.contains('/') || key.contains('\\') || key.contains("..") || key.contains('\0') {
        return Err(Error::InvalidKey(format!(
            "storage key contains invalid characters: {key:?}"
        )));
    }
    if key.chars().any(|c| c.is_control()) {
        return Err(Error::InvalidKey(format!(
            "storage key contains control characters: {key:?}"
        )));
    }
    Ok(())
}

/// In-process storage, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slots: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// Creates an empty, unbounded memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a memory backend that refuses to hold more than `bytes` in total
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            slots: Arc::default(),
            quota: Some(bytes),
        }
    }

    /// Returns the raw stored value for `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    /// Stores a raw value, bypassing the quota
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.into(), value.into());
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| Error::Storage("memory backend lock poisoned".into()))
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<()> {
        let mut slots = self.lock()?;

        if let Some(quota) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(Error::StorageFull { needed, quota });
            }
        }

        slots.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage keeping one `{key}.json` file per slot in a directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    base_path: PathBuf,
}

impl FileBackend {
    /// Creates a file backend rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding the slot files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file backing `key`
    pub fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }

    fn tmp_path(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!(".{}.{}.tmp", key, uuid::Uuid::new_v4().simple()))
    }

    /// Writes a slot atomically without blocking the runtime
    pub async fn write_async(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        if !self.base_path.exists() {
            tokio::fs::create_dir_all(&self.base_path).await?;
        }

        let tmp_path = self.tmp_path(key);
        let write_result = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(value.as_bytes()).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp_path, &path).await
        }
        .await;

        if let Err(e) = write_result {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn write(&mut self, key: &str, value: String) -> Result<()> {
        let path = self.slot_path(key)?;
        std::fs::create_dir_all(&self.base_path)?;

        let tmp_path = self.tmp_path(key);
        let write_result =
            std::fs::write(&tmp_path, value.as_bytes()).and_then(|_| std::fs::rename(&tmp_path, &path));

        if let Err(e) = write_result {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Persistent store adapter for one cart
pub struct CartStorage {
    backend: Box<dyn StorageBackend>,
    key: String,
}

impl CartStorage {
    /// Creates an adapter storing the cart under `key` in `backend`
    pub fn new(backend: impl StorageBackend + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    /// Creates an adapter over a fresh memory backend with the default key
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new(), DEFAULT_CART_KEY)
    }

    /// Storage key of this cart
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the saved line items, or an empty cart if nothing usable is stored
    pub fn load(&self) -> Vec<CartLineItem> {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("Error loading cart from storage key {}: {}", self.key, e);
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                log::error!("Discarding corrupt cart snapshot under {}: {}", self.key, e);
                return Vec::new();
            }
        };

        let items: Vec<CartLineItem> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!("Dropping unreadable record {} under {}: {}", index, self.key, e);
                    None
                }
            })
            .collect();
        normalize(items)
    }

    /// Saves the full line-item sequence, returning false if the write failed
    pub fn save(&mut self, items: &[CartLineItem]) -> bool {
        let result = serde_json::to_string(items)
            .map_err(Error::from)
            .and_then(|json| self.backend.write(&self.key, json));

        match result {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving cart to storage key {}: {}", self.key, e);
                false
            }
        }
    }
}

/// Restores the cart invariants on a loaded snapshot.
fn normalize(items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter_map(|mut item| {
            if item.quantity == 0 {
                log::warn!("Dropping zero-quantity item {} from snapshot", item.menu_item_id);
                return None;
            }
            if !seen.insert(item.menu_item_id.clone()) {
                log::warn!("Dropping duplicate item {} from snapshot", item.menu_item_id);
                return None;
            }
            if checked_line_total(item.quantity, item.price).is_none() {
                log::warn!("Dropping item {} with overflowing total", item.menu_item_id);
                return None;
            }
            if !item.is_consistent() {
                item.recompute_total();
            }
            Some(item)
        })
        .collect()
}
