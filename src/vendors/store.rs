//! Vendor persistence.
//!
//! [`VendorStore`] is the gateway the HTTP handlers call. The bundled
//! [`MemoryVendorStore`] keeps records in a concurrent map and can mirror
//! them to a JSON snapshot file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tempfile::NamedTempFile;
use thiserror::Error;
use uuid::Uuid;

use crate::vendors::model::{Vendor, VendorFilter, VendorInput};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// CRUD and filtered listing over vendor records.
///
/// A mutation that returns an error leaves the store unchanged.
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Vendors matching `filter`, newest first.
    async fn list(&self, filter: &VendorFilter) -> Result<Vec<Vendor>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Vendor>, StoreError>;

    async fn create(&self, input: VendorInput) -> Result<Vendor, StoreError>;

    /// `None` when no vendor has `id`.
    async fn update(&self, id: Uuid, input: VendorInput) -> Result<Option<Vendor>, StoreError>;

    /// `false` when no vendor has `id`.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Persist any buffered state. Called on shutdown.
    async fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory vendor table with an optional JSON snapshot.
///
/// Reads go straight to the map. Every mutation holds `write_lock` while it
/// changes the map and rewrites the snapshot, and undoes the map change if
/// the snapshot cannot be written.
#[derive(Clone, Default)]
pub struct MemoryVendorStore {
    inner: Arc<DashMap<Uuid, Vendor>>,
    snapshot_path: Option<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl MemoryVendorStore {
    pub fn new(snapshot_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            snapshot_path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open a store backed by `path`, loading it if the file exists.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let vendors: HashMap<Uuid, Vendor> = serde_json::from_reader(reader)?;
            for (id, vendor) in vendors {
                store.inner.insert(id, vendor);
            }
            tracing::info!(count = store.inner.len(), path = %path.display(), "Loaded vendor snapshot");
        }
        Ok(store)
    }

    /// Write every vendor to the snapshot file, if one is configured.
    pub fn save_to_file(&self) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        self.write_snapshot()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Caller must hold `write_lock`.
    fn write_snapshot(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let vendors: HashMap<Uuid, Vendor> = self
            .inner
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(&mut tmp);
            serde_json::to_writer(&mut writer, &vendors)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        tracing::debug!(count = vendors.len(), path = %path.display(), "Saved vendor snapshot");
        Ok(())
    }

    fn insert_vendor(&self, vendor: Vendor) -> Result<Vendor, StoreError> {
        let _guard = self.lock_writes();
        self.inner.insert(vendor.id, vendor.clone());
        if let Err(e) = self.write_snapshot() {
            self.inner.remove(&vendor.id);
            return Err(e);
        }
        Ok(vendor)
    }

    fn replace_vendor(&self, id: Uuid, input: VendorInput) -> Result<Option<Vendor>, StoreError> {
        let _guard = self.lock_writes();
        let Some(previous) = self.inner.get(&id).map(|r| r.value().clone()) else {
            return Ok(None);
        };

        let mut updated = previous.clone();
        updated.apply(input, Utc::now());
        self.inner.insert(id, updated.clone());
        if let Err(e) = self.write_snapshot() {
            self.inner.insert(id, previous);
            return Err(e);
        }
        Ok(Some(updated))
    }

    fn remove_vendor(&self, id: Uuid) -> Result<bool, StoreError> {
        let _guard = self.lock_writes();
        let Some((_, removed)) = self.inner.remove(&id) else {
            return Ok(false);
        };
        if let Err(e) = self.write_snapshot() {
            self.inner.insert(id, removed);
            return Err(e);
        }
        Ok(true)
    }
}

#[async_trait]
impl VendorStore for MemoryVendorStore {
    async fn list(&self, filter: &VendorFilter) -> Result<Vec<Vendor>, StoreError> {
        let mut vendors: Vec<Vendor> = self
            .inner
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        vendors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vendors)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Vendor>, StoreError> {
        Ok(self.inner.get(&id).map(|r| r.value().clone()))
    }

    async fn create(&self, input: VendorInput) -> Result<Vendor, StoreError> {
        self.insert_vendor(Vendor::new(input, Utc::now()))
    }

    async fn update(&self, id: Uuid, input: VendorInput) -> Result<Option<Vendor>, StoreError> {
        self.replace_vendor(id, input)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.remove_vendor(id)
    }

    async fn flush(&self) -> Result<(), StoreError> {
        self.save_to_file()
    }
}
