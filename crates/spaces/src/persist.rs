//! Persistence backends for [`VirtualSpacesStore`].

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{Error, Result, store::VirtualSpacesStore};

/// Load and save the whole store.
pub trait StoreBackend: Send + Sync {
    /// Load the persisted store. A backend with nothing saved yet returns an
    /// empty store; unreadable or corrupt state is an error.
    fn load(&self) -> Result<VirtualSpacesStore>;
    /// Persist the full store, replacing previous contents.
    fn save(&self, store: &VirtualSpacesStore) -> Result<()>;
}

/// JSON document on disk, written atomically via a sibling temp file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StoreBackend for JsonFileStore {
    fn load(&self) -> Result<VirtualSpacesStore> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("store: no file at {}, starting empty", self.path.display());
                return Ok(VirtualSpacesStore::new());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text).map_err(|e| {
            warn!("store: failed to decode {}: {}", self.path.display(), e);
            Error::Decode {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })
    }

    fn save(&self, store: &VirtualSpacesStore) -> Result<()> {
        let json =
            serde_json::to_string_pretty(store).map_err(|e| Error::Encode(e.to_string()))?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!("store: saved {}", self.path.display());
        Ok(())
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Option<VirtualSpacesStore>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with an existing store.
    pub fn with_store(store: VirtualSpacesStore) -> Self {
        Self {
            saved: Mutex::new(Some(store)),
        }
    }

    /// Last saved store, if anything was saved.
    pub fn snapshot(&self) -> Option<VirtualSpacesStore> {
        self.saved.lock().clone()
    }
}

impl StoreBackend for MemoryStore {
    fn load(&self) -> Result<VirtualSpacesStore> {
        Ok(self.saved.lock().clone().unwrap_or_default())
    }

    fn save(&self, store: &VirtualSpacesStore) -> Result<()> {
        *self.saved.lock() = Some(store.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use space_ids::MonitorId;

    use super::*;
    use crate::model::{Slot, VirtualSpace};

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileStore::new(dir.path().join("spaces.json"));
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spaces.json");
        fs::write(&path, "{ not json").unwrap();
        let backend = JsonFileStore::new(&path);
        match backend.load() {
            Err(Error::Decode { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileStore::new(dir.path().join("nested").join("spaces.json"));
        let mut store = VirtualSpacesStore::new();
        let m = MonitorId::from("main");
        store.set(VirtualSpace::new(Slot::new(4), m.clone(), Vec::new()), &m);
        backend.save(&store).unwrap();
        assert!(!backend.tmp_path().exists());
        assert_eq!(backend.load().unwrap(), store);
    }

    #[test]
    fn memory_store_keeps_last_save() {
        let backend = MemoryStore::new();
        assert!(backend.snapshot().is_none());
        let store = VirtualSpacesStore::new();
        backend.save(&store).unwrap();
        assert_eq!(backend.snapshot(), Some(store));
    }
}
