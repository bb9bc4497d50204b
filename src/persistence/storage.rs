//! Save slot backends

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{SlotStorage, StorageError};

/// In-memory slot
///
/// Clones share the same slot, so a test can keep a handle while the
/// tracker owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `data`
    pub fn with_contents(data: impl Into<String>) -> Self {
        let storage = Self::new();
        *storage.slot.borrow_mut() = Some(data.into());
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Make every later write fail, as a full or blocked store would
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents())
    }

    fn write(&mut self, data: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Rejected("quota exceeded".to_string()));
        }
        *self.slot.borrow_mut() = Some(data.to_string());
        Ok(())
    }
}

/// Slot backed by a single file (native builds)
///
/// Writes go to a temporary sibling first and are renamed over the save,
/// so an interrupted write leaves the previous save intact.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn tmp_path(&self) -> std::path::PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tmp.into()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SlotStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &str) -> Result<(), StorageError> {
        let tmp = self.tmp_path();
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Slot backed by browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorage {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl SlotStorage for LocalStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(&self.key)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }

    fn write(&mut self, data: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(&self.key, data)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_clones_share_slot() {
        let handle = MemoryStorage::new();
        let mut owned = handle.clone();
        owned.write("{}").unwrap();
        assert_eq!(handle.contents().as_deref(), Some("{}"));
        assert_eq!(handle.read().unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_memory_storage_failing_write_keeps_old_contents() {
        let mut storage = MemoryStorage::with_contents("old");
        storage.set_fail_writes(true);
        assert!(storage.write("new").is_err());
        assert_eq!(storage.contents().as_deref(), Some("old"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_storage_round_trip() {
        let dir = std::env::temp_dir().join(format!("slide-puzzle-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut storage = FileStorage::new(dir.join("save.json"));

        assert_eq!(storage.read().unwrap(), None);
        storage.write("first").unwrap();
        storage.write("second").unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some("second"));
        assert!(!storage.tmp_path().exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
