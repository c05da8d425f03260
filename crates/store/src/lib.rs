//! Key-value storage behind the garden subsystems.

pub mod keys;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use common::{GardenError, GardenResult};

/// String key-value storage contract.
///
/// A missing key is reported as [`None`], never as an error; callers supply
/// typed defaults. Writes become visible to every reader of the same store
/// immediately.
pub trait KeyValueStore {
    /// Returns the stored value for `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn write(&self, key: &str, value: &str) -> GardenResult<()>;

    /// Reads an integer, falling back to `default` when the key is missing
    /// or its stored text does not parse.
    fn read_i64(&self, key: &str, default: i64) -> i64 {
        self.read(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Reads a decimal with the same fallback rules as
    /// [`KeyValueStore::read_i64`].
    fn read_f64(&self, key: &str, default: f64) -> f64 {
        self.read(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

/// Volatile in-memory store for tests and embedding callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> GardenResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store keeping the whole key space in one JSON document.
///
/// The document is read once at [`FileStore::open`] and rewritten on every
/// [`KeyValueStore::write`].
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, starting empty when the file is absent.
    pub fn open(path: impl AsRef<Path>) -> GardenResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries: HashMap<String, String> = match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).map_err(|e| {
                GardenError::Parse(format!("store file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    fn persist(&self) -> GardenResult<()> {
        let data = serde_json::to_string_pretty(&*self.entries.borrow())
            .map_err(|e| GardenError::Parse(e.to_string()))?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> GardenResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.read(keys::PROFILE_POINTS), None);
        store.write(keys::PROFILE_POINTS, "2420").unwrap();
        assert_eq!(store.read(keys::PROFILE_POINTS).as_deref(), Some("2420"));
    }

    #[test]
    fn typed_reads_fall_back_to_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.read_i64("missing", 42), 42);
        store.write("garbled", "not a number").unwrap();
        assert_eq!(store.read_i64("garbled", 7), 7);
        assert_eq!(store.read_f64("garbled", 1.5), 1.5);
    }

    #[test]
    fn typed_reads_parse_stored_text() {
        let store = MemoryStore::new();
        store.write(keys::PROFILE_LEVEL, "5").unwrap();
        store.write(keys::TOTAL_RECHARGE, "99.5").unwrap();
        assert_eq!(store.read_i64(keys::PROFILE_LEVEL, 0), 5);
        assert!((store.read_f64(keys::TOTAL_RECHARGE, 0.0) - 99.5).abs() < f64::EPSILON);
    }

    #[test]
    fn file_store_missing_file_starts_empty() {
        let store = FileStore::open("/tmp/verdant_store_nope.json").unwrap();
        assert_eq!(store.read(keys::PROFILE_POINTS), None);
    }

    #[test]
    fn file_store_roundtrip() {
        let mut path = std::env::temp_dir();
        path.push("verdant_store_roundtrip.json");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::open(&path).unwrap();
        store.write(keys::PROFILE_POINTS, "3000").unwrap();
        store.write(keys::LAST_CHECK_IN_DATE, "2024-03-01").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(reopened.read(keys::PROFILE_POINTS).as_deref(), Some("3000"));
        assert_eq!(
            reopened.read(keys::LAST_CHECK_IN_DATE).as_deref(),
            Some("2024-03-01")
        );
    }

    #[test]
    fn file_store_rejects_garbage_document() {
        let mut path = std::env::temp_dir();
        path.push("verdant_store_garbage.json");
        std::fs::write(&path, "not json at all").unwrap();
        let result = FileStore::open(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(common::GardenError::Parse(_))));
    }
}
