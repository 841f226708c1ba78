// Persistence collaborator
// Records are JSON values grouped in named collections; typed stores sit on top.

mod documents;
mod preferences;
mod sync_queue;
mod versions;

use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::WalkDir;

pub use documents::DocumentUpdate;

pub const DOCUMENTS: &str = "documents";
pub const VERSIONS: &str = "versions";
pub const PREFERENCES: &str = "preferences";
pub const SYNC_QUEUE: &str = "sync_queue";

pub const DEFAULT_MAX_VERSIONS: usize = 50;

/// Opaque embedded key-value store
pub trait KeyValueStore {
    fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Value>>;
    fn put(&mut self, collection: &str, key: &str, value: &Value) -> StoreResult<()>;
    /// Returns whether a record was removed
    fn delete(&mut self, collection: &str, key: &str) -> StoreResult<bool>;
    /// All records of a collection in key order
    fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>>;

    /// Records ordered ascending by the top-level field `index`,
    /// optionally only those whose field equals `equals`
    fn list_by_index(
        &self,
        collection: &str,
        index: &str,
        equals: Option<&Value>,
    ) -> StoreResult<Vec<Value>> {
        let mut records: Vec<Value> = self
            .list(collection)?
            .into_iter()
            .map(|(_, value)| value)
            .filter(|value| equals.is_none_or(|wanted| value.get(index) == Some(wanted)))
            .collect();
        records.sort_by(|a, b| compare_index(a.get(index), b.get(index)));
        Ok(records)
    }
}

fn compare_index(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// In-process store; contents vanish with the value
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: BTreeMap<String, BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|records| records.get(key))
            .cloned())
    }

    fn put(&mut self, collection: &str, key: &str, value: &Value) -> StoreResult<()> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn delete(&mut self, collection: &str, key: &str) -> StoreResult<bool> {
        Ok(self
            .collections
            .get_mut(collection)
            .is_some_and(|records| records.remove(key).is_some()))
    }

    fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>> {
        Ok(self
            .collections
            .get(collection)
            .map(|records| records.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }
}

/// One directory per collection, one `{key}.json` file per record
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        FileStore {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn record_path(&self, collection: &str, key: &str) -> StoreResult<PathBuf> {
        let valid = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
                && !s.starts_with('.')
        };
        if !valid(collection) {
            return Err(StoreError::InvalidKey(collection.to_string()));
        }
        if !valid(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(collection).join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Value>> {
        let path = self.record_path(collection, key)?;
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|source| StoreError::FileRead {
            path: path.clone(),
            source,
        })?;
        let value = serde_json::from_str(&text).map_err(|source| StoreError::Deserialization {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    fn put(&mut self, collection: &str, key: &str, value: &Value) -> StoreResult<()> {
        let path = self.record_path(collection, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::DirCreation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let text = serde_json::to_string_pretty(value).map_err(StoreError::Serialization)?;
        // Write next to the target and rename so readers never see a partial record
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|source| StoreError::FileWrite {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::FileWrite {
            path: path.clone(),
            source,
        })
    }

    fn delete(&mut self, collection: &str, key: &str) -> StoreResult<bool> {
        let path = self.record_path(collection, key)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|source| StoreError::FileDelete {
            path: path.clone(),
            source,
        })?;
        Ok(true)
    }

    fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>> {
        let dir = self.base_path.join(collection);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| StoreError::Listing {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|s| s.to_str()) != Some("json")
            {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(value) = self.get(collection, key)? {
                records.push((key.to_string(), value));
            }
        }
        Ok(records)
    }
}

/// Typed access to documents, versions, preferences and the sync queue
pub struct DocumentStore<S: KeyValueStore> {
    store: S,
    clock: Rc<dyn Clock>,
    max_versions: usize,
}

impl<S: KeyValueStore> DocumentStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Rc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Rc<dyn Clock>) -> Self {
        DocumentStore {
            store,
            clock,
            max_versions: DEFAULT_MAX_VERSIONS,
        }
    }

    /// Keep at most `max` snapshots per document (at least one)
    pub fn with_max_versions(mut self, max: usize) -> Self {
        self.max_versions = max.max(1);
        self
    }

    pub fn max_versions(&self) -> usize {
        self.max_versions
    }

    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    fn now(&self) -> crate::clock::Timestamp {
        self.clock.now_millis()
    }

    fn get_record<T: DeserializeOwned>(&self, collection: &str, key: &str) -> StoreResult<Option<T>> {
        match self.store.get(collection, key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Deserialization {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn put_record<T: Serialize>(&mut self, collection: &str, key: &str, record: &T) -> StoreResult<()> {
        let value = serde_json::to_value(record).map_err(StoreError::Serialization)?;
        self.store.put(collection, key, &value)
    }

    fn list_records<T: DeserializeOwned>(
        &self,
        collection: &str,
        index: &str,
        equals: Option<&Value>,
    ) -> StoreResult<Vec<T>> {
        self.store
            .list_by_index(collection, index, equals)?
            .into_iter()
            .map(|value| {
                let key = value
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                serde_json::from_value(value)
                    .map_err(|source| StoreError::Deserialization { key, source })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exercise(store: &mut dyn KeyValueStore) {
        assert_eq!(store.get("things", "a").unwrap(), None);
        store.put("things", "b", &json!({"id": "b", "n": 2, "g": "x"})).unwrap();
        store.put("things", "a", &json!({"id": "a", "n": 3, "g": "y"})).unwrap();
        store.put("things", "c", &json!({"id": "c", "n": 1, "g": "x"})).unwrap();

        assert_eq!(store.get("things", "a").unwrap().unwrap()["n"], 3);
        let keys: Vec<String> = store.list("things").unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);

        let by_n: Vec<Value> = store.list_by_index("things", "n", None).unwrap();
        let ids: Vec<&str> = by_n.iter().map(|v| v["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);

        let group = store.list_by_index("things", "n", Some(&json!("x"))).unwrap();
        assert!(group.is_empty());
        let group = store.list_by_index("things", "g", Some(&json!("x"))).unwrap();
        assert_eq!(group.len(), 2);

        assert!(store.delete("things", "a").unwrap());
        assert!(!store.delete("things", "a").unwrap());
        assert!(store.list("missing").unwrap().is_empty());
    }

    #[test]
    fn test_memory_store() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        exercise(&mut store);
        assert!(dir.path().join("things").join("b.json").exists());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let err = store.put("things", "../escape", &json!({})).unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
        assert!(store.get("..", "x").is_err());
    }
}
