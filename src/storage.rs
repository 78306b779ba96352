use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::task::Task;

pub const STORAGE_KEY: &str = "pims_onboarding_tasks_v2";

/// String key-value storage, shaped like browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::Invalid(format!("unusable storage key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.resolve(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        // write then rename so a crash never leaves a half-written list
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::io(&path, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}

/// In-process store. Clones share the same contents, so a test can keep a
/// handle while the repository owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .inner
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().values.get(key).cloned()
    }

    /// Make subsequent writes fail, as a full quota would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().values.remove(key);
        Ok(())
    }
}

/// Reads and writes the whole task list under one key.
pub struct TaskRepository {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl TaskRepository {
    pub fn new(backend: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored list, or `None` when nothing usable is stored.
    /// Failures are logged and never returned.
    pub fn load(&self) -> Option<Vec<Task>> {
        match self.try_load() {
            Ok(Some(tasks)) => {
                debug!(key = %self.key, count = tasks.len(), "loaded task list");
                Some(tasks)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "ignoring stored task list");
                None
            }
        }
    }

    fn try_load(&self) -> Result<Option<Vec<Task>>, StorageError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        let tasks: Vec<Task> = serde_json::from_str(&raw)?;
        validate(&tasks)?;
        Ok(Some(tasks))
    }

    pub fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let data = serde_json::to_string_pretty(tasks)?;
        self.backend.set(&self.key, &data)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.backend.remove(&self.key)
    }
}

// Serde already enforces field types and the status literals; this covers
// what the types cannot.
fn validate(tasks: &[Task]) -> Result<(), StorageError> {
    let mut ids = HashSet::new();
    for (i, task) in tasks.iter().enumerate() {
        if task.id.is_empty() {
            return Err(StorageError::Invalid(format!("task #{i} has an empty id")));
        }
        if !ids.insert(task.id.as_str()) {
            return Err(StorageError::Invalid(format!("duplicate id {}", task.id)));
        }
        if task.title.trim().is_empty() {
            return Err(StorageError::Invalid(format!("task {} has no title", task.id)));
        }
    }
    Ok(())
}
