use std::path::PathBuf;

use crate::storage::{FileStore, TaskRepository, STORAGE_KEY};

pub const LOG_FILE: &str = "checklist.log";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("checklist")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

impl Config {
    /// Start from the defaults and apply whatever was given explicitly.
    pub fn with_overrides(data_dir: Option<PathBuf>, storage_key: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        if let Some(key) = storage_key.filter(|k| !k.is_empty()) {
            config.storage_key = key;
        }
        config
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    pub fn repository(&self) -> TaskRepository {
        TaskRepository::new(FileStore::new(&self.data_dir), self.storage_key.clone())
    }
}
