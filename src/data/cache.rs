//! JSON file cache keyed by name, expired by file modification time.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::AppError;

pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Cached value for `key`, unless missing, older than `max_age` or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Option<T> {
        let path = self.path(key);
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        // A timestamp in the future counts as fresh.
        let age = modified.elapsed().unwrap_or(Duration::ZERO);
        if age > max_age {
            debug!(key, age_secs = age.as_secs(), "cache entry stale");
            return None;
        }

        let file = File::open(&path).ok()?;
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::invalid_input(format!("Failed to create cache dir '{}': {e}", self.dir.display()))
        })?;
        let path = self.path(key);
        let file = File::create(&path)
            .map_err(|e| AppError::invalid_input(format!("Failed to create cache file '{}': {e}", path.display())))?;
        serde_json::to_writer(BufWriter::new(file), value)
            .map_err(|e| AppError::invalid_input(format!("Failed to write cache file '{}': {e}", path.display())))?;
        debug!(key, "cache stored");
        Ok(())
    }
}
