//! Resolve a feed payload from disk, the cache or the network.

use std::fs;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{DataSourceConfig, Feed};
use crate::error::AppError;

use super::cache::FileCache;
use super::fetch::{SciensanoClient, decode_feed};

pub fn load_feed(feed: Feed, source: &DataSourceConfig) -> Result<Value, AppError> {
    match source {
        DataSourceConfig::Local(dir) => {
            let path = dir.join(feed.file_name());
            debug!(path = %path.display(), "reading local feed");
            let bytes = fs::read(&path)
                .map_err(|e| AppError::invalid_input(format!("Failed to read feed '{}': {e}", path.display())))?;
            decode_feed(&bytes).map_err(|e| AppError::invalid_input(format!("Failed to parse '{}': {e}", path.display())))
        }
        DataSourceConfig::Remote {
            base_url,
            cache_dir,
            max_age,
        } => {
            let cache = cache_dir.as_ref().map(FileCache::new);
            if let Some(value) = cache.as_ref().and_then(|c| c.get::<Value>(feed.cache_key(), *max_age)) {
                return Ok(value);
            }

            let value = SciensanoClient::new(base_url.as_str()).fetch_feed(feed)?;
            if let Some(cache) = &cache {
                // The payload is still usable when it cannot be cached.
                if let Err(e) = cache.set(feed.cache_key(), &value) {
                    warn!(error = %e, "failed to cache feed");
                }
            }
            Ok(value)
        }
    }
}
