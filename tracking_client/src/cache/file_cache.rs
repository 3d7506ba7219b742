use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{TrackingError, POSITION_CACHE_DIR};

use super::ClientCache;

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/**
 * FileCache keeps one small JSON file per key, each carrying its own expiry time.
 */
#[derive(Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Opens the cache in the project data directory.
    pub fn open() -> Result<Self, TrackingError> {
        let root: PathBuf = project_root::get_project_root()
            .map_err(|_| TrackingError::Cache("Failed to locate project root".to_string()))?;
        Self::open_in(root.join(POSITION_CACHE_DIR))
    }

    pub fn open_in(dir: impl Into<PathBuf>) -> Result<Self, TrackingError> {
        let dir = dir.into();

        // Create dir if it doesn't exist
        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .map_err(|_| TrackingError::Cache(format!("Failed to create cache directory: {:?}", dir)))?;
        }

        Ok(FileCache { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let file_name: String = key.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>, TrackingError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&path)
            .map_err(|_| TrackingError::Cache(format!("Failed to read cache entry: {:?}", path)))?;

        let Ok(entry) = serde_json::from_slice::<CacheEntry>(&bytes) else {
            tracing::warn!("Ignoring unreadable cache entry {:?}", path);
            return Ok(None);
        };

        if entry.expires_at <= now {
            tracing::debug!("Cache entry {} expired at {}", key, entry.expires_at);
            std::fs::remove_file(&path)
                .map_err(|_| TrackingError::Cache(format!("Failed to remove expired cache entry: {:?}", path)))?;
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    pub fn set_at(&self, key: &str, value: &str, ttl_days: u32, now: DateTime<Utc>) -> Result<(), TrackingError> {
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: now + Duration::days(ttl_days as i64),
        };

        let bytes = serde_json::to_vec(&entry)
            .map_err(|_| TrackingError::Cache("Failed to serialize cache entry".to_string()))?;

        // Write then rename so a crash never leaves half an entry behind
        let path = self.entry_path(key);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, bytes)
            .map_err(|_| TrackingError::Cache(format!("Failed to write cache entry: {:?}", tmp_path)))?;
        std::fs::rename(&tmp_path, &path)
            .map_err(|_| TrackingError::Cache(format!("Failed to move cache entry into place: {:?}", path)))?;

        Ok(())
    }
}

impl ClientCache for FileCache {
    fn get(&self, key: &str) -> Result<Option<String>, TrackingError> {
        self.get_at(key, Utc::now())
    }

    fn set(&self, key: &str, value: &str, ttl_days: u32) -> Result<(), TrackingError> {
        self.set_at(key, value, ttl_days, Utc::now())
    }
}
