mod file_cache;
mod position_cache;

pub use file_cache::FileCache;
pub use position_cache::{PositionCache, POSITION_TTL_DAYS};

use crate::TrackingError;

/// Small key/value store that survives a restart of the client, like a browser cookie jar.
pub trait ClientCache {
    /// Returns `None` for missing or expired keys.
    fn get(&self, key: &str) -> Result<Option<String>, TrackingError>;

    fn set(&self, key: &str, value: &str, ttl_days: u32) -> Result<(), TrackingError>;
}
