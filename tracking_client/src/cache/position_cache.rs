use pickup_tracker_lib::{location_sample::LocationSample, tracking_session::TrackingSession};

use super::ClientCache;

pub const POSITION_TTL_DAYS: u32 = 1;

/// Last known vehicle position of one session, so a restarted view can show the marker right away.
pub struct PositionCache {
    cache: Box<dyn ClientCache>,
    key: String,
}

impl PositionCache {
    pub fn new(cache: Box<dyn ClientCache>, session: &TrackingSession) -> Self {
        Self {
            cache,
            key: session.cache_key(),
        }
    }

    /// The sample keeps the time it was originally received. Failures are logged and
    /// read as "nothing cached".
    pub fn restore(&self) -> Option<LocationSample> {
        let value = match self.cache.get(&self.key) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(err) => {
                tracing::error!("Failed to read cached position: {err}");
                return None;
            }
        };

        match serde_json::from_str::<LocationSample>(&value) {
            Ok(sample) if sample.position().is_valid() => Some(sample),
            _ => {
                tracing::warn!("Ignoring malformed cached position for {}: {}", self.key, value);
                None
            }
        }
    }

    pub fn store(&self, sample: &LocationSample) {
        let Ok(value) = serde_json::to_string(sample) else {
            tracing::error!("Failed to serialize position {:?}", sample);
            return;
        };

        if let Err(err) = self.cache.set(&self.key, &value, POSITION_TTL_DAYS) {
            tracing::error!("Failed to cache position: {err}");
        }
    }
}
