use serde::{Deserialize, Serialize};

use crate::coordinate::LatLng;

/// One pickup being followed live, from the moment its tracking view opens until it closes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrackingSession {
    pub session_id: i64,
    pub destination: LatLng,
    pub destination_label: String,
}

impl TrackingSession {
    pub fn new(session_id: i64, destination: LatLng, destination_label: String) -> Self {
        Self {
            session_id,
            destination,
            destination_label,
        }
    }

    /// Broadcast event carrying this session's vehicle location.
    pub fn event_name(&self) -> String {
        format!("location-{}", self.session_id)
    }

    /// Key of the last known vehicle position in the client cache.
    pub fn cache_key(&self) -> String {
        format!("pickup_location_{}", self.session_id)
    }
}

#[test]
fn names_contain_session_id() {
    let session = TrackingSession::new(42, LatLng::new(24.7136, 46.6753), "Olaya Branch".into());
    assert_eq!(session.event_name(), "location-42");
    assert_eq!(session.cache_key(), "pickup_location_42");
}
