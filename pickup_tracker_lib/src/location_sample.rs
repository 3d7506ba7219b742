use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coordinate::LatLng;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    pub received_at: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, received_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            received_at,
        }
    }

    pub fn at(position: LatLng, received_at: DateTime<Utc>) -> Self {
        Self::new(position.latitude, position.longitude, received_at)
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}
