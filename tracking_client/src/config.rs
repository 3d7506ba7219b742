use std::path::PathBuf;

use clap::Parser;
use pickup_tracker_lib::{coordinate::LatLng, tracking_session::TrackingSession};

use crate::{map::DEFAULT_ZOOM, realtime::DEFAULT_CHANNEL, TrackingError};

/// Follows one pickup vehicle live on a headless map.
///
/// Location updates are read from a TCP feed when an address is given, otherwise as
/// newline delimited JSON messages on stdin.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct TrackerConfig {
    /// Pickup being tracked
    #[arg(long)]
    pub session_id: i64,

    #[arg(long, allow_hyphen_values = true)]
    pub destination_lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub destination_lng: f64,

    /// Name shown on the destination marker
    #[arg(long, default_value = "Destination")]
    pub destination_label: String,

    /// Realtime channel carrying location events
    #[arg(long, default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// host:port of a realtime feed
    #[arg(long, env = "TRACKING_FEED_ADDR")]
    pub feed_addr: Option<String>,

    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub maps_api_key: Option<String>,

    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: f64,

    /// Where the last known position is kept. Defaults to the project data directory.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

impl TrackerConfig {
    pub fn session(&self) -> Result<TrackingSession, TrackingError> {
        let destination = LatLng::new(self.destination_lat, self.destination_lng);
        if !destination.is_valid() {
            return Err(TrackingError::Config(format!("Invalid destination {}, {}", self.destination_lat, self.destination_lng)));
        }

        Ok(TrackingSession::new(self.session_id, destination, self.destination_label.clone()))
    }

    pub fn zoom(&self) -> Result<f64, TrackingError> {
        if !(0. ..=22.).contains(&self.zoom) {
            return Err(TrackingError::Config(format!("Zoom {} is outside 0-22", self.zoom)));
        }
        Ok(self.zoom)
    }
}
