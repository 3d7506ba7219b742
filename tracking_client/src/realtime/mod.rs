use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::TrackingError;

mod backoff;
mod local;
mod payload;
mod tcp;

pub use backoff::Backoff;
pub use local::LocalBroadcast;
pub use payload::parse_location;
pub use tcp::TcpBroadcast;

pub const DEFAULT_CHANNEL: &str = "pickup-tracking";

/// Buffered messages per subscriber before the feed waits for the view to catch up.
pub const FEED_CAPACITY: usize = 64;

/// One message published on a realtime channel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BroadcastMessage {
    pub channel: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
}

impl BroadcastMessage {
    pub fn new(channel: impl Into<String>, event: impl Into<String>, payload: Value) -> Self {
        Self {
            channel: channel.into(),
            event: event.into(),
            payload,
        }
    }

    pub fn matches(&self, channel: &str, event: &str) -> bool {
        self.channel == channel && self.event == event
    }
}

/// Source of realtime messages. Every subscription gets its own single-consumer queue
/// holding only the messages for the requested channel and event, in publish order.
#[async_trait]
pub trait BroadcastProvider: Send + Sync {
    async fn subscribe(&self, channel: &str, event: &str) -> Result<mpsc::Receiver<BroadcastMessage>, TrackingError>;
}
