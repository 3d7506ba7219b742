use async_trait::async_trait;
use tokio::{io::{AsyncBufRead, AsyncBufReadExt}, sync::{broadcast::{self, error::RecvError}, mpsc}};

use crate::TrackingError;

use super::{BroadcastMessage, BroadcastProvider, FEED_CAPACITY};

/// In-process broadcast hub. Every published message reaches every live subscription.
#[derive(Clone)]
pub struct LocalBroadcast {
    tx: broadcast::Sender<BroadcastMessage>,
}

impl LocalBroadcast {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Returns the number of subscriptions that received the message.
    pub fn publish(&self, message: BroadcastMessage) -> usize {
        self.tx.send(message).unwrap_or_else(|_| {
            tracing::debug!("Published message without any subscribers");
            0
        })
    }

    /// Publishes one JSON encoded message per line until the reader is exhausted.
    /// Lines that are not messages are logged and skipped.
    pub async fn publish_lines<R: AsyncBufRead + Unpin>(&self, reader: R) -> Result<usize, TrackingError> {
        let mut lines = reader.lines();
        let mut published = 0;

        while let Some(line) = lines.next_line().await
            .map_err(|err| TrackingError::Subscription(format!("Failed to read feed line: {err}")))? {
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<BroadcastMessage>(&line) {
                Ok(message) => {
                    self.publish(message);
                    published += 1;
                    // Let subscriptions drain before the hub buffer overflows
                    tokio::task::yield_now().await;
                }
                Err(err) => tracing::warn!("Skipping feed line that is not a broadcast message ({err}): {line}"),
            }
        }

        Ok(published)
    }
}

#[async_trait]
impl BroadcastProvider for LocalBroadcast {
    async fn subscribe(&self, channel: &str, event: &str) -> Result<mpsc::Receiver<BroadcastMessage>, TrackingError> {
        let mut rx = self.tx.subscribe();
        let (tx, out) = mpsc::channel(FEED_CAPACITY);
        let channel = channel.to_string();
        let event = event.to_string();

        tracing::info!("Subscribed to {channel}/{event}");

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(message) => {
                        if message.matches(&channel, &event) && tx.send(message).await.is_err() {
                            // Consumer went away
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Subscription {channel}/{event} lagged behind, {skipped} messages lost");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("Subscription {channel}/{event} closed");
        });

        Ok(out)
    }
}
