use async_trait::async_trait;
use tokio::{io::{AsyncBufReadExt, BufReader}, net::TcpStream, sync::mpsc};

use crate::TrackingError;

use super::{Backoff, BroadcastMessage, BroadcastProvider, FEED_CAPACITY};

/// Realtime feed read from a TCP endpoint that streams newline delimited JSON messages.
/// Lost connections are retried with exponential backoff for as long as the consumer listens.
#[derive(Clone)]
pub struct TcpBroadcast {
    addr: String,
    backoff: Backoff,
}

enum StreamEnd {
    Disconnected { delivered: usize },
    ConsumerGone,
}

impl TcpBroadcast {
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_backoff(addr, Backoff::default())
    }

    pub fn with_backoff(addr: impl Into<String>, backoff: Backoff) -> Self {
        Self {
            addr: addr.into(),
            backoff,
        }
    }
}

#[async_trait]
impl BroadcastProvider for TcpBroadcast {
    async fn subscribe(&self, channel: &str, event: &str) -> Result<mpsc::Receiver<BroadcastMessage>, TrackingError> {
        if self.addr.trim().is_empty() {
            return Err(TrackingError::Subscription("Feed address is empty".to_string()));
        }

        let (tx, out) = mpsc::channel(FEED_CAPACITY);
        let addr = self.addr.clone();
        let mut backoff = self.backoff.clone();
        let channel = channel.to_string();
        let event = event.to_string();

        tokio::spawn(async move {
            loop {
                match TcpStream::connect(&addr).await {
                    Ok(stream) => {
                        tracing::info!("Subscribed to {channel}/{event} on {addr}");
                        match forward_lines(stream, &channel, &event, &tx).await {
                            StreamEnd::ConsumerGone => break,
                            StreamEnd::Disconnected { delivered } => {
                                tracing::warn!("Feed {addr} disconnected after {delivered} messages");
                                if delivered > 0 {
                                    backoff.reset();
                                }
                            }
                        }
                    }
                    Err(err) => tracing::error!("Failed to subscribe to {addr}: {err}"),
                }

                if tx.is_closed() {
                    break;
                }

                let delay = backoff.next_delay();
                tracing::info!("Resubscribing to {addr} in {delay:?}");
                tokio::time::sleep(delay).await;
            }
            tracing::debug!("Subscription {channel}/{event} on {addr} closed");
        });

        Ok(out)
    }
}

async fn forward_lines(stream: TcpStream, channel: &str, event: &str, tx: &mpsc::Sender<BroadcastMessage>) -> StreamEnd {
    let mut lines = BufReader::new(stream).lines();
    let mut delivered = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::error!("Failed to read from feed: {err}");
                break;
            }
        };

        let message = match serde_json::from_str::<BroadcastMessage>(&line) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!("Skipping feed line that is not a broadcast message ({err}): {line}");
                continue;
            }
        };

        if !message.matches(channel, event) {
            continue;
        }

        if tx.send(message).await.is_err() {
            return StreamEnd::ConsumerGone;
        }
        delivered += 1;
    }

    StreamEnd::Disconnected { delivered }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::{io::AsyncWriteExt, net::TcpListener};

    use super::*;

    #[tokio::test]
    async fn resubscribes_after_disconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            // First connection: one match, noise, then hang up
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(concat!(
                r#"{"channel":"pickup-tracking","event":"location-8","payload":{"latitude":1.0,"longitude":2.0}}"#, "\n",
                r#"{"channel":"pickup-tracking","event":"location-9","payload":{"latitude":9.0,"longitude":9.0}}"#, "\n",
                "not json\n",
            ).as_bytes()).await.unwrap();
            drop(socket);

            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(concat!(
                r#"{"channel":"pickup-tracking","event":"location-8","payload":{"latitude":3.0,"longitude":4.0}}"#, "\n",
            ).as_bytes()).await.unwrap();
            // Keep the second connection open until the test is done
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let feed = TcpBroadcast::with_backoff(addr, Backoff::new(Duration::from_millis(10), Duration::from_millis(50)));
        let mut rx = feed.subscribe("pickup-tracking", "location-8").await.unwrap();

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert_eq!(first.payload["latitude"], 1.0);

        let second = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert_eq!(second.payload["latitude"], 3.0);
    }

    #[tokio::test]
    async fn empty_address_is_rejected() {
        let feed = TcpBroadcast::new("  ");
        assert!(feed.subscribe("pickup-tracking", "location-1").await.is_err());
    }
}
