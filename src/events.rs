//! Fan-out of client changes to `text/event-stream` subscribers.

use std::convert::Infallible;
use std::future::ready;

use actix_web::web::Bytes;
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::domain::client_event::ClientChange;

/// Frame sent to every subscriber right after it connects.
pub const INIT_FRAME: &str = "event: INIT\ndata: connected\n\n";

/// Receives notifications about persisted changes.
pub trait ClientChangePublisher {
    fn publish(&self, change: ClientChange);
}

/// Broadcast hub shared by every request handler.
#[derive(Clone)]
pub struct ClientEvents {
    sender: broadcast::Sender<ClientChange>,
}

impl ClientEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientChange> {
        self.sender.subscribe()
    }

    /// Event-stream body for one subscriber. A subscriber that falls behind
    /// the channel capacity is disconnected.
    pub fn stream(&self) -> impl Stream<Item = Result<Bytes, Infallible>> + 'static {
        let greeting = stream::once(ready(Ok(Bytes::from_static(INIT_FRAME.as_bytes()))));
        let changes = BroadcastStream::new(self.sender.subscribe())
            .take_while(|item| {
                if let Err(err) = item {
                    log::warn!("Dropping event subscriber: {err}");
                }
                ready(item.is_ok())
            })
            .filter_map(|item| ready(item.ok().and_then(|change| frame(&change)).map(Ok)));
        greeting.chain(changes)
    }
}

impl ClientChangePublisher for ClientEvents {
    fn publish(&self, change: ClientChange) {
        let change_type = change.change_type;
        if self.sender.send(change).is_err() {
            log::debug!("No subscribers for {change_type} event");
        }
    }
}

/// Encodes one change as an event-stream frame named after its type.
pub fn frame(change: &ClientChange) -> Option<Bytes> {
    match serde_json::to_string(change) {
        Ok(json) => Some(Bytes::from(format!(
            "event: {}\ndata: {json}\n\n",
            change.change_type
        ))),
        Err(err) => {
            log::error!("Failed to encode client change: {err}");
            None
        }
    }
}
