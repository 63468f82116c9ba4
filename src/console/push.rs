//! Client side of the change notification stream.

use serde_json::Value;

use crate::domain::client_event::{ClientChange, ClientChangeType};

/// Event name sent once when a subscriber connects.
pub const INIT_EVENT: &str = "INIT";

/// One dispatched `text/event-stream` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventFrame {
    pub event: String,
    pub data: String,
}

/// Splits a byte stream into [`EventFrame`]s. Chunks may end anywhere,
/// including inside a multi-byte character.
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    buffer: Vec<u8>,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns every frame it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<EventFrame> {
        self.buffer
            .extend(chunk.iter().copied().filter(|byte| *byte != b'\r'));

        let mut frames = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|pair| pair == b"\n\n") {
            let block = self.buffer.drain(..end + 2).collect::<Vec<_>>();
            if let Some(frame) = parse_block(&String::from_utf8_lossy(&block[..end])) {
                frames.push(frame);
            }
        }
        frames
    }
}

fn parse_block(block: &str) -> Option<EventFrame> {
    let mut event = None;
    let mut data = Vec::new();

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }

    if event.is_none() && data.is_empty() {
        return None;
    }
    Some(EventFrame {
        event: event.unwrap_or_else(|| "message".to_string()),
        data: data.join("\n"),
    })
}

/// A change announced by the server.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeNotification {
    pub change: ClientChange,
}

impl ChangeNotification {
    /// Accepts only JSON objects carrying a known `type`; the connection
    /// greeting and anything malformed yield `None`.
    pub fn parse(frame: &EventFrame) -> Option<Self> {
        if frame.event == INIT_EVENT {
            return None;
        }

        let value = serde_json::from_str::<Value>(&frame.data)
            .map_err(|err| log::debug!("Ignoring non-JSON notification: {err}"))
            .ok()?;
        let kind = value.as_object()?.get("type")?.as_str()?;
        ClientChangeType::try_from(kind).ok()?;

        serde_json::from_value::<ClientChange>(value)
            .map_err(|err| log::debug!("Ignoring malformed notification: {err}"))
            .ok()
            .map(|change| Self { change })
    }

    pub fn change_type(&self) -> ClientChangeType {
        self.change.change_type
    }

    /// Short text for the notification toast.
    pub fn describe(&self) -> String {
        let name = self.change.display_name.as_deref();
        match (self.change.change_type, name) {
            (ClientChangeType::Created, Some(name)) => format!("Client {name} was created"),
            (ClientChangeType::Updated, Some(name)) => format!("Client {name} was updated"),
            (ClientChangeType::Deleted, _) => match self.change.client_id {
                Some(id) => format!("Client #{id} was deleted"),
                None => "A client was deleted".to_string(),
            },
            (kind, None) => format!("Clients changed ({kind})"),
        }
    }
}
