use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::ClientId;

/// Kind of change broadcast over the server-push channel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClientChangeType {
    Created,
    Updated,
    Deleted,
}

impl ClientChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientChangeType::Created => "CREATED",
            ClientChangeType::Updated => "UPDATED",
            ClientChangeType::Deleted => "DELETED",
        }
    }
}

impl Display for ClientChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ClientChangeType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "CREATED" => Ok(ClientChangeType::Created),
            "UPDATED" => Ok(ClientChangeType::Updated),
            "DELETED" => Ok(ClientChangeType::Deleted),
            _ => Err(()),
        }
    }
}

/// Notification about a change made by some session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientChange {
    #[serde(rename = "type")]
    pub change_type: ClientChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Utc::now")]
    pub at: DateTime<Utc>,
}

impl ClientChange {
    fn new(
        change_type: ClientChangeType,
        client_id: Option<ClientId>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            change_type,
            client_id,
            display_name,
            message: None,
            at: Utc::now(),
        }
    }

    pub fn created(client_id: Option<ClientId>, display_name: impl Into<String>) -> Self {
        Self::new(
            ClientChangeType::Created,
            client_id,
            Some(display_name.into()),
        )
    }

    pub fn updated(client_id: ClientId, display_name: impl Into<String>) -> Self {
        Self::new(
            ClientChangeType::Updated,
            Some(client_id),
            Some(display_name.into()),
        )
    }

    pub fn deleted(client_id: ClientId) -> Self {
        Self::new(ClientChangeType::Deleted, Some(client_id), None)
    }
}
