//! JSON shapes of the `/api/v1/clients` endpoints.
//!
//! Responses are validated when converted into domain values, so a malformed
//! record from the server surfaces as an error instead of leaking into the
//! working set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::types::TypeConstraintError;

/// A single client as serialized on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: i32,
    pub full_name: String,
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub country: String,
}

impl From<&Client> for ClientDto {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.get(),
            full_name: client.full_name.to_string(),
            display_name: client.display_name.to_string(),
            email: client.email.to_string(),
            details: (!client.details.is_empty()).then(|| client.details.to_string()),
            active: client.active,
            location: (!client.location.is_empty()).then(|| client.location.clone()),
            country: client.country.to_string(),
        }
    }
}

impl TryFrom<ClientDto> for Client {
    type Error = TypeConstraintError;

    fn try_from(dto: ClientDto) -> Result<Self, Self::Error> {
        Client::try_new(
            dto.id,
            dto.full_name,
            dto.display_name,
            dto.email,
            dto.details.unwrap_or_default(),
            dto.active,
            dto.location.unwrap_or_default(),
            dto.country,
        )
    }
}

/// Snapshot of every client, sorted by id. Returned by all endpoints.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientsResponse {
    #[serde(default)]
    pub clients: Vec<ClientDto>,
}

impl ClientsResponse {
    pub fn from_clients(clients: &[Client]) -> Self {
        Self {
            clients: clients.iter().map(ClientDto::from).collect(),
        }
    }

    /// Converts every record into a validated domain client.
    pub fn into_clients(self) -> Result<Vec<Client>, TypeConstraintError> {
        self.clients.into_iter().map(Client::try_from).collect()
    }
}

/// Error body produced by the API for every failed request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Credentials posted to `auth/login`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile of the signed-in user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub email_verified: bool,
    #[serde(default)]
    pub last_login_at: Option<String>,
}

/// Successful `auth/login` response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_response_parses_camel_case_payload() {
        let body = r#"{"clients":[{"id":1,"fullName":"Jane Doe","displayName":"Jane",
            "email":"jane@x.com","active":true,"country":"Netherlands"}]}"#;

        let response: ClientsResponse = serde_json::from_str(body).unwrap();
        let clients = response.into_clients().unwrap();

        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].display_name.as_str(), "Jane");
        assert!(clients[0].details.is_empty());
    }

    #[test]
    fn invalid_record_is_rejected_at_the_boundary() {
        let response = ClientsResponse {
            clients: vec![ClientDto {
                id: 0,
                full_name: "Jane".into(),
                display_name: "Jane".into(),
                email: "jane@x.com".into(),
                details: None,
                active: false,
                location: None,
                country: "Netherlands".into(),
            }],
        };

        assert_eq!(
            response.into_clients(),
            Err(TypeConstraintError::NonPositiveId)
        );
    }

    #[test]
    fn empty_optional_fields_are_omitted() {
        let client = Client::try_new(2, "Bob", "Bob", "bob@x.com", "", false, "", "France").unwrap();
        let value = serde_json::to_value(ClientDto::from(&client)).unwrap();

        assert!(value.get("details").is_none());
        assert!(value.get("location").is_none());
        assert_eq!(value["fullName"], "Bob");
    }
}
