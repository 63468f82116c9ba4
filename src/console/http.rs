//! REST collaborators of the console and their reqwest implementation.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::ClientId;
use crate::dto::api::{ClientsResponse, ErrorBody, LoginRequest, LoginResponse};
use crate::forms::client::{BulkCreateForm, CreateClientForm, DeleteClientsForm, UpdateClientForm};

/// Shown when a failure carries no usable message.
pub const GENERIC_ERROR: &str = "Unexpected error. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Message suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_ERROR.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Http(err) => err.status().map(|status| status.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }
}

/// Operations on the clients resource. Every call returns the server's
/// snapshot of all clients.
#[async_trait]
pub trait ClientsApi: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Client>, ApiError>;
    async fn create(&self, client: &NewClient) -> Result<Vec<Client>, ApiError>;
    async fn create_bulk(&self, clients: &[NewClient]) -> Result<Vec<Client>, ApiError>;
    async fn update(&self, id: ClientId, updates: &UpdateClient) -> Result<Vec<Client>, ApiError>;
    async fn delete(&self, ids: &[ClientId]) -> Result<Vec<Client>, ApiError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
}

/// HTTP client for `{base}/clients` and `{base}/auth/login`.
pub struct HttpClientsApi {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl HttpClientsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the change notification stream.
    pub fn events_url(&self) -> String {
        format!("{}/events", self.clients_url())
    }

    fn clients_url(&self) -> String {
        format!("{}/clients", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Opens the change notification stream.
    pub async fn open_events(&self) -> Result<Response, ApiError> {
        let request = self
            .http
            .get(self.events_url())
            .header(reqwest::header::ACCEPT, "text/event-stream");
        let response = self.authorize(request).send().await?;
        check(response).await
    }

    async fn snapshot(&self, request: reqwest::RequestBuilder) -> Result<Vec<Client>, ApiError> {
        let response = check(self.authorize(request).send().await?).await?;
        let body: ClientsResponse = decode(response).await?;
        body.into_clients()
            .map_err(|err| ApiError::InvalidResponse(err.to_string()))
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) if !body.message.trim().is_empty() => body.message,
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR.as_str())
            .to_string(),
    };
    Err(ApiError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

#[async_trait]
impl ClientsApi for HttpClientsApi {
    async fn fetch_all(&self) -> Result<Vec<Client>, ApiError> {
        self.snapshot(self.http.get(self.clients_url())).await
    }

    async fn create(&self, client: &NewClient) -> Result<Vec<Client>, ApiError> {
        let body = CreateClientForm::from(client);
        self.snapshot(self.http.post(self.clients_url()).json(&body))
            .await
    }

    async fn create_bulk(&self, clients: &[NewClient]) -> Result<Vec<Client>, ApiError> {
        let body = BulkCreateForm::new(clients.iter().map(CreateClientForm::from).collect());
        let url = format!("{}/bulk", self.clients_url());
        self.snapshot(self.http.post(url).json(&body)).await
    }

    async fn update(&self, id: ClientId, updates: &UpdateClient) -> Result<Vec<Client>, ApiError> {
        let body = UpdateClientForm::from((id, updates));
        self.snapshot(self.http.put(self.clients_url()).json(&body))
            .await
    }

    async fn delete(&self, ids: &[ClientId]) -> Result<Vec<Client>, ApiError> {
        let body = DeleteClientsForm::new(ids);
        self.snapshot(self.http.delete(self.clients_url()).json(&body))
            .await
    }
}

#[async_trait]
impl AuthApi for HttpClientsApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/auth/login", self.base_url);
        let response = check(self.http.post(url).json(request).send().await?).await?;
        decode(response).await
    }
}
