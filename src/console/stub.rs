//! In-memory `ClientsApi` used by the console tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::console::http::{ApiError, ClientsApi};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::ClientId;

#[derive(Default)]
struct State {
    clients: Vec<Client>,
    next_id: i32,
    calls: Vec<String>,
    fail_bulk: bool,
    fail_all: bool,
    rejected_emails: Vec<String>,
    fail_fetch_after_delete: bool,
    deleted: bool,
}

pub(crate) struct StubClientsApi {
    state: Mutex<State>,
}

impl StubClientsApi {
    pub(crate) fn new(clients: Vec<Client>) -> Self {
        let next_id = clients.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(State {
                clients,
                next_id,
                ..State::default()
            }),
        }
    }

    pub(crate) fn with_clients(count: i32) -> Self {
        Self::new((1..=count).map(sample).collect())
    }

    pub(crate) fn failing_bulk(self) -> Self {
        self.state.lock().unwrap().fail_bulk = true;
        self
    }

    pub(crate) fn failing_everything(self) -> Self {
        self.state.lock().unwrap().fail_all = true;
        self
    }

    /// `fetch_all` starts failing once a delete has gone through.
    pub(crate) fn failing_fetch_after_delete(self) -> Self {
        self.state.lock().unwrap().fail_fetch_after_delete = true;
        self
    }

    pub(crate) fn rejecting(self, email: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .rejected_emails
            .push(email.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn clients(&self) -> Vec<Client> {
        self.state.lock().unwrap().clients.clone()
    }
}

pub(crate) fn sample(id: i32) -> Client {
    Client::try_new(
        id,
        format!("Client {id}"),
        format!("C{id}"),
        format!("c{id}@example.com"),
        "",
        true,
        "",
        "Netherlands",
    )
    .unwrap()
}

fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Server {
        status,
        message: message.to_string(),
    }
}

impl State {
    fn check(&mut self, call: &str) -> Result<(), ApiError> {
        self.calls.push(call.to_string());
        if self.fail_all {
            return Err(rejected(500, "Internal error"));
        }
        Ok(())
    }

    fn insert(&mut self, client: &NewClient) -> Result<(), ApiError> {
        if self.rejected_emails.iter().any(|e| e == client.email.as_str()) {
            return Err(rejected(400, "Invalid client"));
        }
        if self.clients.iter().any(|c| c.email == client.email) {
            return Err(rejected(
                409,
                &format!("Email already exists: {}", client.email),
            ));
        }
        self.clients.push(Client {
            id: ClientId::new(self.next_id).unwrap(),
            full_name: client.full_name.clone(),
            display_name: client.display_name.clone(),
            email: client.email.clone(),
            details: client.details.clone(),
            active: client.active,
            location: client.location.clone(),
            country: client.country.clone(),
        });
        self.next_id += 1;
        Ok(())
    }
}

#[async_trait]
impl ClientsApi for StubClientsApi {
    async fn fetch_all(&self) -> Result<Vec<Client>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.check("fetch_all")?;
        if state.fail_fetch_after_delete && state.deleted {
            return Err(rejected(503, "Service unavailable"));
        }
        Ok(state.clients.clone())
    }

    async fn create(&self, client: &NewClient) -> Result<Vec<Client>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.check("create")?;
        state.insert(client)?;
        Ok(state.clients.clone())
    }

    async fn create_bulk(&self, clients: &[NewClient]) -> Result<Vec<Client>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.check("create_bulk")?;
        if state.fail_bulk {
            return Err(rejected(500, "Bulk insert failed"));
        }
        for client in clients {
            state.insert(client)?;
        }
        Ok(state.clients.clone())
    }

    async fn update(&self, id: ClientId, updates: &UpdateClient) -> Result<Vec<Client>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.check("update")?;
        let Some(client) = state.clients.iter_mut().find(|c| c.id == id) else {
            return Err(rejected(404, "Client not found"));
        };
        if let Some(display_name) = &updates.display_name {
            client.display_name = display_name.clone();
        }
        if let Some(email) = &updates.email {
            client.email = email.clone();
        }
        client.active = updates.active;
        Ok(state.clients.clone())
    }

    async fn delete(&self, ids: &[ClientId]) -> Result<Vec<Client>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.check("delete")?;
        state.clients.retain(|c| !ids.contains(&c.id));
        state.deleted = true;
        Ok(state.clients.clone())
    }
}
