//! Create/edit dialog controller.

use thiserror::Error;

use crate::console::http::{ApiError, ClientsApi};
use crate::domain::client::Client;
use crate::domain::types::TypeConstraintError;
use crate::forms::edit::{ClientEditForm, EditField};

/// What the dialog was opened for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditRequest {
    New,
    Existing(Client),
}

/// Result handed back to the client list when the dialog closes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Created(Client),
    Updated(Client),
    Cancelled,
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("form has {} invalid fields", .0.len())]
    Invalid(Vec<(EditField, String)>),
    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl EditError {
    /// Message for the dialog's error banner.
    pub fn user_message(&self) -> String {
        match self {
            EditError::Invalid(errors) => errors
                .first()
                .map(|(_, message)| message.clone())
                .unwrap_or_else(|| "Invalid value".to_string()),
            EditError::Constraint(err) => err.to_string(),
            EditError::Api(err) => err.user_message(),
        }
    }
}

pub struct EditController {
    request: EditRequest,
    pub form: ClientEditForm,
}

impl EditController {
    pub fn new(request: EditRequest) -> Self {
        let form = match &request {
            EditRequest::New => ClientEditForm::default(),
            EditRequest::Existing(client) => ClientEditForm::from(client),
        };
        Self { request, form }
    }

    pub fn is_new(&self) -> bool {
        matches!(self.request, EditRequest::New)
    }

    pub fn title(&self) -> &'static str {
        if self.is_new() { "New client" } else { "Edit client" }
    }

    pub fn cancel(&self) -> EditOutcome {
        EditOutcome::Cancelled
    }

    /// Validates the form and sends it. Nothing is sent while the form is
    /// invalid.
    pub async fn save<A: ClientsApi + ?Sized>(&self, api: &A) -> Result<EditOutcome, EditError> {
        let errors = self.form.errors();
        if !errors.is_empty() {
            return Err(EditError::Invalid(errors));
        }

        match &self.request {
            EditRequest::New => {
                let client = self.form.to_new_client()?;
                let snapshot = api.create(&client).await.map_err(|err| {
                    log::error!("Failed to create client: {err}");
                    err
                })?;
                snapshot
                    .into_iter()
                    .find(|stored| stored.email == client.email)
                    .map(EditOutcome::Created)
                    .ok_or_else(|| missing("created client"))
            }
            EditRequest::Existing(existing) => {
                let updates = self.form.to_update()?;
                let snapshot = api.update(existing.id, &updates).await.map_err(|err| {
                    log::error!("Failed to update client {}: {err}", existing.id);
                    err
                })?;
                snapshot
                    .into_iter()
                    .find(|stored| stored.id == existing.id)
                    .map(EditOutcome::Updated)
                    .ok_or_else(|| missing("updated client"))
            }
        }
    }
}

fn missing(what: &str) -> EditError {
    EditError::Api(ApiError::InvalidResponse(format!("{what} not in response")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::stub::{StubClientsApi, sample};

    fn filled() -> ClientEditForm {
        ClientEditForm {
            full_name: "Jane Doe".to_string(),
            display_name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            details: String::new(),
            active: true,
            location: "Amsterdam".to_string(),
            country: "Netherlands".to_string(),
        }
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() {
        let api = StubClientsApi::with_clients(1);
        let controller = EditController::new(EditRequest::New);

        let err = controller.save(&api).await.unwrap_err();
        assert_eq!(err.user_message(), "Full name is required");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn new_client_is_created() {
        let api = StubClientsApi::with_clients(2);
        let mut controller = EditController::new(EditRequest::New);
        controller.form = filled();

        let outcome = controller.save(&api).await.unwrap();
        let EditOutcome::Created(client) = outcome else {
            panic!("expected a created client");
        };
        assert_eq!(client.id.get(), 3);
        assert_eq!(client.display_name.as_str(), "Jane");
    }

    #[tokio::test]
    async fn existing_client_is_updated() {
        let api = StubClientsApi::with_clients(2);
        let mut controller = EditController::new(EditRequest::Existing(sample(2)));
        assert_eq!(controller.title(), "Edit client");
        controller.form.display_name = "Second".to_string();
        controller.form.active = false;

        let outcome = controller.save(&api).await.unwrap();
        let EditOutcome::Updated(client) = outcome else {
            panic!("expected an updated client");
        };
        assert_eq!(client.display_name.as_str(), "Second");
        assert!(!client.active);
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let api = StubClientsApi::with_clients(1);
        let mut controller = EditController::new(EditRequest::New);
        controller.form = ClientEditForm {
            email: "c1@example.com".to_string(),
            ..filled()
        };

        let err = controller.save(&api).await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Email already exists: c1@example.com"
        );
    }
}
