//! Request bodies accepted by the clients API.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::{
    ClientDetails, ClientEmail, ClientId, CountryName, DisplayName, FullName,
};
use crate::forms::FormError;

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /api/v1/clients` and each element of a bulk create.
pub struct CreateClientForm {
    #[validate(length(max = 120))]
    pub full_name: String,
    #[validate(length(max = 120))]
    pub display_name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub details: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub country: String,
}

impl TryFrom<CreateClientForm> for NewClient {
    type Error = FormError;

    fn try_from(form: CreateClientForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(NewClient {
            full_name: FullName::new(form.full_name).map_err(FormError::field("fullName"))?,
            display_name: DisplayName::new(form.display_name)
                .map_err(FormError::field("displayName"))?,
            email: ClientEmail::new(form.email).map_err(FormError::field("email"))?,
            details: ClientDetails::new(form.details.unwrap_or_default())
                .map_err(FormError::field("details"))?,
            active: form.active,
            location: form.location.unwrap_or_default().trim().to_string(),
            country: CountryName::new(form.country).map_err(FormError::field("country"))?,
        })
    }
}

impl From<&NewClient> for CreateClientForm {
    fn from(client: &NewClient) -> Self {
        Self {
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

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
/// Body of `POST /api/v1/clients/bulk`: either `{"clients": [...]}` or a bare array.
pub enum BulkCreateForm {
    Wrapped { clients: Vec<CreateClientForm> },
    Bare(Vec<CreateClientForm>),
}

impl BulkCreateForm {
    pub fn new(clients: Vec<CreateClientForm>) -> Self {
        BulkCreateForm::Wrapped { clients }
    }

    fn into_forms(self) -> Vec<CreateClientForm> {
        match self {
            BulkCreateForm::Wrapped { clients } | BulkCreateForm::Bare(clients) => clients,
        }
    }
}

impl TryFrom<BulkCreateForm> for Vec<NewClient> {
    type Error = FormError;

    fn try_from(form: BulkCreateForm) -> Result<Self, Self::Error> {
        let forms = form.into_forms();
        if forms.is_empty() {
            return Err(FormError::EmptyBatch("client"));
        }
        forms.into_iter().map(NewClient::try_from).collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Body of `PUT /api/v1/clients`. Absent fields keep their stored values.
pub struct UpdateClientForm {
    pub id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120))]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120))]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub details: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

/// Validated update ready for persistence.
pub struct UpdateClientPayload {
    pub id: ClientId,
    pub updates: UpdateClient,
}

impl TryFrom<UpdateClientForm> for UpdateClientPayload {
    type Error = FormError;

    fn try_from(form: UpdateClientForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let id = ClientId::new(form.id).map_err(|_| FormError::InvalidClientId)?;
        let updates = UpdateClient {
            full_name: form
                .full_name
                .map(FullName::new)
                .transpose()
                .map_err(FormError::field("fullName"))?,
            display_name: form
                .display_name
                .map(DisplayName::new)
                .transpose()
                .map_err(FormError::field("displayName"))?,
            email: form
                .email
                .map(ClientEmail::new)
                .transpose()
                .map_err(FormError::field("email"))?,
            details: form
                .details
                .map(ClientDetails::new)
                .transpose()
                .map_err(FormError::field("details"))?,
            active: form.active,
            location: form.location.map(|s| s.trim().to_string()),
            country: form
                .country
                .map(CountryName::new)
                .transpose()
                .map_err(FormError::field("country"))?,
        };

        Ok(Self { id, updates })
    }
}

impl From<(ClientId, &UpdateClient)> for UpdateClientForm {
    fn from((id, updates): (ClientId, &UpdateClient)) -> Self {
        Self {
            id: id.get(),
            full_name: updates.full_name.as_ref().map(ToString::to_string),
            display_name: updates.display_name.as_ref().map(ToString::to_string),
            email: updates.email.as_ref().map(ToString::to_string),
            details: updates.details.as_ref().map(ToString::to_string),
            active: updates.active,
            location: updates.location.clone(),
            country: updates.country.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq, Eq)]
/// Body of `DELETE /api/v1/clients`.
pub struct DeleteClientsForm {
    #[validate(length(min = 1, message = "ids must not be empty"))]
    pub ids: Vec<Option<i32>>,
}

impl DeleteClientsForm {
    pub fn new(ids: &[ClientId]) -> Self {
        Self {
            ids: ids.iter().map(|id| Some(id.get())).collect(),
        }
    }
}

impl TryFrom<DeleteClientsForm> for Vec<ClientId> {
    type Error = FormError;

    /// Drops nulls and duplicates, keeping ascending order.
    fn try_from(form: DeleteClientsForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let unique = form.ids.into_iter().flatten().collect::<BTreeSet<i32>>();
        unique
            .into_iter()
            .map(|id| ClientId::new(id).map_err(|_| FormError::InvalidClientId))
            .collect()
    }
}
