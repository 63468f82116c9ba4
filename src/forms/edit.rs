//! Client edit form used by the console before any request is sent.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::TypeConstraintError;

/// Fields of [`ClientEditForm`] in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditField {
    FullName,
    DisplayName,
    Email,
    Details,
    Active,
    Location,
    Country,
}

impl EditField {
    pub const ALL: [EditField; 7] = [
        EditField::FullName,
        EditField::DisplayName,
        EditField::Email,
        EditField::Details,
        EditField::Active,
        EditField::Location,
        EditField::Country,
    ];

    /// Field name as reported by the validator.
    pub fn key(self) -> &'static str {
        match self {
            EditField::FullName => "full_name",
            EditField::DisplayName => "display_name",
            EditField::Email => "email",
            EditField::Details => "details",
            EditField::Active => "active",
            EditField::Location => "location",
            EditField::Country => "country",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditField::FullName => "Full name",
            EditField::DisplayName => "Display name",
            EditField::Email => "Email",
            EditField::Details => "Details",
            EditField::Active => "Active",
            EditField::Location => "Location",
            EditField::Country => "Country",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
/// Values bound to the create/edit dialog.
pub struct ClientEditForm {
    #[validate(length(min = 1, max = 128))]
    pub full_name: String,
    #[validate(length(min = 1, max = 30))]
    pub display_name: String,
    #[validate(length(min = 1, max = 254), email)]
    pub email: String,
    #[validate(length(max = 500))]
    pub details: String,
    pub active: bool,
    #[validate(length(max = 120))]
    pub location: String,
    #[validate(length(min = 1))]
    pub country: String,
}

impl From<&Client> for ClientEditForm {
    fn from(client: &Client) -> Self {
        Self {
            full_name: client.full_name.to_string(),
            display_name: client.display_name.to_string(),
            email: client.email.to_string(),
            details: client.details.to_string(),
            active: client.active,
            location: client.location.clone(),
            country: client.country.to_string(),
        }
    }
}

impl ClientEditForm {
    fn value(&self, field: EditField) -> &str {
        match field {
            EditField::FullName => &self.full_name,
            EditField::DisplayName => &self.display_name,
            EditField::Email => &self.email,
            EditField::Details => &self.details,
            EditField::Active => "",
            EditField::Location => &self.location,
            EditField::Country => &self.country,
        }
    }

    /// Inline message for a single field, or `None` when it is valid.
    pub fn error_for(&self, field: EditField) -> Option<String> {
        let errors = self.validate().err()?;
        message_for(&errors, field, self.value(field))
    }

    /// Every failing field with its message, in display order.
    pub fn errors(&self) -> Vec<(EditField, String)> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };
        EditField::ALL
            .iter()
            .filter_map(|&field| {
                message_for(&errors, field, self.value(field)).map(|message| (field, message))
            })
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn to_new_client(&self) -> Result<NewClient, TypeConstraintError> {
        NewClient::try_new(
            self.full_name.as_str(),
            self.display_name.as_str(),
            self.email.as_str(),
            self.details.as_str(),
            self.active,
            self.location.as_str(),
            self.country.as_str(),
        )
    }

    pub fn to_update(&self) -> Result<UpdateClient, TypeConstraintError> {
        let client = self.to_new_client()?;
        Ok(UpdateClient {
            full_name: Some(client.full_name),
            display_name: Some(client.display_name),
            email: Some(client.email),
            details: Some(client.details),
            active: client.active,
            location: Some(client.location),
            country: Some(client.country),
        })
    }
}

fn message_for(errors: &ValidationErrors, field: EditField, value: &str) -> Option<String> {
    let field_errors = errors.field_errors();
    let failures = field_errors.get(field.key())?;

    if value.is_empty() {
        return Some(format!("{} is required", field.label()));
    }
    if failures.iter().any(|failure| failure.code == "email") {
        return Some("Enter a valid email".to_string());
    }
    let max = failures
        .iter()
        .find_map(|failure| failure.params.get("max").and_then(|max| max.as_u64()));
    Some(match max {
        Some(max) => format!("Max {max} characters"),
        None => "Invalid value".to_string(),
    })
}
