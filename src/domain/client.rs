use serde::{Deserialize, Serialize};

use crate::domain::country;
use crate::domain::types::{
    ClientDetails, ClientEmail, ClientId, CountryName, DisplayName, FullName,
    TypeConstraintError,
};

/// Client record as known to both the backend and the console.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub full_name: FullName,
    pub display_name: DisplayName,
    pub email: ClientEmail,
    pub details: ClientDetails,
    pub active: bool,
    pub location: String,
    pub country: CountryName,
}

impl Client {
    /// Builds a client from raw values, validating every constrained field.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        full_name: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        details: impl Into<String>,
        active: bool,
        location: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: ClientId::new(id)?,
            full_name: FullName::new(full_name)?,
            display_name: DisplayName::new(display_name)?,
            email: ClientEmail::new(email)?,
            details: ClientDetails::new(details)?,
            active,
            location: location.into().trim().to_string(),
            country: CountryName::new(country)?,
        })
    }

    /// ISO 3166-1 alpha-2 code of the country, `None` when the name is unknown.
    pub fn country_code(&self) -> Option<&'static str> {
        match country::iso_from_name(self.country.as_str()) {
            "" => None,
            code => Some(code),
        }
    }

    /// Word used for the active flag in search and exports.
    pub fn status_label(&self) -> &'static str {
        if self.active { "active" } else { "inactive" }
    }
}

/// Validated payload for creating a single client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewClient {
    pub full_name: FullName,
    pub display_name: DisplayName,
    pub email: ClientEmail,
    pub details: ClientDetails,
    pub active: bool,
    pub location: String,
    pub country: CountryName,
}

impl NewClient {
    pub fn try_new(
        full_name: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        details: impl Into<String>,
        active: bool,
        location: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            full_name: FullName::new(full_name)?,
            display_name: DisplayName::new(display_name)?,
            email: ClientEmail::new(email)?,
            details: ClientDetails::new(details)?,
            active,
            location: location.into().trim().to_string(),
            country: CountryName::new(country)?,
        })
    }
}

/// Partial update of an existing client. `None` leaves the stored value as is;
/// `active` is always overwritten.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateClient {
    pub full_name: Option<FullName>,
    pub display_name: Option<DisplayName>,
    pub email: Option<ClientEmail>,
    pub details: Option<ClientDetails>,
    pub active: bool,
    pub location: Option<String>,
    pub country: Option<CountryName>,
}

impl From<&Client> for UpdateClient {
    fn from(client: &Client) -> Self {
        Self {
            full_name: Some(client.full_name.clone()),
            display_name: Some(client.display_name.clone()),
            email: Some(client.email.clone()),
            details: Some(client.details.clone()),
            active: client.active,
            location: Some(client.location.clone()),
            country: Some(client.country.clone()),
        }
    }
}
