use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, UpdateClient as DomainUpdateClient,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub full_name: String,
    pub display_name: String,
    pub email: String,
    pub details: String,
    pub active: bool,
    pub location: String,
    pub country: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub full_name: &'a str,
    pub display_name: &'a str,
    pub email: &'a str,
    pub details: &'a str,
    pub active: bool,
    pub location: &'a str,
    pub country: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Data used when updating a [`Client`] record. `None` columns are left untouched.
pub struct UpdateClient<'a> {
    pub full_name: Option<&'a str>,
    pub display_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub details: Option<&'a str>,
    pub active: bool,
    pub location: Option<&'a str>,
    pub country: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        DomainClient::try_new(
            client.id,
            client.full_name,
            client.display_name,
            client.email,
            client.details,
            client.active,
            client.location,
            client.country,
        )
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            full_name: client.full_name.as_str(),
            display_name: client.display_name.as_str(),
            email: client.email.as_str(),
            details: client.details.as_str(),
            active: client.active,
            location: client.location.as_str(),
            country: client.country.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateClient> for UpdateClient<'a> {
    fn from(client: &'a DomainUpdateClient) -> Self {
        Self {
            full_name: client.full_name.as_ref().map(|v| v.as_str()),
            display_name: client.display_name.as_ref().map(|v| v.as_str()),
            email: client.email.as_ref().map(|v| v.as_str()),
            details: client.details.as_ref().map(|v| v.as_str()),
            active: client.active,
            location: client.location.as_deref(),
            country: client.country.as_ref().map(|v| v.as_str()),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
