//! Client workflows behind the `/api/v1/clients` endpoints.
//!
//! Every mutation returns the refreshed snapshot of all clients ordered by id
//! and publishes one or more [`ClientChange`] notifications.

use std::collections::HashSet;
use std::io::Read;

use crate::domain::client::{Client, NewClient};
use crate::domain::client_event::ClientChange;
use crate::domain::types::ClientId;
use crate::events::ClientChangePublisher;
use crate::forms::client::{
    BulkCreateForm, CreateClientForm, DeleteClientsForm, UpdateClientForm, UpdateClientPayload,
};
use crate::repository::{ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::sheet::parse_sheet;

/// Returns every client ordered by id.
pub fn list_clients<R>(repo: &R) -> ServiceResult<Vec<Client>>
where
    R: ClientReader + ?Sized,
{
    repo.list_clients().map_err(|err| {
        log::error!("Failed to list clients: {err}");
        ServiceError::from(err)
    })
}

fn ensure_email_available<R>(
    repo: &R,
    client: &NewClient,
    except: Option<ClientId>,
) -> ServiceResult<()>
where
    R: ClientReader + ?Sized,
{
    match repo.get_client_by_email(&client.email)? {
        Some(existing) if Some(existing.id) != except => Err(ServiceError::Conflict(format!(
            "Email already exists: {}",
            client.email
        ))),
        _ => Ok(()),
    }
}

/// Creates one client.
pub fn create_client<R, P>(repo: &R, events: &P, form: CreateClientForm) -> ServiceResult<Vec<Client>>
where
    R: ClientReader + ClientWriter + ?Sized,
    P: ClientChangePublisher + ?Sized,
{
    let new_client = NewClient::try_from(form)?;
    ensure_email_available(repo, &new_client, None)?;

    let created = repo.create_client(&new_client).map_err(|err| {
        log::error!("Failed to create client: {err}");
        err
    })?;
    log::info!("Created client {}", created.id);

    events.publish(ClientChange::created(
        Some(created.id),
        created.display_name.as_str(),
    ));

    list_clients(repo)
}

/// Stores a batch of new clients atomically.
pub fn create_clients<R, P>(repo: &R, events: &P, clients: &[NewClient]) -> ServiceResult<Vec<Client>>
where
    R: ClientReader + ClientWriter + ?Sized,
    P: ClientChangePublisher + ?Sized,
{
    let Some(first) = clients.first() else {
        return Err(ServiceError::Validation(
            "at least one client is required".to_string(),
        ));
    };

    let mut seen = HashSet::new();
    for client in clients {
        if !seen.insert(client.email.as_str()) {
            return Err(ServiceError::Conflict(format!(
                "Duplicate email in batch: {}",
                client.email
            )));
        }
        ensure_email_available(repo, client, None)?;
    }

    let created = repo.create_clients(clients).map_err(|err| {
        log::error!("Failed to create {} clients: {err}", clients.len());
        err
    })?;
    log::info!("Created {} clients", created.len());

    events.publish(ClientChange::created(
        created.first().map(|client| client.id),
        first.display_name.as_str(),
    ));

    list_clients(repo)
}

/// Handles `POST /bulk`.
pub fn bulk_create_clients<R, P>(
    repo: &R,
    events: &P,
    form: BulkCreateForm,
) -> ServiceResult<Vec<Client>>
where
    R: ClientReader + ClientWriter + ?Sized,
    P: ClientChangePublisher + ?Sized,
{
    let clients = Vec::<NewClient>::try_from(form)?;
    create_clients(repo, events, &clients)
}

/// Imports the rows of an uploaded CSV sheet.
pub fn upload_clients<R, P, S>(repo: &R, events: &P, sheet: S) -> ServiceResult<Vec<Client>>
where
    R: ClientReader + ClientWriter + ?Sized,
    P: ClientChangePublisher + ?Sized,
    S: Read,
{
    let parsed = parse_sheet(sheet)?;
    if parsed.rows.is_empty() {
        return Err(ServiceError::Validation(
            "The sheet contains no importable rows".to_string(),
        ));
    }
    create_clients(repo, events, &parsed.rows)
}

/// Applies a partial update to an existing client.
pub fn update_client<R, P>(repo: &R, events: &P, form: UpdateClientForm) -> ServiceResult<Vec<Client>>
where
    R: ClientReader + ClientWriter + ?Sized,
    P: ClientChangePublisher + ?Sized,
{
    let UpdateClientPayload { id, updates } = UpdateClientPayload::try_from(form)?;

    let Some(existing) = repo.get_client_by_id(id)? else {
        return Err(ServiceError::NotFound(format!("Client not found: {id}")));
    };

    if let Some(email) = updates.email.as_ref()
        && *email != existing.email
        && let Some(owner) = repo.get_client_by_email(email)?
        && owner.id != id
    {
        return Err(ServiceError::Conflict(format!(
            "Email already exists: {email}"
        )));
    }

    let updated = repo.update_client(id, &updates).map_err(|err| {
        log::error!("Failed to update client {id}: {err}");
        err
    })?;

    events.publish(ClientChange::updated(
        updated.id,
        updated.display_name.as_str(),
    ));

    list_clients(repo)
}

/// Deletes the requested ids; unknown ids are ignored.
pub fn delete_clients<R, P>(repo: &R, events: &P, form: DeleteClientsForm) -> ServiceResult<Vec<Client>>
where
    R: ClientReader + ClientWriter + ?Sized,
    P: ClientChangePublisher + ?Sized,
{
    let ids = Vec::<ClientId>::try_from(form)?;

    let deleted = repo.delete_clients(&ids).map_err(|err| {
        log::error!("Failed to delete clients: {err}");
        err
    })?;
    log::info!("Deleted {} of {} requested clients", deleted.len(), ids.len());

    for id in deleted {
        events.publish(ClientChange::deleted(id));
    }

    list_clients(repo)
}
