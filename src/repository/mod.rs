//! Persistence boundary for client records.
//!
//! Services depend on the [`ClientReader`] and [`ClientWriter`] traits only;
//! [`DieselRepository`] is the SQLite implementation and
//! `mock::MockRepository` replaces it in unit tests.

use crate::db::{DbConnection, DbPool};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::{ClientEmail, ClientId};
use crate::repository::errors::RepositoryResult;

pub mod client;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;

/// Diesel-backed repository sharing one connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

pub trait ClientReader {
    /// Every stored client ordered by id ascending.
    fn list_clients(&self) -> RepositoryResult<Vec<Client>>;
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn get_client_by_email(&self, email: &ClientEmail) -> RepositoryResult<Option<Client>>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    /// Inserts all records in one transaction; nothing is stored on failure.
    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<Vec<Client>>;
    fn update_client(&self, client_id: ClientId, updates: &UpdateClient)
    -> RepositoryResult<Client>;
    /// Deletes the given ids and returns the ones that existed.
    fn delete_clients(&self, client_ids: &[ClientId]) -> RepositoryResult<Vec<ClientId>>;
}
