use diesel::prelude::*;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::{ClientEmail, ClientId};
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientReader, ClientWriter, DieselRepository};
use crate::schema::clients;

fn into_domain(rows: Vec<DbClient>) -> RepositoryResult<Vec<Client>> {
    rows.into_iter()
        .map(|row| Client::try_from(row).map_err(RepositoryError::from))
        .collect()
}

fn insert_one(conn: &mut SqliteConnection, new_client: &NewClient) -> RepositoryResult<Client> {
    let insertable = DbNewClient::from(new_client);
    let row = diesel::insert_into(clients::table)
        .values(&insertable)
        .returning(DbClient::as_returning())
        .get_result::<DbClient>(conn)?;
    Ok(Client::try_from(row)?)
}

impl ClientReader for DieselRepository {
    fn list_clients(&self) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        let rows = clients::table
            .order(clients::id.asc())
            .select(DbClient::as_select())
            .load::<DbClient>(&mut conn)?;
        into_domain(rows)
    }

    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        let row = clients::table
            .find(id.get())
            .select(DbClient::as_select())
            .first::<DbClient>(&mut conn)
            .optional()?;
        Ok(row.map(Client::try_from).transpose()?)
    }

    fn get_client_by_email(&self, email: &ClientEmail) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        let row = clients::table
            .filter(clients::email.eq(email.as_str()))
            .select(DbClient::as_select())
            .first::<DbClient>(&mut conn)
            .optional()?;
        Ok(row.map(Client::try_from).transpose()?)
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        insert_one(&mut conn, new_client)
    }

    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<Vec<Client>> {
        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            new_clients
                .iter()
                .map(|new_client| insert_one(conn, new_client))
                .collect()
        })
    }

    fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        let changes = DbUpdateClient::from(updates);
        let row = diesel::update(clients::table.find(client_id.get()))
            .set(&changes)
            .returning(DbClient::as_returning())
            .get_result::<DbClient>(&mut conn)?;
        Ok(Client::try_from(row)?)
    }

    fn delete_clients(&self, client_ids: &[ClientId]) -> RepositoryResult<Vec<ClientId>> {
        let raw_ids = client_ids.iter().map(|id| id.get()).collect::<Vec<i32>>();
        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let existing = clients::table
                .filter(clients::id.eq_any(&raw_ids))
                .order(clients::id.asc())
                .select(clients::id)
                .load::<i32>(conn)?;
            diesel::delete(clients::table.filter(clients::id.eq_any(&existing))).execute(conn)?;
            existing
                .into_iter()
                .map(|id| ClientId::new(id).map_err(RepositoryError::from))
                .collect()
        })
    }
}
