//! Client Repository

use std::sync::Arc;

use shared::models::{Client, ClientCreate, ClientUpdate};
use shared::util::{now_millis, snowflake_id};

use super::{RepoError, RepoResult, Repository};
use crate::db::MemoryDb;

#[derive(Clone)]
pub struct ClientRepository {
    db: Arc<MemoryDb>,
}

impl ClientRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }

    /// Find a client by phone number (exact match)
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<Client>> {
        Ok(self
            .db
            .clients
            .iter()
            .find(|entry| entry.phone.as_deref() == Some(phone))
            .map(|entry| entry.clone()))
    }

    /// Fold a submitted order into the client's reporting aggregates.
    ///
    /// These fields are a cache for listings; nothing recomputes totals
    /// from them.
    pub async fn record_order(&self, client_id: i64, order_total: f64, at: i64) -> RepoResult<()> {
        let mut entry = self
            .db
            .clients
            .get_mut(&client_id)
            .ok_or_else(|| RepoError::NotFound(format!("client {} not found", client_id)))?;
        let client = entry.value_mut();
        client.total_orders += 1;
        client.total_spent += order_total;
        client.last_order_at = Some(at);
        client.updated_at = now_millis();
        Ok(())
    }
}

impl Repository<Client, ClientCreate, ClientUpdate> for ClientRepository {
    /// All clients, most recently created first
    async fn find_all(&self) -> RepoResult<Vec<Client>> {
        let mut clients: Vec<Client> = self.db.clients.iter().map(|entry| entry.clone()).collect();
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(clients)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Client>> {
        Ok(self.db.clients.get(&id).map(|entry| entry.clone()))
    }

    async fn create(&self, data: ClientCreate) -> RepoResult<Client> {
        if data.first_name.trim().is_empty() && data.last_name.trim().is_empty() {
            return Err(RepoError::Validation("client name is required".to_string()));
        }
        if let Some(phone) = &data.phone
            && self.find_by_phone(phone).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "a client with phone {} already exists",
                phone
            )));
        }

        let now = now_millis();
        let client = Client {
            id: snowflake_id(),
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
            email: data.email,
            notes: data.notes,
            total_orders: 0,
            total_spent: 0.0,
            last_order_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.db.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn update(&self, id: i64, data: ClientUpdate) -> RepoResult<Client> {
        if let Some(phone) = &data.phone
            && let Some(existing) = self.find_by_phone(phone).await?
            && existing.id != id
        {
            return Err(RepoError::Duplicate(format!(
                "a client with phone {} already exists",
                phone
            )));
        }

        let mut entry = self
            .db
            .clients
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("client {} not found", id)))?;

        let client = entry.value_mut();
        if let Some(first_name) = data.first_name {
            client.first_name = first_name;
        }
        if let Some(last_name) = data.last_name {
            client.last_name = last_name;
        }
        if let Some(phone) = data.phone {
            client.phone = Some(phone);
        }
        if let Some(email) = data.email {
            client.email = Some(email);
        }
        if let Some(notes) = data.notes {
            client.notes = Some(notes);
        }
        if let Some(active) = data.is_active {
            client.is_active = active;
        }
        client.updated_at = now_millis();
        Ok(client.clone())
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.db.clients.remove(&id).is_some())
    }
}
