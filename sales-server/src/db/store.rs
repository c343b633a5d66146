//! Sales storage - redb-based persistence for the sales domain
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `users` | `user_id` | `User` | Seller accounts |
//! | `products` | `product_id` | `Product` | Catalog with stock |
//! | `clients` | `client_id` | `Client` | Clients, owned by sellers |
//! | `orders` | `order_id` | `Order` | Orders with computed totals |
//! | `reservations` | `(order_id, product_id)` | `u32` | Stock held per order |
//! | `user_emails` | `email` | `user_id` | Uniqueness index |
//! | `client_emails` | `email` | `client_id` | Uniqueness index |
//!
//! Entity values are JSON-serialized. Email uniqueness is enforced inside
//! the same write transaction as the insert, so two concurrent signups
//! with the same address cannot both succeed. The reservation table is
//! written by `inventory::ReservationEngine` in the same transaction as
//! the stock it moves.

use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::AppError;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::models::{Client, Order, Product, User};

/// Sellers, keyed by user ID
pub(crate) const USERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("users");

/// Catalog, keyed by product ID
pub(crate) const PRODUCTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("products");

/// Clients, keyed by client ID
pub(crate) const CLIENTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("clients");

/// Orders, keyed by order ID
pub(crate) const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Stock held per order: (order_id, product_id) -> reserved quantity
pub(crate) const RESERVATIONS_TABLE: TableDefinition<(i64, i64), u32> =
    TableDefinition::new("reservations");

/// Email uniqueness index for users: email -> user ID
pub(crate) const USER_EMAILS_TABLE: TableDefinition<&str, i64> =
    TableDefinition::new("user_emails");

/// Email uniqueness index for clients: email -> client ID
pub(crate) const CLIENT_EMAILS_TABLE: TableDefinition<&str, i64> =
    TableDefinition::new("client_emails");

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => {
                AppError::already_exists(format!("Email {}", email))
            }
            other => AppError::database(other.to_string()),
        }
    }
}

/// An entity stored in its own primary table, keyed by snowflake ID
pub trait Entity: Serialize + DeserializeOwned {
    /// Primary table for this entity type
    const TABLE: TableDefinition<'static, i64, &'static [u8]>;

    fn id(&self) -> i64;
}

impl Entity for User {
    const TABLE: TableDefinition<'static, i64, &'static [u8]> = USERS_TABLE;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Product {
    const TABLE: TableDefinition<'static, i64, &'static [u8]> = PRODUCTS_TABLE;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Client {
    const TABLE: TableDefinition<'static, i64, &'static [u8]> = CLIENTS_TABLE;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Order {
    const TABLE: TableDefinition<'static, i64, &'static [u8]> = ORDERS_TABLE;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Persistent store, cheap to clone and share across handlers
#[derive(Debug, Clone)]
pub struct Store {
    pub(crate) db: Arc<Database>,
}

impl Store {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// In-memory store for tests and ephemeral runs
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Create all tables so later read transactions never miss one
    fn init_tables(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            write_txn.open_table(USERS_TABLE)?;
            write_txn.open_table(PRODUCTS_TABLE)?;
            write_txn.open_table(CLIENTS_TABLE)?;
            write_txn.open_table(ORDERS_TABLE)?;
            write_txn.open_table(RESERVATIONS_TABLE)?;
            write_txn.open_table(USER_EMAILS_TABLE)?;
            write_txn.open_table(CLIENT_EMAILS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub(crate) fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    /// Cheap liveness probe for health checks
    pub fn ping(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS_TABLE)?;
        Ok(table.len()?)
    }

    /// Fetch one entity by ID
    pub fn get<E: Entity>(&self, id: i64) -> StoreResult<Option<E>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(E::TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All entities of one type, ascending by ID (i.e. creation order)
    pub fn list<E: Entity>(&self) -> StoreResult<Vec<E>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(E::TABLE)?;

        let mut entities = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            entities.push(serde_json::from_slice(value.value())?);
        }
        Ok(entities)
    }

    /// Insert or overwrite one entity
    pub fn put<E: Entity>(&self, entity: &E) -> StoreResult<()> {
        let bytes = serde_json::to_vec(entity)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(E::TABLE)?;
            table.insert(entity.id(), bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove one entity; returns whether it existed
    pub fn remove<E: Entity>(&self, id: i64) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(E::TABLE)?;
            table.remove(id)?.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Insert a user, enforcing email uniqueness in the same transaction
    pub fn insert_user(&self, user: &User) -> StoreResult<()> {
        let bytes = serde_json::to_vec(user)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut emails = write_txn.open_table(USER_EMAILS_TABLE)?;
            if emails.get(user.email.as_str())?.is_some() {
                return Err(StoreError::DuplicateEmail(user.email.clone()));
            }
            emails.insert(user.email.as_str(), user.id)?;

            let mut users = write_txn.open_table(USERS_TABLE)?;
            users.insert(user.id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a user by email via the uniqueness index
    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS_TABLE)?;
        let user_id = match emails.get(email)? {
            Some(value) => value.value(),
            None => return Ok(None),
        };

        let users = read_txn.open_table(USERS_TABLE)?;
        match users.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Insert a client, enforcing email uniqueness in the same transaction
    pub fn insert_client(&self, client: &Client) -> StoreResult<()> {
        let bytes = serde_json::to_vec(client)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut emails = write_txn.open_table(CLIENT_EMAILS_TABLE)?;
            if emails.get(client.email.as_str())?.is_some() {
                return Err(StoreError::DuplicateEmail(client.email.clone()));
            }
            emails.insert(client.email.as_str(), client.id)?;

            let mut clients = write_txn.open_table(CLIENTS_TABLE)?;
            clients.insert(client.id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Persist a modified client, moving its email index entry when the
    /// address changed
    pub fn update_client(&self, old_email: &str, client: &Client) -> StoreResult<()> {
        let bytes = serde_json::to_vec(client)?;
        let write_txn = self.db.begin_write()?;
        {
            if old_email != client.email {
                let mut emails = write_txn.open_table(CLIENT_EMAILS_TABLE)?;
                let taken = match emails.get(client.email.as_str())? {
                    Some(value) => value.value() != client.id,
                    None => false,
                };
                if taken {
                    return Err(StoreError::DuplicateEmail(client.email.clone()));
                }
                emails.remove(old_email)?;
                emails.insert(client.email.as_str(), client.id)?;
            }

            let mut clients = write_txn.open_table(CLIENTS_TABLE)?;
            clients.insert(client.id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove a client and its email index entry
    pub fn delete_client(&self, client: &Client) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut emails = write_txn.open_table(CLIENT_EMAILS_TABLE)?;
            emails.remove(client.email.as_str())?;

            let mut clients = write_txn.open_table(CLIENTS_TABLE)?;
            clients.remove(client.id)?.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Case-insensitive substring search over product names, first
    /// `limit` matches in ID order
    pub fn search_products(&self, term: &str, limit: usize) -> StoreResult<Vec<Product>> {
        let needle = term.to_lowercase();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;

        let mut matches = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let product: Product = serde_json::from_slice(value.value())?;
            if product.name.to_lowercase().contains(&needle) {
                matches.push(product);
                if matches.len() >= limit {
                    break;
                }
            }
        }
        Ok(matches)
    }
}
