//! Shared application state
//!
//! One [`ServerState`] is built at startup and cloned into every
//! handler. All members are cheap to clone and share the same
//! underlying database.

use std::sync::Arc;

use anyhow::Context;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::Store;
use crate::inventory::ReservationEngine;
use crate::orders::OrderManager;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    store: Store,
    engine: ReservationEngine,
    orders: OrderManager,
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Open the database under the configured data directory and wire
    /// up the services
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("failed to create data directory {}", config.data_dir))?;

        let store = Store::open(config.db_path())?;
        tracing::info!(path = %config.db_path().display(), "database opened");

        Self::with_store(config, store)
    }

    /// State backed by an in-memory database, for tests
    pub fn in_memory(config: &Config) -> Result<Self> {
        let store = Store::open_in_memory()?;
        Self::with_store(config, store)
    }

    fn with_store(config: &Config, store: Store) -> Result<Self> {
        let engine = ReservationEngine::new(&store, config.reservation_policy);
        let orders = OrderManager::new(store.clone(), engine.clone());
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            store,
            engine,
            orders,
            jwt_service,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn engine(&self) -> &ReservationEngine {
        &self.engine
    }

    pub fn orders(&self) -> &OrderManager {
        &self.orders
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        Arc::clone(&self.jwt_service)
    }
}
