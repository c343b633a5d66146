//! Reservation engine
//!
//! Each order's claim on stock lives in the reservation table keyed by
//! `(order_id, product_id)`. Applying an item list computes, per product,
//! the delta between the requested quantity and the quantity the order
//! already holds, and check-and-decrements stock inside a single write
//! transaction. Products the order held before but no longer lists get
//! their units returned to stock.
//!
//! Two policies control failure behavior. `Sequential` commits each line
//! on its own and stops at the first failure, leaving earlier lines
//! applied. `Atomic` runs the whole list in one transaction, so a failed
//! line undoes everything.

use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::db::Store;
use crate::db::models::{LineItem, Product};
use crate::db::store::{PRODUCTS_TABLE, RESERVATIONS_TABLE};

/// How a multi-line reservation behaves when one line fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationPolicy {
    /// Commit line by line, stop at the first failure. Earlier lines
    /// keep their stock.
    #[default]
    Sequential,
    /// All lines in one transaction; a failure applies nothing.
    Atomic,
}

impl FromStr for ReservationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(ReservationPolicy::Sequential),
            "atomic" => Ok(ReservationPolicy::Atomic),
            other => Err(format!("unknown reservation policy: {}", other)),
        }
    }
}

/// Reservation errors
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Product {0} not found")]
    ProductNotFound(i64),

    #[error("Insufficient stock for {name}")]
    InsufficientStock {
        name: String,
        requested: u32,
        available: u32,
    },

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
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::ProductNotFound(id) => AppError::with_message(
                shared::error::ErrorCode::ProductNotFound,
                format!("Product {} not found", id),
            ),
            ReservationError::InsufficientStock {
                name,
                requested,
                available,
            } => AppError::insufficient_stock(&name)
                .with_detail("requested", requested)
                .with_detail("available", available),
            other => AppError::database(other.to_string()),
        }
    }
}

/// Nets order item lists against stock. Cheap to clone; all clones share
/// the same database.
#[derive(Debug, Clone)]
pub struct ReservationEngine {
    db: Arc<redb::Database>,
    policy: ReservationPolicy,
}

impl ReservationEngine {
    pub fn new(store: &Store, policy: ReservationPolicy) -> Self {
        Self {
            db: store.database(),
            policy,
        }
    }

    pub fn policy(&self) -> ReservationPolicy {
        self.policy
    }

    /// Reserve stock so the order holds exactly `items`, netting against
    /// what it already holds. Returns the order total, summed from
    /// current unit prices.
    pub fn reserve(&self, order_id: i64, items: &[LineItem]) -> Result<Decimal, ReservationError> {
        match self.policy {
            ReservationPolicy::Sequential => self.reserve_sequential(order_id, items),
            ReservationPolicy::Atomic => self.reserve_atomic(order_id, items),
        }
    }

    fn reserve_sequential(
        &self,
        order_id: i64,
        items: &[LineItem],
    ) -> Result<Decimal, ReservationError> {
        // Keyed by product so a duplicated line replaces its earlier
        // subtotal, matching how the ledger nets it
        let mut totals: HashMap<i64, Decimal> = HashMap::new();
        for item in items {
            let txn = self.db.begin_write()?;
            let line_total = Self::apply_item(&txn, order_id, item)?;
            txn.commit()?;
            totals.insert(item.product_id, line_total);
        }

        // Only reached when every line applied; a mid-list failure keeps
        // the stale reservations as the persisted record of the gap.
        let txn = self.db.begin_write()?;
        Self::release_dropped(&txn, order_id, items)?;
        txn.commit()?;

        Ok(totals.into_values().sum())
    }

    fn reserve_atomic(
        &self,
        order_id: i64,
        items: &[LineItem],
    ) -> Result<Decimal, ReservationError> {
        let txn = self.db.begin_write()?;
        let mut totals: HashMap<i64, Decimal> = HashMap::new();
        for item in items {
            let line_total = Self::apply_item(&txn, order_id, item)?;
            totals.insert(item.product_id, line_total);
        }
        Self::release_dropped(&txn, order_id, items)?;
        txn.commit()?;
        Ok(totals.into_values().sum())
    }

    /// Check-and-decrement one line inside `txn`. Returns the line
    /// subtotal at the product's current price.
    fn apply_item(
        txn: &WriteTransaction,
        order_id: i64,
        item: &LineItem,
    ) -> Result<Decimal, ReservationError> {
        let mut products = txn.open_table(PRODUCTS_TABLE)?;
        let mut reservations = txn.open_table(RESERVATIONS_TABLE)?;

        let mut product: Product = match products.get(item.product_id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(ReservationError::ProductNotFound(item.product_id)),
        };

        let held = reservations
            .get((order_id, item.product_id))?
            .map(|v| v.value())
            .unwrap_or(0);

        if item.quantity > held {
            let delta = item.quantity - held;
            if delta > product.stock {
                return Err(ReservationError::InsufficientStock {
                    name: product.name,
                    requested: item.quantity,
                    available: product.stock.saturating_add(held),
                });
            }
            product.stock -= delta;
        } else {
            product.stock = product.stock.saturating_add(held - item.quantity);
        }

        let bytes = serde_json::to_vec(&product)?;
        products.insert(item.product_id, bytes.as_slice())?;
        reservations.insert((order_id, item.product_id), item.quantity)?;

        Ok(product.price * Decimal::from(item.quantity))
    }

    /// Return stock for products the order held but no longer lists,
    /// and drop their ledger entries.
    fn release_dropped(
        txn: &WriteTransaction,
        order_id: i64,
        items: &[LineItem],
    ) -> Result<(), ReservationError> {
        let kept: HashSet<i64> = items.iter().map(|item| item.product_id).collect();

        let mut products = txn.open_table(PRODUCTS_TABLE)?;
        let mut reservations = txn.open_table(RESERVATIONS_TABLE)?;

        let range_start = (order_id, i64::MIN);
        let range_end = (order_id, i64::MAX);
        let mut dropped: Vec<(i64, u32)> = Vec::new();
        for result in reservations.range(range_start..=range_end)? {
            let (key, value) = result?;
            let (_, product_id) = key.value();
            if !kept.contains(&product_id) {
                dropped.push((product_id, value.value()));
            }
        }

        for (product_id, held) in dropped {
            let stored: Option<Product> = match products.get(product_id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            if let Some(mut product) = stored {
                product.stock = product.stock.saturating_add(held);
                let bytes = serde_json::to_vec(&product)?;
                products.insert(product_id, bytes.as_slice())?;
            }
            reservations.remove((order_id, product_id))?;
        }

        Ok(())
    }

    /// Drop an order's ledger entries without touching stock. Deleting
    /// an order does not return its units to inventory.
    pub fn clear_order(&self, order_id: i64) -> Result<(), ReservationError> {
        let txn = self.db.begin_write()?;
        {
            let mut reservations = txn.open_table(RESERVATIONS_TABLE)?;

            let range_start = (order_id, i64::MIN);
            let range_end = (order_id, i64::MAX);
            let mut keys: Vec<i64> = Vec::new();
            for result in reservations.range(range_start..=range_end)? {
                let (key, _value) = result?;
                keys.push(key.value().1);
            }

            for product_id in keys {
                reservations.remove((order_id, product_id))?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Quantity the order currently holds for one product
    pub fn reserved(&self, order_id: i64, product_id: i64) -> Result<Option<u32>, ReservationError> {
        let read_txn = self.db.begin_read()?;
        let reservations = read_txn.open_table(RESERVATIONS_TABLE)?;
        Ok(reservations.get((order_id, product_id))?.map(|v| v.value()))
    }
}
