//! Order manager
//!
//! Validation order on every mutation follows the same ladder: resolve
//! the records first (`NotFound`), then check ownership
//! (`PermissionDenied`), then touch stock, and only persist once the
//! reservation succeeded. A failed reservation therefore never leaves a
//! half-written order behind.

use rust_decimal::Decimal;

use crate::auth::ownership::ensure_owner;
use crate::db::Store;
use crate::db::models::{Client, Order, OrderCreate, OrderStatus, OrderUpdate};
use crate::inventory::ReservationEngine;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::util::{now_millis, snowflake_id};

/// Coordinates order lifecycle against the store and the reservation
/// engine. Cheap to clone.
#[derive(Debug, Clone)]
pub struct OrderManager {
    store: Store,
    engine: ReservationEngine,
}

impl OrderManager {
    pub fn new(store: Store, engine: ReservationEngine) -> Self {
        Self { store, engine }
    }

    fn order_by_id(&self, id: i64) -> AppResult<Order> {
        self.store.get::<Order>(id)?.ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
        })
    }

    fn client_by_id(&self, id: i64) -> AppResult<Client> {
        self.store.get::<Client>(id)?.ok_or_else(|| {
            AppError::with_message(ErrorCode::ClientNotFound, format!("Client {} not found", id))
        })
    }

    /// Create an order for one of the acting seller's clients. Stock is
    /// reserved before the order is persisted; the returned total is
    /// computed from current prices.
    pub fn create(&self, acting_seller: i64, input: OrderCreate) -> AppResult<Order> {
        let client = self.client_by_id(input.client_id)?;
        ensure_owner(client.seller_id, acting_seller)?;

        let order_id = snowflake_id();
        let total = self.engine.reserve(order_id, &input.items)?;

        let order = Order {
            id: order_id,
            seller_id: acting_seller,
            client_id: client.id,
            items: input.items,
            total,
            status: input.status.unwrap_or_default(),
            created_at: now_millis(),
        };
        self.store.put(&order)?;

        tracing::info!(
            order_id = order.id,
            seller_id = acting_seller,
            client_id = client.id,
            total = %order.total,
            "order created"
        );
        Ok(order)
    }

    /// Re-point an order at a (possibly different) client and item list.
    /// The reservation is netted against what the order already holds,
    /// so unchanged lines move no stock.
    pub fn update(&self, acting_seller: i64, id: i64, input: OrderUpdate) -> AppResult<Order> {
        let order = self.order_by_id(id)?;
        let client = self.client_by_id(input.client_id)?;
        ensure_owner(order.seller_id, acting_seller)?;
        ensure_owner(client.seller_id, acting_seller)?;

        let (items, total) = match input.items {
            Some(new_items) => {
                let total = self.engine.reserve(order.id, &new_items)?;
                (new_items, total)
            }
            None => (order.items.clone(), order.total),
        };

        let updated = Order {
            id: order.id,
            seller_id: order.seller_id,
            client_id: client.id,
            items,
            total,
            status: input.status.unwrap_or(order.status),
            created_at: order.created_at,
        };
        self.store.put(&updated)?;

        tracing::info!(
            order_id = updated.id,
            seller_id = acting_seller,
            status = %updated.status,
            total = %updated.total,
            "order updated"
        );
        Ok(updated)
    }

    /// Delete an order. Its reservation ledger entries are dropped but
    /// stock is not returned; a delivered order's units are gone either
    /// way.
    pub fn delete(&self, acting_seller: i64, id: i64) -> AppResult<()> {
        let order = self.order_by_id(id)?;
        ensure_owner(order.seller_id, acting_seller)?;

        self.store.remove::<Order>(id)?;
        self.engine.clear_order(id)?;

        tracing::info!(order_id = id, seller_id = acting_seller, "order deleted");
        Ok(())
    }

    /// Fetch one order, owner only
    pub fn get(&self, acting_seller: i64, id: i64) -> AppResult<Order> {
        let order = self.order_by_id(id)?;
        ensure_owner(order.seller_id, acting_seller)?;
        Ok(order)
    }

    /// Every order in the system
    pub fn list_all(&self) -> AppResult<Vec<Order>> {
        Ok(self.store.list::<Order>()?)
    }

    /// Orders placed by one seller
    pub fn list_by_seller(&self, seller_id: i64) -> AppResult<Vec<Order>> {
        let orders = self.store.list::<Order>()?;
        Ok(orders
            .into_iter()
            .filter(|order| order.seller_id == seller_id)
            .collect())
    }

    /// Orders placed by one seller in a given status
    pub fn list_by_status(&self, seller_id: i64, status: OrderStatus) -> AppResult<Vec<Order>> {
        let orders = self.store.list::<Order>()?;
        Ok(orders
            .into_iter()
            .filter(|order| order.seller_id == seller_id && order.status == status)
            .collect())
    }

    /// Sum of completed order totals per client, used by statistics
    pub fn completed_totals_by_client(&self) -> AppResult<Vec<(i64, Decimal)>> {
        let orders = self.store.list::<Order>()?;
        Ok(orders
            .into_iter()
            .filter(|order| order.status == OrderStatus::Completed)
            .map(|order| (order.client_id, order.total))
            .collect())
    }

    /// Sum of completed order totals per seller, used by statistics
    pub fn completed_totals_by_seller(&self) -> AppResult<Vec<(i64, Decimal)>> {
        let orders = self.store.list::<Order>()?;
        Ok(orders
            .into_iter()
            .filter(|order| order.status == OrderStatus::Completed)
            .map(|order| (order.seller_id, order.total))
            .collect())
    }
}
