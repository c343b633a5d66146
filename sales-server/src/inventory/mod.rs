//! Inventory Reservation
//!
//! Stock consistency for orders. Every order holds its reserved stock in
//! a ledger table; creating or editing an order nets the request against
//! what the order already holds, so re-submitting the same items never
//! decrements stock twice.

mod engine;

pub use engine::{ReservationEngine, ReservationError, ReservationPolicy};
