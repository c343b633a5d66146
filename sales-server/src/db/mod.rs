//! Database Layer
//!
//! Embedded redb storage for the sales domain. Entities are stored as
//! JSON values keyed by snowflake ID, with secondary tables for email
//! uniqueness and per-order stock reservations.

pub mod models;
pub mod store;

pub use store::{Store, StoreError, StoreResult};
