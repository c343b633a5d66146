//! Order management
//!
//! [`OrderManager`] ties the pieces of order fulfillment together:
//! client resolution, ownership checks, stock reservation through the
//! inventory engine, and persistence. Handlers stay thin; every rule
//! about who may do what to an order lives here.

mod manager;

pub use manager::OrderManager;
