//! HTTP API
//!
//! One module per resource, each exposing a `router()`. Route assembly
//! and middleware live in `core::server`.

pub mod auth;
pub mod clients;
pub mod health;
pub mod orders;
pub mod products;
pub mod statistics;
