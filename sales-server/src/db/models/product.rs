//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog product with available stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit price
    pub price: Decimal,
    /// Units currently available for reservation
    pub stock: u32,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "product name must not be empty"))]
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
}

/// Update product payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, message = "product name must not be empty"))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    /// Direct stock override, e.g. after restocking
    pub stock: Option<u32>,
}
