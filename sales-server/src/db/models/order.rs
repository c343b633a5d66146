//! Order Model
//!
//! An order is a list of line items placed by a seller on behalf of one
//! of their clients. The total is computed server-side from current
//! product prices when stock is reserved, never taken from the request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Completed => write!(f, "COMPLETED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// One product line within an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    pub quantity: u32,
}

/// Order record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Seller who placed the order
    pub seller_id: i64,
    pub client_id: i64,
    pub items: Vec<LineItem>,
    /// Sum of unit price times quantity over `items`
    pub total: Decimal,
    pub status: OrderStatus,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub client_id: i64,
    pub items: Vec<LineItem>,
    /// Defaults to `PENDING` when omitted
    pub status: Option<OrderStatus>,
}

/// Update order payload. `client_id` is required so ownership of the
/// target client is always re-checked; `items` omitted leaves the
/// reservation untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderUpdate {
    pub client_id: i64,
    pub items: Option<Vec<LineItem>>,
    pub status: Option<OrderStatus>,
}
