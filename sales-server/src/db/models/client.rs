//! Client Model
//!
//! A client belongs to exactly one seller. Only the owning seller may
//! read or modify it.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Client record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Owning seller (user ID)
    pub seller_id: i64,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
}

/// Create client payload. The owner is taken from the authenticated
/// caller, never from the body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientCreate {
    #[validate(length(min = 1, message = "first name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name must not be empty"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "company must not be empty"))]
    pub company: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    pub phone: Option<String>,
}

/// Update client payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}
