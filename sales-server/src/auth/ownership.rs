//! Ownership checks
//!
//! Clients and orders belong to the seller who created them. Every
//! handler and manager that gates access on ownership goes through
//! these two functions, so the rule is written exactly once.

use shared::error::{AppError, AppResult};

/// Whether the acting seller owns a resource
pub fn is_owner(owner_id: i64, acting_seller_id: i64) -> bool {
    owner_id == acting_seller_id
}

/// Enforce ownership, failing with `PermissionDenied` otherwise
pub fn ensure_owner(owner_id: i64, acting_seller_id: i64) -> AppResult<()> {
    if is_owner(owner_id, acting_seller_id) {
        Ok(())
    } else {
        Err(AppError::permission_denied(
            "Resource belongs to another seller",
        ))
    }
}
