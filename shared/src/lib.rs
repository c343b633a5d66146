//! Shared types for the sales server
//!
//! Common pieces used across the workspace: the unified error system
//! (codes, categories, response envelope) and small utilities for ID and
//! timestamp generation.

pub mod error;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
