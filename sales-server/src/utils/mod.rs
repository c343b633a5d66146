//! Utility module
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResult`] - application error types (from `shared::error`)
//! - [`ApiResponse`] - API response envelope (from `shared::error`)
//! - [`logger`] - logging setup

pub mod logger;

// Re-export the unified error vocabulary from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
