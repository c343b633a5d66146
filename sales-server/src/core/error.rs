//! Startup and lifecycle errors
//!
//! Request handlers use `shared::error::AppError`; this type covers what
//! can go wrong before a request ever arrives - opening the database,
//! creating directories, binding the listener.

use thiserror::Error;

use crate::db::StoreError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
