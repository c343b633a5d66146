//! Sales Server - sales management backend
//!
//! # Architecture Overview
//!
//! This crate is the main entry point of the sales server, providing:
//!
//! - **Authentication** (`auth`): JWT + Argon2 seller accounts
//! - **Database** (`db`): embedded redb storage with email indexes
//! - **Inventory** (`inventory`): stock reservation engine backing orders
//! - **Orders** (`orders`): order lifecycle with ownership checks
//! - **HTTP API** (`api`): RESTful JSON endpoints
//!
//! # Module Structure
//!
//! ```text
//! sales-server/src/
//! ├── core/       # configuration, state, errors, HTTP server
//! ├── auth/       # JWT authentication, ownership checks
//! ├── db/         # storage layer and domain models
//! ├── inventory/  # stock reservation engine
//! ├── orders/     # order lifecycle management
//! ├── api/        # HTTP routes and handlers
//! └── utils/      # logging, shared error re-exports
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod orders;
pub mod utils;

// Re-export public types
pub use auth::{AuthContext, Claims, JwtConfig, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::{Store, StoreError};
pub use inventory::{ReservationEngine, ReservationError, ReservationPolicy};
pub use orders::OrderManager;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, log directory, logging
pub fn setup_environment() -> std::io::Result<()> {
    // Load .env before anything reads configuration
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();

    if let Some(dir) = log_dir.as_deref() {
        std::fs::create_dir_all(dir)?;
    }

    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____       __
  / ___/____ _/ /__  _____
  \__ \/ __ `/ / _ \/ ___/
 ___/ / /_/ / /  __(__  )
/____/\__,_/_/\___/____/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
