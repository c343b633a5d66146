use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::inventory::ReservationPolicy;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DATA_DIR | ./data | Database and working files |
/// | HTTP_HOST | 0.0.0.0 | Listen address |
/// | HTTP_PORT | 4000 | HTTP API port |
/// | JWT_SECRET | (dev key) | Token signing secret |
/// | JWT_EXPIRATION_HOURS | 24 | Token lifetime |
/// | RESERVATION_POLICY | sequential | `sequential` or `atomic` order fulfillment |
/// | ENVIRONMENT | development | development \| staging \| production |
///
/// # Example
///
/// ```ignore
/// DATA_DIR=/var/lib/sales HTTP_PORT=8080 RESERVATION_POLICY=atomic cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database
    pub data_dir: String,
    /// Listen address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// How multi-line orders behave when one line cannot be filled
    pub reservation_policy: ReservationPolicy,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt: JwtConfig::default(),
            reservation_policy: std::env::var("RESERVATION_POLICY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the parts tests care about
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    /// Database file location under the data directory
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("sales.redb")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
