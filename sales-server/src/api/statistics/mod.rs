//! Statistics API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Statistics router - public leaderboards over completed orders
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/statistics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/top-clients", get(handler::top_clients))
        .route("/top-sellers", get(handler::top_sellers))
}
