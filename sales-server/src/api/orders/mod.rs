//! Order API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Order router. Listing everything is public; single-record reads and
/// all mutations go through the owning seller.
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/mine", get(handler::list_mine))
        .route("/status/{status}", get(handler::list_by_status))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
