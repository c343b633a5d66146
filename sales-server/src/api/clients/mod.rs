//! Client API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Client router. Listing everything is public; single-record reads and
/// all mutations are restricted to the owning seller.
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clients", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/mine", get(handler::list_mine))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
