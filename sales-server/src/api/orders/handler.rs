//! Order API Handlers
//!
//! Thin wrappers around [`crate::orders::OrderManager`], which owns the
//! validation ladder and the stock reservation.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::AuthContext;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus, OrderUpdate};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/orders - every order in the system
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders().list_all()?))
}

/// GET /api/orders/mine - orders placed by the acting seller
pub async fn list_mine(
    State(state): State<ServerState>,
    context: AuthContext,
) -> AppResult<Json<Vec<Order>>> {
    let seller_id = context.seller_id()?;
    Ok(Json(state.orders().list_by_seller(seller_id)?))
}

/// GET /api/orders/status/{status} - the acting seller's orders in one status
pub async fn list_by_status(
    State(state): State<ServerState>,
    context: AuthContext,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    let seller_id = context.seller_id()?;
    let status: OrderStatus = status.parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidOrderStatus,
            format!("Unknown order status: {}", status),
        )
    })?;
    Ok(Json(state.orders().list_by_status(seller_id, status)?))
}

/// GET /api/orders/{id} - owner only
pub async fn get_by_id(
    State(state): State<ServerState>,
    context: AuthContext,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let seller_id = context.seller_id()?;
    Ok(Json(state.orders().get(seller_id, id)?))
}

/// POST /api/orders - place an order for one of the seller's clients
pub async fn create(
    State(state): State<ServerState>,
    context: AuthContext,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let seller_id = context.seller_id()?;
    Ok(Json(state.orders().create(seller_id, payload)?))
}

/// PUT /api/orders/{id} - owner only
pub async fn update(
    State(state): State<ServerState>,
    context: AuthContext,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let seller_id = context.seller_id()?;
    Ok(Json(state.orders().update(seller_id, id, payload)?))
}

/// DELETE /api/orders/{id} - owner only
pub async fn delete(
    State(state): State<ServerState>,
    context: AuthContext,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let seller_id = context.seller_id()?;
    state.orders().delete(seller_id, id)?;
    Ok(Json(true))
}
