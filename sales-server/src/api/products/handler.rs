//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::util::{now_millis, snowflake_id};

/// Matches returned by a catalog search
const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

fn product_by_id(state: &ServerState, id: i64) -> AppResult<Product> {
    state.store().get::<Product>(id)?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ProductNotFound,
            format!("Product {} not found", id),
        )
    })
}

fn ensure_non_negative(price: Decimal) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::validation("price must not be negative"));
    }
    Ok(())
}

/// GET /api/products - full catalog
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.store().list::<Product>()?;
    Ok(Json(products))
}

/// GET /api/products/search?q=term - name search, first 10 matches
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.store().search_products(&query.q, SEARCH_LIMIT)?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    Ok(Json(product_by_id(&state, id)?))
}

/// POST /api/products - add a product to the catalog
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    ensure_non_negative(payload.price)?;

    let product = Product {
        id: snowflake_id(),
        name: payload.name,
        price: payload.price,
        stock: payload.stock,
        created_at: now_millis(),
    };
    state.store().put(&product)?;

    tracing::info!(product_id = product.id, name = %product.name, "product created");
    Ok(Json(product))
}

/// PUT /api/products/{id} - partial update, including stock overrides
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let mut product = product_by_id(&state, id)?;
    if let Some(name) = payload.name {
        product.name = name;
    }
    if let Some(price) = payload.price {
        ensure_non_negative(price)?;
        product.price = price;
    }
    if let Some(stock) = payload.stock {
        product.stock = stock;
    }
    state.store().put(&product)?;

    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let removed = state.store().remove::<Product>(id)?;
    if !removed {
        return Err(AppError::with_message(
            ErrorCode::ProductNotFound,
            format!("Product {} not found", id),
        ));
    }

    tracing::info!(product_id = id, "product deleted");
    Ok(Json(true))
}
