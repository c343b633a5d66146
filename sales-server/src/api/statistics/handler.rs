//! Statistics API Handlers
//!
//! Leaderboards are computed over completed orders only. Ties are broken
//! by ID ascending so the ordering is stable across runs.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::core::ServerState;
use crate::db::models::{Client, User, UserInfo};
use crate::utils::AppResult;

/// How many clients the client leaderboard returns
const TOP_CLIENTS_LIMIT: usize = 10;

/// How many sellers the seller leaderboard returns
const TOP_SELLERS_LIMIT: usize = 3;

/// One client leaderboard row
#[derive(Debug, Serialize)]
pub struct TopClientEntry {
    pub client: Client,
    pub total: Decimal,
}

/// One seller leaderboard row
#[derive(Debug, Serialize)]
pub struct TopSellerEntry {
    pub seller: UserInfo,
    pub total: Decimal,
}

/// Sum totals per ID, rank descending, break ties by ID ascending, and
/// cut at `limit`
fn rank_totals(entries: Vec<(i64, Decimal)>, limit: usize) -> Vec<(i64, Decimal)> {
    let mut sums: HashMap<i64, Decimal> = HashMap::new();
    for (id, total) in entries {
        *sums.entry(id).or_insert(Decimal::ZERO) += total;
    }

    let mut ranked: Vec<(i64, Decimal)> = sums.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// GET /api/statistics/top-clients - ten biggest clients by completed
/// order volume
pub async fn top_clients(State(state): State<ServerState>) -> AppResult<Json<Vec<TopClientEntry>>> {
    let totals = state.orders().completed_totals_by_client()?;
    let ranked = rank_totals(totals, TOP_CLIENTS_LIMIT);

    let mut entries = Vec::with_capacity(ranked.len());
    for (client_id, total) in ranked {
        match state.store().get::<Client>(client_id)? {
            Some(client) => entries.push(TopClientEntry { client, total }),
            None => {
                // orders can outlive their client; skip the dangling row
                tracing::debug!(client_id, "skipping deleted client in leaderboard");
            }
        }
    }
    Ok(Json(entries))
}

/// GET /api/statistics/top-sellers - three biggest sellers by completed
/// order volume
pub async fn top_sellers(State(state): State<ServerState>) -> AppResult<Json<Vec<TopSellerEntry>>> {
    let totals = state.orders().completed_totals_by_seller()?;
    let ranked = rank_totals(totals, TOP_SELLERS_LIMIT);

    let mut entries = Vec::with_capacity(ranked.len());
    for (seller_id, total) in ranked {
        match state.store().get::<User>(seller_id)? {
            Some(user) => entries.push(TopSellerEntry {
                seller: user.into(),
                total,
            }),
            None => {
                tracing::debug!(seller_id, "skipping deleted seller in leaderboard");
            }
        }
    }
    Ok(Json(entries))
}
