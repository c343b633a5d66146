//! Client API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::{AuthContext, ownership::ensure_owner};
use crate::core::ServerState;
use crate::db::StoreError;
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::util::{now_millis, snowflake_id};

fn client_by_id(state: &ServerState, id: i64) -> AppResult<Client> {
    state.store().get::<Client>(id)?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ClientNotFound, format!("Client {} not found", id))
    })
}

fn duplicate_email_error(err: StoreError) -> AppError {
    match err {
        StoreError::DuplicateEmail(email) => AppError::with_message(
            ErrorCode::ClientEmailExists,
            format!("A client with email {} already exists", email),
        ),
        other => other.into(),
    }
}

/// GET /api/clients - every client in the system
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Client>>> {
    let clients = state.store().list::<Client>()?;
    Ok(Json(clients))
}

/// GET /api/clients/mine - clients owned by the acting seller
pub async fn list_mine(
    State(state): State<ServerState>,
    context: AuthContext,
) -> AppResult<Json<Vec<Client>>> {
    let seller_id = context.seller_id()?;
    let clients: Vec<Client> = state
        .store()
        .list::<Client>()?
        .into_iter()
        .filter(|client| client.seller_id == seller_id)
        .collect();
    Ok(Json(clients))
}

/// GET /api/clients/{id} - owner only
pub async fn get_by_id(
    State(state): State<ServerState>,
    context: AuthContext,
    Path(id): Path<i64>,
) -> AppResult<Json<Client>> {
    let seller_id = context.seller_id()?;
    let client = client_by_id(&state, id)?;
    ensure_owner(client.seller_id, seller_id)?;
    Ok(Json(client))
}

/// POST /api/clients - register a client under the acting seller
pub async fn create(
    State(state): State<ServerState>,
    context: AuthContext,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    let seller_id = context.seller_id()?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let client = Client {
        id: snowflake_id(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        company: payload.company,
        email: payload.email,
        phone: payload.phone,
        seller_id,
        created_at: now_millis(),
    };
    state
        .store()
        .insert_client(&client)
        .map_err(duplicate_email_error)?;

    tracing::info!(client_id = client.id, seller_id, "client registered");
    Ok(Json(client))
}

/// PUT /api/clients/{id} - partial update, owner only
pub async fn update(
    State(state): State<ServerState>,
    context: AuthContext,
    Path(id): Path<i64>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<Client>> {
    let seller_id = context.seller_id()?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let mut client = client_by_id(&state, id)?;
    ensure_owner(client.seller_id, seller_id)?;

    let old_email = client.email.clone();
    if let Some(first_name) = payload.first_name {
        client.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        client.last_name = last_name;
    }
    if let Some(company) = payload.company {
        client.company = company;
    }
    if let Some(email) = payload.email {
        client.email = email;
    }
    if let Some(phone) = payload.phone {
        client.phone = Some(phone);
    }

    state
        .store()
        .update_client(&old_email, &client)
        .map_err(duplicate_email_error)?;

    Ok(Json(client))
}

/// DELETE /api/clients/{id} - owner only
pub async fn delete(
    State(state): State<ServerState>,
    context: AuthContext,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let seller_id = context.seller_id()?;
    let client = client_by_id(&state, id)?;
    ensure_owner(client.seller_id, seller_id)?;

    state.store().delete_client(&client)?;

    tracing::info!(client_id = id, "client deleted");
    Ok(Json(true))
}
