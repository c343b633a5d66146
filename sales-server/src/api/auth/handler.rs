//! Authentication Handlers
//!
//! Seller registration, login, and token introspection

use std::time::Duration;

use axum::{Json, extract::State};
use serde::Serialize;
use validator::Validate;

use crate::auth::AuthContext;
use crate::core::ServerState;
use crate::db::StoreError;
use crate::db::models::{User, UserInfo, UserLogin, UserRegister};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::util::{now_millis, snowflake_id};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Successful login payload
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/register - create a seller account
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserRegister>,
) -> AppResult<Json<UserInfo>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let password_hash = User::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let user = User {
        id: snowflake_id(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash,
        created_at: now_millis(),
    };

    state.store().insert_user(&user).map_err(|e| match e {
        StoreError::DuplicateEmail(email) => AppError::with_message(
            ErrorCode::UserEmailExists,
            format!("A user with email {} already exists", email),
        ),
        other => other.into(),
    })?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(Json(UserInfo::from(user)))
}

/// POST /api/auth/login - authenticate and issue a token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<UserLogin>,
) -> AppResult<Json<LoginResponse>> {
    let user = state.store().find_user_by_email(&req.email)?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(user) => {
            let password_valid = user
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            user
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(user_id = user.id, "login succeeded");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me - the seller behind the presented token
pub async fn me(State(state): State<ServerState>, context: AuthContext) -> AppResult<Json<UserInfo>> {
    let claims = context.current()?;

    let user = state
        .store()
        .get::<User>(claims.sub)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(user.into()))
}
