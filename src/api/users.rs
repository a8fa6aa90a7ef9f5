// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin user surface. Every route here is matrix-guarded to ADMIN.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{error::ApiError, models::UserResponse, state::AppState};

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses((status = 200, body = [UserResponse]))
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let store = state.store.read().await;
    let users = store
        .list_accounts()
        .iter()
        .map(UserResponse::from)
        .collect();
    Json(users)
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    responses((status = 200, body = UserResponse), (status = 404))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let store = state.store.read().await;
    let account = store
        .find_by_id(id)
        .ok_or_else(|| ApiError::not_found(format!("User not found with id: {id}")))?;
    Ok(Json(UserResponse::from(&account)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    responses((status = 204), (status = 404))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store
        .delete_account(id)
        .map_err(|e| ApiError::not_found(e.to_string()))?;

    tracing::warn!(user = %id, "user deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}
