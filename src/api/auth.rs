// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints: registration, login, token refresh and the
//! current-profile lookup.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::{
    auth::{Auth, Role, TokenKind},
    error::ApiError,
    models::{
        Account, AuthResponse, Company, LoginRequest, RegisterRequest, Student, Teacher,
        UserResponse,
    },
    state::AppState,
};

fn issue_pair(state: &AppState, account: &Account) -> Result<AuthResponse, ApiError> {
    let access_token = state
        .tokens
        .issue(&account.email, &account.roles, TokenKind::Access)
        .map_err(|_| ApiError::internal("Failed to issue access token"))?;
    let refresh_token = state
        .tokens
        .issue(&account.email, &[], TokenKind::Refresh)
        .map_err(|_| ApiError::internal("Failed to issue refresh token"))?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: UserResponse::from(account),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Authentication",
    responses(
        (status = 201, body = AuthResponse),
        (status = 400, description = "Email already in use"),
        (status = 422, description = "Invalid email or password")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(ApiError::unprocessable("A valid email address is required"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::unprocessable(
            "Password must be at least 8 characters long",
        ));
    }

    // Unknown role names are ignored; an empty result falls back to USER.
    let mut roles: Vec<Role> = request
        .roles
        .iter()
        .filter_map(|name| Role::parse(name))
        .collect();
    roles.dedup();
    if roles.is_empty() {
        roles.push(Role::User);
    }

    let password_hash = state
        .passwords
        .hash(&request.password)
        .map_err(|_| ApiError::internal("Failed to hash password"))?;

    let account = Account {
        id: Uuid::new_v4(),
        email: request.email.trim().to_string(),
        first_name: request.first_name,
        last_name: request.last_name,
        telephone: request.telephone,
        password_hash,
        roles,
    };

    let mut store = state.store.write().await;
    store
        .insert_account(account.clone())
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    // Ownership checks need a profile row per granted role.
    for role in &account.roles {
        match role {
            Role::Student => store.upsert_student(Student {
                user_id: account.id,
                student_code: None,
                level: None,
            }),
            Role::Teacher => store.upsert_teacher(Teacher {
                user_id: account.id,
                department: None,
                grade: None,
                specialty: None,
            }),
            Role::Company => store.upsert_company(Company {
                user_id: account.id,
                name: None,
                address: None,
                website: None,
                phone: None,
                professional_email: None,
            }),
            Role::Admin | Role::User => {}
        }
    }
    drop(store);

    tracing::info!(email = %account.email, roles = ?account.roles, "account registered");
    Ok((StatusCode::CREATED, Json(issue_pair(&state, &account)?)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    tag = "Authentication",
    responses(
        (status = 200, body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let account = {
        let store = state.store.read().await;
        store.find_by_email(&request.email)
    };

    // Same answer for an unknown email and a wrong password.
    let account = account.ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;
    if !state.passwords.verify(&request.password, &account.password_hash) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    Ok(Json(issue_pair(&state, &account)?))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    tag = "Authentication",
    responses(
        (status = 200, body = AuthResponse),
        (status = 400, description = "Missing or malformed Authorization header"),
        (status = 403, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuthResponse>, ApiError> {
    let raw = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            ApiError::bad_request("Authorization header with a Bearer token is required")
        })?;

    if !state.tokens.is_valid(raw) {
        return Err(ApiError::forbidden("Invalid refresh token"));
    }
    let claims = state
        .tokens
        .decode(raw)
        .map_err(|_| ApiError::forbidden("Invalid refresh token"))?;

    let account = {
        let store = state.store.read().await;
        store.find_by_email(&claims.sub)
    }
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(issue_pair(&state, &account)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/authenticated",
    tag = "Authentication",
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn authenticated(
    Auth(principal): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let store = state.store.read().await;
    let account = store
        .find_by_id(principal.account_id)
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserResponse::from(&account)))
}
