// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Agreement endpoints.
//!
//! Thin wrappers: route-level authorization already ran in the middleware
//! stack; the state/ownership rules live in `crate::workflow::agreements`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{Agreement, AgreementRequest},
    state::AppState,
    workflow::agreements as workflow,
};

#[derive(Deserialize, IntoParams)]
pub struct CreateAgreementParams {
    /// Application the agreement is bound to
    pub application_id: Uuid,
}

#[derive(Deserialize, IntoParams)]
pub struct AdminCreateAgreementParams {
    /// Application the agreement is bound to
    pub application_id: Uuid,
    /// Teacher assigned as validator
    pub teacher_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/v1/agreements",
    params(CreateAgreementParams),
    request_body = AgreementRequest,
    tag = "Agreements",
    responses(
        (status = 201, body = Agreement),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application already has an agreement")
    )
)]
pub async fn create_agreement(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Query(params): Query<CreateAgreementParams>,
    Json(request): Json<AgreementRequest>,
) -> Result<(StatusCode, Json<Agreement>), ApiError> {
    let mut store = state.store.write().await;
    let agreement =
        workflow::create_as_teacher(&mut store, &principal, params.application_id, &request)?;
    drop(store);

    state.notifier.publish(
        "agreements",
        json!({
            "event": "created",
            "agreement_id": agreement.id,
            "application_id": agreement.application_id,
        }),
    );
    Ok((StatusCode::CREATED, Json(agreement)))
}

#[utoipa::path(
    post,
    path = "/api/v1/agreements/admin-create",
    params(AdminCreateAgreementParams),
    request_body = AgreementRequest,
    tag = "Agreements",
    responses(
        (status = 201, body = Agreement),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Application or teacher not found")
    )
)]
pub async fn admin_create_agreement(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Query(params): Query<AdminCreateAgreementParams>,
    Json(request): Json<AgreementRequest>,
) -> Result<(StatusCode, Json<Agreement>), ApiError> {
    let mut store = state.store.write().await;
    let agreement = workflow::create_as_admin(
        &mut store,
        &principal,
        params.application_id,
        params.teacher_id,
        &request,
    )?;
    drop(store);

    state.notifier.publish(
        "agreements",
        json!({
            "event": "created",
            "agreement_id": agreement.id,
            "validator_id": agreement.validator_id,
        }),
    );
    Ok((StatusCode::CREATED, Json(agreement)))
}

#[utoipa::path(
    get,
    path = "/api/v1/agreements/{id}",
    tag = "Agreements",
    responses((status = 200, body = Agreement), (status = 404))
)]
pub async fn get_agreement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Agreement>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(workflow::get_by_id(&store, id)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/agreements",
    tag = "Agreements",
    responses((status = 200, body = [Agreement]))
)]
pub async fn list_agreements(State(state): State<AppState>) -> Json<Vec<Agreement>> {
    let store = state.store.read().await;
    Json(workflow::list_all(&store))
}

#[utoipa::path(
    put,
    path = "/api/v1/agreements/{id}",
    request_body = AgreementRequest,
    tag = "Agreements",
    responses(
        (status = 200, body = Agreement),
        (status = 403, description = "Caller does not own this agreement"),
        (status = 409, description = "Agreement is no longer a draft")
    )
)]
pub async fn update_agreement(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AgreementRequest>,
) -> Result<Json<Agreement>, ApiError> {
    let mut store = state.store.write().await;
    let agreement = workflow::update(&mut store, &principal, id, &request)?;
    Ok(Json(agreement))
}

#[utoipa::path(
    put,
    path = "/api/v1/agreements/{id}/validate",
    tag = "Agreements",
    responses(
        (status = 200, body = Agreement),
        (status = 403, description = "Caller is not the assigned validator"),
        (status = 409, description = "Agreement is not pending validation")
    )
)]
pub async fn validate_agreement(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Agreement>, ApiError> {
    let mut store = state.store.write().await;
    let agreement = workflow::validate(&mut store, &principal, id)?;
    drop(store);

    state.notifier.publish(
        "agreements",
        json!({
            "event": "validated",
            "agreement_id": agreement.id,
            "validator_id": agreement.validator_id,
        }),
    );
    Ok(Json(agreement))
}

#[utoipa::path(
    delete,
    path = "/api/v1/agreements/{id}",
    tag = "Agreements",
    responses((status = 204), (status = 404))
)]
pub async fn delete_agreement(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    workflow::delete(&mut store, &principal, id)?;
    Ok(StatusCode::NO_CONTENT)
}
