// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Internship endpoints.
//!
//! Companies publish internships under their own profile; admins may act
//! on behalf of any company by naming it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    auth::{Auth, Principal, Role},
    error::ApiError,
    models::{Internship, InternshipRequest},
    state::AppState,
    workflow::ownership,
};

fn validate_request(request: &InternshipRequest) -> Result<(), ApiError> {
    if request.title.trim().is_empty()
        || request.description.trim().is_empty()
        || request.city.trim().is_empty()
    {
        return Err(ApiError::unprocessable(
            "Title, description and city are mandatory",
        ));
    }
    if request.start_date >= request.end_date {
        return Err(ApiError::unprocessable(
            "Start date must be before end date",
        ));
    }
    Ok(())
}

#[derive(Deserialize, IntoParams)]
pub struct CreateInternshipParams {
    /// Target company; required for admins, ignored for companies
    #[serde(default)]
    pub company_id: Option<Uuid>,
}

/// Resolve which company a write applies to: companies act for
/// themselves, admins name the company explicitly.
fn target_company(principal: &Principal, params: &CreateInternshipParams) -> Result<Uuid, ApiError> {
    if principal.has_role(Role::Company) {
        Ok(principal.account_id)
    } else {
        params
            .company_id
            .ok_or_else(|| ApiError::bad_request("company_id is required"))
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/internships",
    params(CreateInternshipParams),
    request_body = InternshipRequest,
    tag = "Internships",
    responses(
        (status = 201, body = Internship),
        (status = 404, description = "Company not found"),
        (status = 422, description = "Invalid payload")
    )
)]
pub async fn create_internship(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Query(params): Query<CreateInternshipParams>,
    Json(request): Json<InternshipRequest>,
) -> Result<(StatusCode, Json<Internship>), ApiError> {
    validate_request(&request)?;
    let company_id = target_company(&principal, &params)?;

    let mut store = state.store.write().await;
    if store.company_by_user_id(company_id).is_none() {
        return Err(ApiError::not_found(format!(
            "Company not found with id: {company_id}"
        )));
    }

    let internship = Internship {
        id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        city: request.city,
        country: request.country,
        start_date: request.start_date,
        end_date: request.end_date,
        is_active: request.is_active,
        is_paid: request.is_paid,
        company_id,
    };
    store.insert_internship(internship.clone());

    tracing::info!(internship = %internship.id, company = %company_id, "internship published");
    Ok((StatusCode::CREATED, Json(internship)))
}

#[utoipa::path(
    get,
    path = "/api/v1/internships/{id}",
    tag = "Internships",
    responses((status = 200, body = Internship), (status = 404))
)]
pub async fn get_internship(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Internship>, ApiError> {
    let store = state.store.read().await;
    let internship = store
        .internship_by_id(id)
        .map_err(|e| ApiError::not_found(e.to_string()))?;
    Ok(Json(internship))
}

#[utoipa::path(
    get,
    path = "/api/v1/internships",
    tag = "Internships",
    responses((status = 200, body = [Internship]))
)]
pub async fn list_internships(State(state): State<AppState>) -> Json<Vec<Internship>> {
    let store = state.store.read().await;
    Json(store.list_internships())
}

#[utoipa::path(
    put,
    path = "/api/v1/internships/{id}",
    request_body = InternshipRequest,
    tag = "Internships",
    responses(
        (status = 200, body = Internship),
        (status = 403, description = "Company does not own this internship"),
        (status = 404)
    )
)]
pub async fn update_internship(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<InternshipRequest>,
) -> Result<Json<Internship>, ApiError> {
    validate_request(&request)?;

    let mut store = state.store.write().await;
    let mut internship = store
        .internship_by_id(id)
        .map_err(|e| ApiError::not_found(e.to_string()))?;

    if principal.has_role(Role::Company) && !ownership::is_owning_company(&principal, &internship) {
        return Err(ApiError::forbidden("Company not owner of this internship"));
    }

    internship.title = request.title;
    internship.description = request.description;
    internship.city = request.city;
    internship.country = request.country;
    internship.start_date = request.start_date;
    internship.end_date = request.end_date;
    internship.is_active = request.is_active;
    internship.is_paid = request.is_paid;

    store
        .update_internship(internship.clone())
        .map_err(|e| ApiError::not_found(e.to_string()))?;
    Ok(Json(internship))
}

#[utoipa::path(
    delete,
    path = "/api/v1/internships/{id}",
    tag = "Internships",
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn delete_internship(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    let internship = store
        .internship_by_id(id)
        .map_err(|e| ApiError::not_found(e.to_string()))?;

    if principal.has_role(Role::Company) && !ownership::is_owning_company(&principal, &internship) {
        return Err(ApiError::forbidden("Company not owner of this internship"));
    }

    store
        .delete_internship(id)
        .map_err(|e| ApiError::not_found(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
