// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application endpoints.
//!
//! Students apply for themselves; admins can file an application on a
//! student's behalf.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{Auth, Role},
    error::ApiError,
    models::{Application, ApplicationRequest, ApplicationStatus},
    state::AppState,
    store::InMemoryStore,
    workflow::ownership,
};

fn validate_request(request: &ApplicationRequest) -> Result<(), ApiError> {
    if request.cv_url.trim().is_empty() || request.cover_letter.trim().is_empty() {
        return Err(ApiError::unprocessable(
            "CV URL and cover letter are mandatory",
        ));
    }
    Ok(())
}

/// Common creation path once the target student is known.
fn create_for(
    store: &mut InMemoryStore,
    student_id: Uuid,
    request: ApplicationRequest,
) -> Result<Application, ApiError> {
    if store.student_by_user_id(student_id).is_none() {
        return Err(ApiError::not_found(format!(
            "Student not found with id: {student_id}"
        )));
    }
    store
        .internship_by_id(request.internship_id)
        .map_err(|e| ApiError::not_found(e.to_string()))?;

    let application = Application {
        id: Uuid::new_v4(),
        student_id,
        internship_id: request.internship_id,
        cv_url: request.cv_url,
        cover_letter: request.cover_letter,
        status: ApplicationStatus::Pending,
        application_date: Utc::now().date_naive(),
    };
    store.insert_application(application.clone());
    Ok(application)
}

#[utoipa::path(
    post,
    path = "/api/v1/applications",
    request_body = ApplicationRequest,
    tag = "Applications",
    responses(
        (status = 201, body = Application),
        (status = 404, description = "Student profile or internship not found"),
        (status = 422, description = "Invalid payload")
    )
)]
pub async fn create_application(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Json(request): Json<ApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), ApiError> {
    validate_request(&request)?;

    let mut store = state.store.write().await;
    let application = create_for(&mut store, principal.account_id, request)?;

    tracing::info!(
        application = %application.id,
        student = %application.student_id,
        internship = %application.internship_id,
        "application submitted"
    );
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    post,
    path = "/api/v1/applications/for-student/{student_id}",
    request_body = ApplicationRequest,
    tag = "Applications",
    responses(
        (status = 201, body = Application),
        (status = 404, description = "Student or internship not found")
    )
)]
pub async fn create_application_for_student(
    Auth(_principal): Auth,
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(request): Json<ApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), ApiError> {
    validate_request(&request)?;

    let mut store = state.store.write().await;
    let application = create_for(&mut store, student_id, request)?;

    tracing::info!(
        application = %application.id,
        student = %student_id,
        "application filed by admin"
    );
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/v1/applications/{id}",
    tag = "Applications",
    responses((status = 200, body = Application), (status = 404))
)]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Application>, ApiError> {
    let store = state.store.read().await;
    let application = store
        .application_by_id(id)
        .map_err(|e| ApiError::not_found(e.to_string()))?;
    Ok(Json(application))
}

#[utoipa::path(
    get,
    path = "/api/v1/applications",
    tag = "Applications",
    responses((status = 200, body = [Application]))
)]
pub async fn list_applications(State(state): State<AppState>) -> Json<Vec<Application>> {
    let store = state.store.read().await;
    Json(store.list_applications())
}

#[utoipa::path(
    put,
    path = "/api/v1/applications/{id}",
    request_body = ApplicationRequest,
    tag = "Applications",
    responses(
        (status = 200, body = Application),
        (status = 403, description = "Student does not own this application"),
        (status = 404)
    )
)]
pub async fn update_application(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplicationRequest>,
) -> Result<Json<Application>, ApiError> {
    validate_request(&request)?;

    let mut store = state.store.write().await;
    let mut application = store
        .application_by_id(id)
        .map_err(|e| ApiError::not_found(e.to_string()))?;

    if principal.has_role(Role::Student) && !ownership::is_owning_applicant(&principal, &application)
    {
        return Err(ApiError::forbidden("Student not owner of this application"));
    }

    application.cv_url = request.cv_url;
    application.cover_letter = request.cover_letter;

    store
        .update_application(application.clone())
        .map_err(|e| ApiError::not_found(e.to_string()))?;
    Ok(Json(application))
}

#[utoipa::path(
    delete,
    path = "/api/v1/applications/{id}",
    tag = "Applications",
    responses((status = 204), (status = 404))
)]
pub async fn delete_application(
    Auth(_principal): Auth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store
        .delete_application(id)
        .map_err(|e| ApiError::not_found(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::auth::Principal;
    use crate::models::{Company, Internship, Student};

    use super::*;

    fn request(internship_id: Uuid) -> ApplicationRequest {
        ApplicationRequest {
            cv_url: "https://files.example.com/cv.pdf".into(),
            cover_letter: "Motivated".into(),
            internship_id,
        }
    }

    fn student_auth(account_id: Uuid) -> Auth {
        Auth(Principal {
            account_id,
            email: "s@example.com".into(),
            roles: vec![Role::Student],
        })
    }

    async fn seed(state: &AppState) -> (Uuid, Uuid) {
        let student_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        let internship_id = Uuid::new_v4();

        let mut store = state.store.write().await;
        store.upsert_student(Student {
            user_id: student_id,
            student_code: None,
            level: None,
        });
        store.upsert_company(Company {
            user_id: company_id,
            name: None,
            address: None,
            website: None,
            phone: None,
            professional_email: None,
        });
        store.insert_internship(Internship {
            id: internship_id,
            title: "Backend intern".into(),
            description: "...".into(),
            city: "Lyon".into(),
            country: None,
            start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            is_active: true,
            is_paid: false,
            company_id,
        });
        (student_id, internship_id)
    }

    #[tokio::test]
    async fn student_applies_for_themselves() {
        let state = AppState::default();
        let (student_id, internship_id) = seed(&state).await;

        let (status, Json(created)) = create_application(
            student_auth(student_id),
            State(state.clone()),
            Json(request(internship_id)),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.student_id, student_id);
        assert_eq!(created.status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn application_requires_an_existing_student_profile() {
        let state = AppState::default();
        let (_, internship_id) = seed(&state).await;

        let err = create_application(
            student_auth(Uuid::new_v4()),
            State(state),
            Json(request(internship_id)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn application_requires_an_existing_internship() {
        let state = AppState::default();
        let (student_id, _) = seed(&state).await;

        let err = create_application(
            student_auth(student_id),
            State(state),
            Json(request(Uuid::new_v4())),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn foreign_student_cannot_update_an_application() {
        let state = AppState::default();
        let (student_id, internship_id) = seed(&state).await;

        let (_, Json(created)) = create_application(
            student_auth(student_id),
            State(state.clone()),
            Json(request(internship_id)),
        )
        .await
        .unwrap();

        let other = Uuid::new_v4();
        state.store.write().await.upsert_student(Student {
            user_id: other,
            student_code: None,
            level: None,
        });

        let err = update_application(
            student_auth(other),
            State(state.clone()),
            Path(created.id),
            Json(request(internship_id)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        // The owner updates fine; admins bypass the ownership rule.
        let updated = update_application(
            student_auth(student_id),
            State(state.clone()),
            Path(created.id),
            Json(ApplicationRequest {
                cv_url: "https://files.example.com/cv2.pdf".into(),
                cover_letter: "Still motivated".into(),
                internship_id,
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.0.cv_url, "https://files.example.com/cv2.pdf");
    }

    #[tokio::test]
    async fn admin_files_for_a_student() {
        let state = AppState::default();
        let (student_id, internship_id) = seed(&state).await;
        let admin = Auth(Principal {
            account_id: Uuid::new_v4(),
            email: "a@example.com".into(),
            roles: vec![Role::Admin],
        });

        let (status, Json(created)) = create_application_for_student(
            admin,
            State(state),
            Path(student_id),
            Json(request(internship_id)),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.student_id, student_id);
    }
}
