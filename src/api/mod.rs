// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    models::{
        Agreement, AgreementRequest, AgreementStatus, Application, ApplicationRequest,
        ApplicationStatus, AuthResponse, Internship, InternshipRequest, LoginRequest,
        RegisterRequest, UserResponse,
    },
    state::AppState,
};

pub mod agreements;
pub mod applications;
pub mod auth;
pub mod internships;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/auth/authenticated", get(auth::authenticated))
        .route(
            "/internships",
            get(internships::list_internships).post(internships::create_internship),
        )
        .route(
            "/internships/{id}",
            get(internships::get_internship)
                .put(internships::update_internship)
                .delete(internships::delete_internship),
        )
        .route(
            "/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route(
            "/applications/for-student/{student_id}",
            post(applications::create_application_for_student),
        )
        .route(
            "/applications/{id}",
            get(applications::get_application)
                .put(applications::update_application)
                .delete(applications::delete_application),
        )
        .route(
            "/agreements",
            get(agreements::list_agreements).post(agreements::create_agreement),
        )
        .route(
            "/agreements/admin-create",
            post(agreements::admin_create_agreement),
        )
        .route(
            "/agreements/{id}",
            get(agreements::get_agreement)
                .put(agreements::update_agreement)
                .delete(agreements::delete_agreement),
        )
        .route("/agreements/{id}/validate", put(agreements::validate_agreement))
        .route("/users", get(users::list_users))
        .route(
            "/users/{id}",
            get(users::get_user).delete(users::delete_user),
        )
        .with_state(state.clone());

    // Layer order matters: CORS outermost (answers preflights), then
    // authentication, then the authorization matrix, then the routes.
    Router::new()
        .nest("/api/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(crate::auth::policy::authorize))
        .layer(middleware::from_fn_with_state(
            state,
            crate::auth::middleware::authenticate,
        ))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::refresh_token,
        auth::authenticated,
        internships::list_internships,
        internships::get_internship,
        internships::create_internship,
        internships::update_internship,
        internships::delete_internship,
        applications::list_applications,
        applications::get_application,
        applications::create_application,
        applications::create_application_for_student,
        applications::update_application,
        applications::delete_application,
        agreements::list_agreements,
        agreements::get_agreement,
        agreements::create_agreement,
        agreements::admin_create_agreement,
        agreements::update_agreement,
        agreements::validate_agreement,
        agreements::delete_agreement,
        users::list_users,
        users::get_user,
        users::delete_user
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserResponse,
            Internship,
            InternshipRequest,
            Application,
            ApplicationRequest,
            ApplicationStatus,
            Agreement,
            AgreementRequest,
            AgreementStatus,
            Role
        )
    ),
    tags(
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Internships", description = "Internship offers"),
        (name = "Applications", description = "Student applications"),
        (name = "Agreements", description = "Internship agreement workflow"),
        (name = "Users", description = "User administration")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::{Role, TokenKind};
    use crate::models::{
        Account, Application, ApplicationStatus, Company, Internship, Student, Teacher,
    };

    use super::*;

    struct Seeds {
        teacher_id: Uuid,
        application_id: Uuid,
    }

    async fn seed_account(state: &AppState, email: &str, roles: Vec<Role>) -> Uuid {
        let id = Uuid::new_v4();
        let mut store = state.store.write().await;
        store
            .insert_account(Account {
                id,
                email: email.to_string(),
                first_name: "Seed".into(),
                last_name: "Account".into(),
                telephone: None,
                password_hash: String::new(),
                roles: roles.clone(),
            })
            .expect("seed account");
        for role in roles {
            match role {
                Role::Student => store.upsert_student(Student {
                    user_id: id,
                    student_code: None,
                    level: None,
                }),
                Role::Teacher => store.upsert_teacher(Teacher {
                    user_id: id,
                    department: None,
                    grade: None,
                    specialty: None,
                }),
                Role::Company => store.upsert_company(Company {
                    user_id: id,
                    name: None,
                    address: None,
                    website: None,
                    phone: None,
                    professional_email: None,
                }),
                _ => {}
            }
        }
        id
    }

    /// One of each role, plus an internship and an application linking
    /// the student to the company's offer.
    async fn seeded_state() -> (AppState, Seeds) {
        let state = AppState::default();

        let teacher_id = seed_account(&state, "teacher@example.com", vec![Role::Teacher]).await;
        seed_account(&state, "teacher2@example.com", vec![Role::Teacher]).await;
        let student_id = seed_account(&state, "student@example.com", vec![Role::Student]).await;
        let company_id = seed_account(&state, "company@example.com", vec![Role::Company]).await;
        seed_account(&state, "admin@example.com", vec![Role::Admin]).await;

        let internship_id = Uuid::new_v4();
        let application_id = Uuid::new_v4();
        {
            let mut store = state.store.write().await;
            store.insert_internship(Internship {
                id: internship_id,
                title: "Backend intern".into(),
                description: "...".into(),
                city: "Lyon".into(),
                country: Some("FR".into()),
                start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
                is_active: true,
                is_paid: true,
                company_id,
            });
            store.insert_application(Application {
                id: application_id,
                student_id,
                internship_id,
                cv_url: "https://files.example.com/cv.pdf".into(),
                cover_letter: "...".into(),
                status: ApplicationStatus::Pending,
                application_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            });
        }

        (
            state,
            Seeds {
                teacher_id,
                application_id,
            },
        )
    }

    fn bearer(state: &AppState, email: &str) -> String {
        // Roles embedded in the token are irrelevant: the resolver
        // re-derives them from the account store.
        state
            .tokens
            .issue(email, &[], TokenKind::Access)
            .expect("issue token")
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn agreement_body() -> Value {
        json!({
            "start_date": "2026-02-01",
            "end_date": "2026-07-31"
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn registration_is_exempt_from_authentication() {
        let app = router(AppState::default());

        let response = app
            .oneshot(request(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "email": "new@example.com",
                    "password": "long-enough-password",
                    "first_name": "New",
                    "last_name": "User"
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn public_reads_work_without_a_token() {
        let (state, _) = seeded_state().await;
        let app = router(state);

        for uri in [
            "/api/v1/internships",
            "/api/v1/applications",
            "/api/v1/agreements",
        ] {
            let response = app
                .clone()
                .oneshot(request(Method::GET, uri, None, None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        }
    }

    #[tokio::test]
    async fn cors_preflight_is_exempt() {
        let (state, _) = seeded_state().await;
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/v1/agreements")
                    .header(header::ORIGIN, "http://localhost:4200")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn anonymous_writes_get_401() {
        let (state, seeds) = seeded_state().await;
        let app = router(state);

        let response = app
            .oneshot(request(
                Method::POST,
                &format!("/api/v1/agreements?application_id={}", seeds.application_id),
                None,
                Some(agreement_body()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_default_route_requires_a_principal() {
        let (state, _) = seeded_state().await;
        let token = bearer(&state, "teacher@example.com");
        let app = router(state);

        let anonymous = app
            .clone()
            .oneshot(request(Method::GET, "/api/v1/auth/authenticated", None, None))
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let authenticated = app
            .oneshot(request(
                Method::GET,
                "/api/v1/auth/authenticated",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(authenticated.status(), StatusCode::OK);
        let body = json_body(authenticated).await;
        assert_eq!(body["email"], "teacher@example.com");
    }

    #[tokio::test]
    async fn teacher_creates_a_draft_agreement_as_its_own_validator() {
        let (state, seeds) = seeded_state().await;
        let token = bearer(&state, "teacher@example.com");
        let app = router(state);

        let response = app
            .oneshot(request(
                Method::POST,
                &format!("/api/v1/agreements?application_id={}", seeds.application_id),
                Some(&token),
                Some(agreement_body()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "DRAFT");
        assert_eq!(body["validator_id"], seeds.teacher_id.to_string());
    }

    #[tokio::test]
    async fn admin_create_rejects_students_with_403() {
        let (state, seeds) = seeded_state().await;
        let token = bearer(&state, "student@example.com");
        let app = router(state);

        let response = app
            .oneshot(request(
                Method::POST,
                &format!(
                    "/api/v1/agreements/admin-create?application_id={}&teacher_id={}",
                    seeds.application_id, seeds.teacher_id
                ),
                Some(&token),
                Some(agreement_body()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn agreement_delete_is_admin_only_and_ignores_status() {
        let (state, seeds) = seeded_state().await;
        let teacher_token = bearer(&state, "teacher@example.com");
        let company_token = bearer(&state, "company@example.com");
        let admin_token = bearer(&state, "admin@example.com");
        let app = router(state);

        let created = app
            .clone()
            .oneshot(request(
                Method::POST,
                &format!("/api/v1/agreements?application_id={}", seeds.application_id),
                Some(&teacher_token),
                Some(agreement_body()),
            ))
            .await
            .unwrap();
        let agreement_id = json_body(created).await["id"].as_str().unwrap().to_string();

        let forbidden = app
            .clone()
            .oneshot(request(
                Method::DELETE,
                &format!("/api/v1/agreements/{agreement_id}"),
                Some(&company_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let deleted = app
            .oneshot(request(
                Method::DELETE,
                &format!("/api/v1/agreements/{agreement_id}"),
                Some(&admin_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn full_validation_flow_over_http() {
        let (state, seeds) = seeded_state().await;
        let teacher_token = bearer(&state, "teacher@example.com");
        let other_teacher_token = bearer(&state, "teacher2@example.com");
        let student_token = bearer(&state, "student@example.com");
        let app = router(state);

        // Teacher creates the draft.
        let created = app
            .clone()
            .oneshot(request(
                Method::POST,
                &format!("/api/v1/agreements?application_id={}", seeds.application_id),
                Some(&teacher_token),
                Some(agreement_body()),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let agreement_id = json_body(created).await["id"].as_str().unwrap().to_string();

        // Validating a DRAFT conflicts.
        let premature = app
            .clone()
            .oneshot(request(
                Method::PUT,
                &format!("/api/v1/agreements/{agreement_id}/validate"),
                Some(&teacher_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(premature.status(), StatusCode::CONFLICT);

        // The owning student submits it for validation.
        let submitted = app
            .clone()
            .oneshot(request(
                Method::PUT,
                &format!("/api/v1/agreements/{agreement_id}"),
                Some(&student_token),
                Some(json!({
                    "start_date": "2026-02-01",
                    "end_date": "2026-07-31",
                    "status": "PENDING_VALIDATION"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(submitted.status(), StatusCode::OK);
        assert_eq!(json_body(submitted).await["status"], "PENDING_VALIDATION");

        // A different teacher is not the assigned validator.
        let wrong_teacher = app
            .clone()
            .oneshot(request(
                Method::PUT,
                &format!("/api/v1/agreements/{agreement_id}/validate"),
                Some(&other_teacher_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(wrong_teacher.status(), StatusCode::FORBIDDEN);

        // The assigned validator succeeds.
        let validated = app
            .oneshot(request(
                Method::PUT,
                &format!("/api/v1/agreements/{agreement_id}/validate"),
                Some(&teacher_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(validated.status(), StatusCode::OK);
        assert_eq!(json_body(validated).await["status"], "VALIDATED");
    }

    #[tokio::test]
    async fn user_administration_requires_admin() {
        let (state, _) = seeded_state().await;
        let teacher_token = bearer(&state, "teacher@example.com");
        let admin_token = bearer(&state, "admin@example.com");
        let app = router(state);

        let forbidden = app
            .clone()
            .oneshot(request(Method::GET, "/api/v1/users", Some(&teacher_token), None))
            .await
            .unwrap();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let allowed = app
            .oneshot(request(Method::GET, "/api/v1/users", Some(&admin_token), None))
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
        assert_eq!(json_body(allowed).await.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn invalid_tokens_fall_back_to_anonymous() {
        let (state, _) = seeded_state().await;
        let app = router(state);

        // Garbage bearer on a public GET still succeeds...
        let public = app
            .clone()
            .oneshot(request(
                Method::GET,
                "/api/v1/internships",
                Some("garbage"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(public.status(), StatusCode::OK);

        // ...while the same token on a protected route yields 401, not 500.
        let protected = app
            .oneshot(request(
                Method::GET,
                "/api/v1/auth/authenticated",
                Some("garbage"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(protected.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
