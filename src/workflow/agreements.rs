// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The agreement lifecycle state machine.
//!
//! DRAFT -> PENDING_VALIDATION -> VALIDATED -> SENT_FOR_SIGNATURE ->
//! SIGNED, with CANCELED as the alternate terminal. Every operation takes
//! the caller's principal plus a mutable store handle; callers hold the
//! store write lock for the whole call, so each transition is atomic, and
//! `validate` additionally commits through the store's compare-and-set so
//! two racing validations cannot both succeed.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Principal, Role};
use crate::error::ApiError;
use crate::models::{Agreement, AgreementRequest, AgreementStatus, Application};
use crate::store::{InMemoryStore, StoreError};

use super::ownership;

/// Workflow failures, kept distinguishable so the API layer can map them
/// to distinct status codes (404 / 403 / 409).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Conflict(String),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => WorkflowError::NotFound(err.to_string()),
            StoreError::StatusConflict { .. } => WorkflowError::InvalidState(err.to_string()),
            StoreError::AgreementExists(_) | StoreError::DuplicateEmail(_) => {
                WorkflowError::Conflict(err.to_string())
            }
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match &err {
            WorkflowError::NotFound(msg) => ApiError::not_found(msg.clone()),
            WorkflowError::Forbidden(msg) => ApiError::forbidden(*msg),
            WorkflowError::InvalidState(msg) | WorkflowError::Conflict(msg) => {
                ApiError::conflict(msg.clone())
            }
        }
    }
}

fn new_agreement(
    application: &Application,
    validator_id: Uuid,
    payload: &AgreementRequest,
) -> Agreement {
    Agreement {
        id: Uuid::new_v4(),
        creation_date: Utc::now().date_naive(),
        start_date: payload.start_date,
        end_date: payload.end_date,
        status: AgreementStatus::Draft,
        document_url: payload.document_url.clone(),
        application_id: application.id,
        validator_id: Some(validator_id),
    }
}

/// Teacher creates an agreement for an application and becomes its
/// validator.
pub fn create_as_teacher(
    store: &mut InMemoryStore,
    principal: &Principal,
    application_id: Uuid,
    payload: &AgreementRequest,
) -> Result<Agreement, WorkflowError> {
    if !principal.has_role(Role::Teacher) {
        return Err(WorkflowError::Forbidden("Teacher role required"));
    }

    let teacher = store
        .teacher_by_user_id(principal.account_id)
        .ok_or_else(|| {
            WorkflowError::NotFound(format!(
                "Teacher not found with id: {}",
                principal.account_id
            ))
        })?;

    let application = store.application_by_id(application_id)?;
    let agreement = new_agreement(&application, teacher.user_id, payload);
    store.insert_agreement(agreement.clone())?;

    tracing::info!(
        teacher = %teacher.user_id,
        application = %application_id,
        agreement = %agreement.id,
        "agreement created by teacher"
    );
    Ok(agreement)
}

/// Admin creates an agreement and assigns an explicit teacher as
/// validator.
pub fn create_as_admin(
    store: &mut InMemoryStore,
    principal: &Principal,
    application_id: Uuid,
    teacher_id: Uuid,
    payload: &AgreementRequest,
) -> Result<Agreement, WorkflowError> {
    if !principal.is_admin() {
        return Err(WorkflowError::Forbidden("Admin role required"));
    }

    let teacher = store.teacher_by_user_id(teacher_id).ok_or_else(|| {
        WorkflowError::NotFound(format!("Teacher not found with id: {teacher_id}"))
    })?;

    let application = store.application_by_id(application_id)?;
    let agreement = new_agreement(&application, teacher.user_id, payload);
    store.insert_agreement(agreement.clone())?;

    tracing::warn!(
        teacher = %teacher_id,
        agreement = %agreement.id,
        "agreement created by admin with assigned validator"
    );
    Ok(agreement)
}

/// Generic update: only DRAFT agreements are mutable through this path.
///
/// Students and companies must own the agreement they touch. The payload
/// may request the PENDING_VALIDATION transition; any other status value
/// is ignored so that replaying the same update is harmless.
pub fn update(
    store: &mut InMemoryStore,
    principal: &Principal,
    agreement_id: Uuid,
    payload: &AgreementRequest,
) -> Result<Agreement, WorkflowError> {
    let allowed = [Role::Admin, Role::Teacher, Role::Student, Role::Company];
    if !allowed.iter().any(|role| principal.has_role(*role)) {
        return Err(WorkflowError::Forbidden("Role not allowed to update agreements"));
    }

    let mut agreement = store.agreement_by_id(agreement_id)?;

    if agreement.status != AgreementStatus::Draft {
        return Err(WorkflowError::InvalidState(
            "Only agreements in DRAFT status can be updated".to_string(),
        ));
    }

    if principal.has_role(Role::Student) {
        let application = store.application_by_id(agreement.application_id)?;
        if !ownership::is_owning_student(principal, &application) {
            return Err(WorkflowError::Forbidden("Student not owner of this agreement"));
        }
    }

    if principal.has_role(Role::Company) {
        let application = store.application_by_id(agreement.application_id)?;
        let internship = store.internship_by_id(application.internship_id)?;
        if !ownership::is_owning_company(principal, &internship) {
            return Err(WorkflowError::Forbidden("Company not owner of this agreement"));
        }
    }

    agreement.start_date = payload.start_date;
    agreement.end_date = payload.end_date;
    agreement.document_url = payload.document_url.clone();

    if payload.status == Some(AgreementStatus::PendingValidation) {
        agreement.status = AgreementStatus::PendingValidation;
        tracing::info!(agreement = %agreement_id, "agreement moved to PENDING_VALIDATION");
    }

    store.update_agreement(agreement.clone())?;
    Ok(agreement)
}

/// The assigned teacher validates a pending agreement.
pub fn validate(
    store: &mut InMemoryStore,
    principal: &Principal,
    agreement_id: Uuid,
) -> Result<Agreement, WorkflowError> {
    if !principal.has_role(Role::Teacher) {
        return Err(WorkflowError::Forbidden("Teacher role required"));
    }

    let agreement = store.agreement_by_id(agreement_id)?;

    if agreement.status != AgreementStatus::PendingValidation {
        return Err(WorkflowError::InvalidState(
            "Agreement must be PENDING_VALIDATION to be validated".to_string(),
        ));
    }

    if !ownership::is_assigned_validator(principal, &agreement) {
        return Err(WorkflowError::Forbidden("You are not the assigned validator"));
    }

    let validated = store.compare_and_update_status(
        agreement_id,
        AgreementStatus::PendingValidation,
        AgreementStatus::Validated,
    )?;

    tracing::info!(
        agreement = %agreement_id,
        teacher = %principal.account_id,
        "agreement validated"
    );
    Ok(validated)
}

/// Admin deletes an agreement, whatever its status.
pub fn delete(
    store: &mut InMemoryStore,
    principal: &Principal,
    agreement_id: Uuid,
) -> Result<(), WorkflowError> {
    if !principal.is_admin() {
        return Err(WorkflowError::Forbidden("Admin role required"));
    }

    store.agreement_by_id(agreement_id)?;
    store.delete_agreement(agreement_id)?;

    tracing::warn!(agreement = %agreement_id, "agreement deleted by admin");
    Ok(())
}

/// Read one agreement. No ownership filtering on reads.
pub fn get_by_id(store: &InMemoryStore, agreement_id: Uuid) -> Result<Agreement, WorkflowError> {
    Ok(store.agreement_by_id(agreement_id)?)
}

/// List every agreement. No ownership filtering on reads.
pub fn list_all(store: &InMemoryStore) -> Vec<Agreement> {
    store.list_agreements()
}
