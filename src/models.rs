// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain entities and API request/response types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Role;

// -----------------------------------------------------------------------------
// Accounts and profiles
// -----------------------------------------------------------------------------

/// A user account. The password digest never leaves the store.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub telephone: Option<String>,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

/// Student profile, keyed by the owning account id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    pub user_id: Uuid,
    pub student_code: Option<String>,
    pub level: Option<String>,
}

/// Teacher profile, keyed by the owning account id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Teacher {
    pub user_id: Uuid,
    pub department: Option<String>,
    pub grade: Option<String>,
    pub specialty: Option<String>,
}

/// Company profile, keyed by the owning account id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub professional_email: Option<String>,
}

// -----------------------------------------------------------------------------
// Internships and applications
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Internship {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub city: String,
    pub country: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub is_paid: bool,
    /// Account id of the publishing company
    pub company_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Application {
    pub id: Uuid,
    /// Account id of the applying student
    pub student_id: Uuid,
    pub internship_id: Uuid,
    pub cv_url: String,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub application_date: NaiveDate,
}

// -----------------------------------------------------------------------------
// Agreements
// -----------------------------------------------------------------------------

/// Lifecycle of an internship agreement.
///
/// Forward path: DRAFT -> PENDING_VALIDATION -> VALIDATED ->
/// SENT_FOR_SIGNATURE -> SIGNED. CANCELED is the alternate terminal state,
/// representable but not reached by any current operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementStatus {
    Draft,
    PendingValidation,
    Validated,
    SentForSignature,
    Signed,
    Canceled,
}

impl std::fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AgreementStatus::Draft => "DRAFT",
            AgreementStatus::PendingValidation => "PENDING_VALIDATION",
            AgreementStatus::Validated => "VALIDATED",
            AgreementStatus::SentForSignature => "SENT_FOR_SIGNATURE",
            AgreementStatus::Signed => "SIGNED",
            AgreementStatus::Canceled => "CANCELED",
        };
        f.write_str(name)
    }
}

/// The internship agreement document being carried to signature.
///
/// `application_id` is set at creation and never reassigned; exactly one
/// agreement may exist per application. `validator_id` may be `None` only
/// while the agreement is still a draft created without an assigned
/// teacher.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Agreement {
    pub id: Uuid,
    pub creation_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: AgreementStatus,
    pub document_url: Option<String>,
    pub application_id: Uuid,
    /// Account id of the teacher assigned as validator
    pub validator_id: Option<Uuid>,
}

// -----------------------------------------------------------------------------
// Requests
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub telephone: Option<String>,
    /// Requested role names; unknown names are ignored, empty means USER
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InternshipRequest {
    pub title: String,
    pub description: String,
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_paid: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApplicationRequest {
    pub cv_url: String,
    pub cover_letter: String,
    pub internship_id: Uuid,
}

/// Payload for agreement creation and the generic update path.
///
/// `status` is honored only when it requests the PENDING_VALIDATION
/// transition; any other value is ignored so that replaying an update is
/// harmless.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AgreementRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub status: Option<AgreementStatus>,
}

// -----------------------------------------------------------------------------
// Responses
// -----------------------------------------------------------------------------

/// Account fields safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub telephone: Option<String>,
    pub roles: Vec<Role>,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            telephone: account.telephone.clone(),
            roles: account.roles.clone(),
        }
    }
}

/// Token pair handed out by login, register and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_status_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&AgreementStatus::PendingValidation).unwrap(),
            r#""PENDING_VALIDATION""#
        );
        assert_eq!(AgreementStatus::SentForSignature.to_string(), "SENT_FOR_SIGNATURE");
    }

    #[test]
    fn user_response_hides_password_hash() {
        let account = Account {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            telephone: None,
            password_hash: "secret-digest".into(),
            roles: vec![Role::Student],
        };

        let body = serde_json::to_string(&UserResponse::from(&account)).unwrap();
        assert!(!body.contains("secret-digest"));
        assert!(body.contains("STUDENT"));
    }
}
