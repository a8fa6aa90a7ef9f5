// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership guards: object-level authorization checks.
//!
//! Pure functions over the principal and already-loaded domain objects.
//! Every ownership rule in the system lives here — new rules are added to
//! this module, never inlined in handlers.

use crate::auth::{Principal, Role};
use crate::models::{Agreement, Application, Internship};

/// The student who filed the application behind an agreement.
pub fn is_owning_student(principal: &Principal, application: &Application) -> bool {
    principal.has_role(Role::Student) && application.student_id == principal.account_id
}

/// The company whose internship the agreement's application targets.
pub fn is_owning_company(principal: &Principal, internship: &Internship) -> bool {
    principal.has_role(Role::Company) && internship.company_id == principal.account_id
}

/// The teacher assigned to validate the agreement.
pub fn is_assigned_validator(principal: &Principal, agreement: &Agreement) -> bool {
    agreement.validator_id == Some(principal.account_id)
}

/// The student who owns an application (application update path).
pub fn is_owning_applicant(principal: &Principal, application: &Application) -> bool {
    is_owning_student(principal, application)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::models::{AgreementStatus, ApplicationStatus};

    use super::*;

    fn principal(account_id: Uuid, roles: Vec<Role>) -> Principal {
        Principal {
            account_id,
            email: "p@example.com".into(),
            roles,
        }
    }

    fn application(student_id: Uuid) -> Application {
        Application {
            id: Uuid::new_v4(),
            student_id,
            internship_id: Uuid::new_v4(),
            cv_url: "https://files.example.com/cv.pdf".into(),
            cover_letter: "...".into(),
            status: ApplicationStatus::Pending,
            application_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        }
    }

    fn internship(company_id: Uuid) -> Internship {
        Internship {
            id: Uuid::new_v4(),
            title: "Backend intern".into(),
            description: "...".into(),
            city: "Lyon".into(),
            country: None,
            start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            is_active: true,
            is_paid: true,
            company_id,
        }
    }

    fn agreement(validator_id: Option<Uuid>) -> Agreement {
        Agreement {
            id: Uuid::new_v4(),
            creation_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            status: AgreementStatus::Draft,
            document_url: None,
            application_id: Uuid::new_v4(),
            validator_id,
        }
    }

    #[test]
    fn owning_student_needs_role_and_matching_id() {
        let student_id = Uuid::new_v4();
        let app = application(student_id);

        assert!(is_owning_student(
            &principal(student_id, vec![Role::Student]),
            &app
        ));
        // Right id, missing role
        assert!(!is_owning_student(
            &principal(student_id, vec![Role::Teacher]),
            &app
        ));
        // Right role, different student
        assert!(!is_owning_student(
            &principal(Uuid::new_v4(), vec![Role::Student]),
            &app
        ));
    }

    #[test]
    fn owning_company_needs_role_and_matching_id() {
        let company_id = Uuid::new_v4();
        let job = internship(company_id);

        assert!(is_owning_company(
            &principal(company_id, vec![Role::Company]),
            &job
        ));
        assert!(!is_owning_company(
            &principal(Uuid::new_v4(), vec![Role::Company]),
            &job
        ));
        assert!(!is_owning_company(
            &principal(company_id, vec![Role::Student]),
            &job
        ));
    }

    #[test]
    fn assigned_validator_matches_on_account_id_only() {
        let teacher_id = Uuid::new_v4();
        let a = agreement(Some(teacher_id));

        assert!(is_assigned_validator(
            &principal(teacher_id, vec![Role::Teacher]),
            &a
        ));
        assert!(!is_assigned_validator(
            &principal(Uuid::new_v4(), vec![Role::Teacher]),
            &a
        ));
        // No validator assigned yet
        assert!(!is_assigned_validator(
            &principal(teacher_id, vec![Role::Teacher]),
            &agreement(None)
        ));
    }
}
