// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory domain store.
//!
//! Stands in for the relational database behind the same method surface a
//! persistent repository would expose. All access goes through
//! `AppState`'s `RwLock`, so every method call is atomic with respect to
//! concurrent requests; multi-step workflow transitions hold the write
//! lock for their whole duration.

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::auth::resolver::AccountDirectory;
use crate::models::{
    Account, Agreement, AgreementStatus, Application, Company, Internship, Student, Teacher,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{resource} not found with id: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("user already exists with email: {0}")]
    DuplicateEmail(String),

    #[error("agreement already exists for application: {0}")]
    AgreementExists(Uuid),

    #[error("agreement status is {actual}, expected {expected}")]
    StatusConflict {
        expected: AgreementStatus,
        actual: AgreementStatus,
    },
}

impl StoreError {
    fn not_found(resource: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    accounts: HashMap<Uuid, Account>,
    students: HashMap<Uuid, Student>,
    teachers: HashMap<Uuid, Teacher>,
    companies: HashMap<Uuid, Company>,
    internships: HashMap<Uuid, Internship>,
    applications: HashMap<Uuid, Application>,
    agreements: HashMap<Uuid, Agreement>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    pub fn insert_account(&mut self, account: Account) -> Result<(), StoreError> {
        if self.find_by_email(&account.email).is_some() {
            return Err(StoreError::DuplicateEmail(account.email));
        }
        self.accounts.insert(account.id, account);
        Ok(())
    }

    pub fn find_by_email(&self, email: &str) -> Option<Account> {
        self.accounts
            .values()
            .find(|account| account.email == email)
            .cloned()
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<Account> {
        self.accounts.get(&id).cloned()
    }

    pub fn list_accounts(&self) -> Vec<Account> {
        self.accounts.values().cloned().collect()
    }

    /// Remove an account together with its profile rows.
    pub fn delete_account(&mut self, id: Uuid) -> Result<Account, StoreError> {
        let account = self
            .accounts
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("User", id))?;
        self.students.remove(&id);
        self.teachers.remove(&id);
        self.companies.remove(&id);
        Ok(account)
    }

    // -------------------------------------------------------------------------
    // Profiles (1:1 with accounts, keyed by account id)
    // -------------------------------------------------------------------------

    pub fn upsert_student(&mut self, student: Student) {
        self.students.insert(student.user_id, student);
    }

    pub fn upsert_teacher(&mut self, teacher: Teacher) {
        self.teachers.insert(teacher.user_id, teacher);
    }

    pub fn upsert_company(&mut self, company: Company) {
        self.companies.insert(company.user_id, company);
    }

    pub fn student_by_user_id(&self, user_id: Uuid) -> Option<Student> {
        self.students.get(&user_id).cloned()
    }

    pub fn teacher_by_user_id(&self, user_id: Uuid) -> Option<Teacher> {
        self.teachers.get(&user_id).cloned()
    }

    pub fn company_by_user_id(&self, user_id: Uuid) -> Option<Company> {
        self.companies.get(&user_id).cloned()
    }

    // -------------------------------------------------------------------------
    // Internships
    // -------------------------------------------------------------------------

    pub fn insert_internship(&mut self, internship: Internship) {
        self.internships.insert(internship.id, internship);
    }

    pub fn internship_by_id(&self, id: Uuid) -> Result<Internship, StoreError> {
        self.internships
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Internship", id))
    }

    pub fn update_internship(&mut self, internship: Internship) -> Result<(), StoreError> {
        if !self.internships.contains_key(&internship.id) {
            return Err(StoreError::not_found("Internship", internship.id));
        }
        self.internships.insert(internship.id, internship);
        Ok(())
    }

    pub fn delete_internship(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.internships
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Internship", id))
    }

    pub fn list_internships(&self) -> Vec<Internship> {
        self.internships.values().cloned().collect()
    }

    // -------------------------------------------------------------------------
    // Applications
    // -------------------------------------------------------------------------

    pub fn insert_application(&mut self, application: Application) {
        self.applications.insert(application.id, application);
    }

    pub fn application_by_id(&self, id: Uuid) -> Result<Application, StoreError> {
        self.applications
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Application", id))
    }

    pub fn update_application(&mut self, application: Application) -> Result<(), StoreError> {
        if !self.applications.contains_key(&application.id) {
            return Err(StoreError::not_found("Application", application.id));
        }
        self.applications.insert(application.id, application);
        Ok(())
    }

    pub fn delete_application(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.applications
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Application", id))
    }

    pub fn list_applications(&self) -> Vec<Application> {
        self.applications.values().cloned().collect()
    }

    // -------------------------------------------------------------------------
    // Agreements
    // -------------------------------------------------------------------------

    /// Insert a new agreement, enforcing the one-agreement-per-application
    /// binding.
    pub fn insert_agreement(&mut self, agreement: Agreement) -> Result<(), StoreError> {
        let taken = self
            .agreements
            .values()
            .any(|existing| existing.application_id == agreement.application_id);
        if taken {
            return Err(StoreError::AgreementExists(agreement.application_id));
        }
        self.agreements.insert(agreement.id, agreement);
        Ok(())
    }

    pub fn agreement_by_id(&self, id: Uuid) -> Result<Agreement, StoreError> {
        self.agreements
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Agreement", id))
    }

    pub fn update_agreement(&mut self, agreement: Agreement) -> Result<(), StoreError> {
        if !self.agreements.contains_key(&agreement.id) {
            return Err(StoreError::not_found("Agreement", agreement.id));
        }
        self.agreements.insert(agreement.id, agreement);
        Ok(())
    }

    /// Compare-and-set on the agreement status.
    ///
    /// The transition commits only if the current status still equals
    /// `expected`, which keeps two concurrent transitions on the same row
    /// from both succeeding.
    pub fn compare_and_update_status(
        &mut self,
        id: Uuid,
        expected: AgreementStatus,
        next: AgreementStatus,
    ) -> Result<Agreement, StoreError> {
        let agreement = self
            .agreements
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Agreement", id))?;

        if agreement.status != expected {
            return Err(StoreError::StatusConflict {
                expected,
                actual: agreement.status,
            });
        }

        agreement.status = next;
        Ok(agreement.clone())
    }

    pub fn delete_agreement(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.agreements
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Agreement", id))
    }

    pub fn list_agreements(&self) -> Vec<Agreement> {
        self.agreements.values().cloned().collect()
    }
}

impl AccountDirectory for InMemoryStore {
    fn account_by_email(&self, email: &str) -> Option<Account> {
        self.find_by_email(email)
    }
}
