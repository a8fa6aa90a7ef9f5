// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route-level authorization matrix.
//!
//! A static, ordered rule table mapping (HTTP method, path pattern) to the
//! role set allowed through. Rules are evaluated top to bottom and the
//! first match wins, so a specific rule (`PUT agreements/*/validate`) must
//! sit above the broader rule covering the same prefix
//! (`PUT agreements/**`). When nothing matches, the default is
//! "authenticated, any role".
//!
//! Object-level restrictions (who owns which agreement) cannot be
//! expressed here; those live in `crate::workflow::ownership`.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::AuthError;
use super::middleware::AuthFlow;
use super::roles::Role;

/// Who may pass a rule.
#[derive(Debug)]
pub enum Access {
    /// No principal required
    Public,
    /// Any authenticated principal
    Authenticated,
    /// Principal whose role set intersects the listed roles
    AnyOf(&'static [Role]),
}

/// One row of the matrix.
#[derive(Debug)]
pub struct Rule {
    /// `None` matches every method
    pub method: Option<Method>,
    pub pattern: &'static str,
    pub access: Access,
}

impl Rule {
    const fn new(method: Option<Method>, pattern: &'static str, access: Access) -> Self {
        Self {
            method,
            pattern,
            access,
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        match &self.method {
            Some(required) if required != method => return false,
            _ => {}
        }
        path_matches(self.pattern, path)
    }
}

use Access::{AnyOf, Public};

/// The authorization matrix. Ordering is load-bearing.
pub static RULES: &[Rule] = &[
    // Public entry points
    Rule::new(None, "/api/v1/auth/login", Public),
    Rule::new(None, "/api/v1/auth/register", Public),
    Rule::new(None, "/docs/**", Public),
    Rule::new(None, "/api-doc/**", Public),
    // Internships
    Rule::new(
        Some(Method::POST),
        "/api/v1/internships",
        AnyOf(&[Role::Company, Role::Admin]),
    ),
    Rule::new(
        Some(Method::PUT),
        "/api/v1/internships/**",
        AnyOf(&[Role::Company, Role::Admin]),
    ),
    Rule::new(
        Some(Method::DELETE),
        "/api/v1/internships/**",
        AnyOf(&[Role::Company, Role::Admin]),
    ),
    Rule::new(Some(Method::GET), "/api/v1/internships/**", Public),
    // Applications
    Rule::new(
        Some(Method::POST),
        "/api/v1/applications",
        AnyOf(&[Role::Student]),
    ),
    Rule::new(
        Some(Method::POST),
        "/api/v1/applications/for-student/**",
        AnyOf(&[Role::Admin]),
    ),
    Rule::new(
        Some(Method::PUT),
        "/api/v1/applications/**",
        AnyOf(&[Role::Student, Role::Admin]),
    ),
    Rule::new(
        Some(Method::DELETE),
        "/api/v1/applications/**",
        AnyOf(&[Role::Admin]),
    ),
    Rule::new(Some(Method::GET), "/api/v1/applications/**", Public),
    // Agreements
    Rule::new(
        Some(Method::POST),
        "/api/v1/agreements",
        AnyOf(&[Role::Teacher]),
    ),
    Rule::new(
        Some(Method::POST),
        "/api/v1/agreements/admin-create",
        AnyOf(&[Role::Admin]),
    ),
    Rule::new(
        Some(Method::PUT),
        "/api/v1/agreements/*/validate",
        AnyOf(&[Role::Teacher]),
    ),
    Rule::new(
        Some(Method::PUT),
        "/api/v1/agreements/**",
        AnyOf(&[Role::Teacher, Role::Admin, Role::Student, Role::Company]),
    ),
    Rule::new(
        Some(Method::DELETE),
        "/api/v1/agreements/**",
        AnyOf(&[Role::Admin]),
    ),
    Rule::new(Some(Method::GET), "/api/v1/agreements/**", Public),
    // User administration
    Rule::new(None, "/api/v1/users/**", AnyOf(&[Role::Admin])),
];

/// Match `path` against `pattern`.
///
/// Literal segments match exactly, `*` matches exactly one segment, and a
/// trailing `**` matches any remainder, including none.
fn path_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/').filter(|s| !s.is_empty());
    let mut path_segments = path.split('/').filter(|s| !s.is_empty());

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (Some("**"), _) => return true,
            (Some("*"), Some(_)) => {}
            (Some(expected), Some(actual)) if expected == actual => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Evaluate the matrix for one request.
pub fn evaluate(method: &Method, path: &str, flow: &AuthFlow) -> Result<(), AuthError> {
    if matches!(flow, AuthFlow::Exempt) {
        return Ok(());
    }

    let access = RULES
        .iter()
        .find(|rule| rule.matches(method, path))
        .map(|rule| &rule.access)
        .unwrap_or(&Access::Authenticated);

    match access {
        Access::Public => Ok(()),
        Access::Authenticated => match flow {
            AuthFlow::Authenticated(_) => Ok(()),
            _ => Err(AuthError::Unauthenticated),
        },
        Access::AnyOf(roles) => match flow {
            AuthFlow::Authenticated(principal)
                if roles.iter().any(|role| principal.has_role(*role)) =>
            {
                Ok(())
            }
            AuthFlow::Authenticated(_) => Err(AuthError::Forbidden),
            _ => Err(AuthError::Unauthenticated),
        },
    }
}

/// Authorization middleware; layered inside the authenticator.
pub async fn authorize(request: Request, next: Next) -> Response {
    let flow = request
        .extensions()
        .get::<AuthFlow>()
        .cloned()
        .unwrap_or(AuthFlow::Anonymous);

    match evaluate(request.method(), request.uri().path(), &flow) {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}
