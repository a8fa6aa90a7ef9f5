// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the request's authenticated principal.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is the Principal bound by the authenticate middleware
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::AuthError;
use super::principal::Principal;

/// Extractor for handlers that need the caller's identity.
///
/// The authenticate middleware binds the principal to the request
/// extensions; this just reads it back. Routes that reach a handler using
/// `Auth` without a bound principal (possible only if the matrix marked
/// the route public) are rejected with 401.
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use uuid::Uuid;

    use crate::auth::roles::Role;

    use super::*;

    #[tokio::test]
    async fn extractor_reads_the_bound_principal() {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let principal = Principal {
            account_id: Uuid::new_v4(),
            email: "t@example.com".into(),
            roles: vec![Role::Teacher],
        };
        parts.extensions.insert(principal.clone());

        let Auth(extracted) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.account_id, principal.account_id);
    }

    #[tokio::test]
    async fn extractor_rejects_when_no_principal_is_bound() {
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }
}
