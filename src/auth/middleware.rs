// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authentication middleware.
//!
//! Runs exactly once per request, before routing. It never rejects a
//! request itself: a missing, malformed or unresolvable token leaves the
//! request anonymous and the authorization matrix produces the uniform
//! 401/403 surface afterwards.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

use super::principal::Principal;
use super::resolver::IdentityResolver;

/// Paths that bypass authentication entirely, matched by prefix.
///
/// API documentation plus the endpoints that exist to obtain a token in
/// the first place.
pub const EXEMPT_PATHS: &[&str] = &[
    "/docs",
    "/api-doc",
    "/swagger-ui",
    "/api/v1/auth/login",
    "/api/v1/auth/register",
];

/// Authentication outcome for one request.
///
/// The request starts unchecked; by the time a handler runs it is in
/// exactly one of these states, recorded in the request extensions.
#[derive(Debug, Clone)]
pub enum AuthFlow {
    /// Exempt path or CORS preflight; no principal bound
    Exempt,
    /// No usable credentials; downstream authorization decides the outcome
    Anonymous,
    /// Token resolved; the principal is also bound separately
    Authenticated(Principal),
}

fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.iter().any(|prefix| path.starts_with(prefix))
}

/// Extract the bearer token from the Authorization header, if any.
///
/// An absent header or a non-`Bearer` scheme is not an error: the request
/// simply proceeds anonymously.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Resolve the caller's identity and bind it to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let flow = if request.method() == Method::OPTIONS || is_exempt(&path) {
        AuthFlow::Exempt
    } else {
        match bearer_token(request.headers()) {
            None => AuthFlow::Anonymous,
            Some(token) => {
                let store = state.store.read().await;
                let resolver = IdentityResolver::new(&state.tokens, &*store);
                match resolver.resolve(token) {
                    Ok(principal) => {
                        tracing::info!(
                            email = %principal.email,
                            roles = ?principal.roles,
                            "request authenticated"
                        );
                        AuthFlow::Authenticated(principal)
                    }
                    Err(failure) => {
                        tracing::warn!(%path, %failure, "bearer token rejected");
                        AuthFlow::Anonymous
                    }
                }
            }
        }
    };

    // Bind the fresh identity, discarding anything a previous layer left.
    if let AuthFlow::Authenticated(principal) = &flow {
        request.extensions_mut().insert(principal.clone());
    }
    request.extensions_mut().insert(flow);

    next.run(request).await
}
