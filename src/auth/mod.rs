// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication and route authorization for the IMA API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with email/password and receives an access/refresh
//!    token pair
//! 2. Client sends `Authorization: Bearer <access token>` on every request
//! 3. The `authenticate` middleware resolves the token into a [`Principal`]
//!    (re-deriving the role set from the account store, never trusting the
//!    token's embedded roles) and binds it to the request
//! 4. The `authorize` middleware checks the request against the static
//!    role matrix in [`policy`]
//!
//! ## Security
//!
//! - Tokens are HMAC-SHA-256 signed, self-contained, short-lived
//! - A missing or invalid token leaves the request anonymous; the final
//!   401/403 decision is made by the authorization matrix so the error
//!   surface is uniform
//! - Cryptographic failure detail never reaches the client

pub mod error;
pub mod extractor;
pub mod middleware;
pub mod policy;
pub mod principal;
pub mod resolver;
pub mod roles;
pub mod token;

pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::AuthFlow;
pub use principal::Principal;
pub use resolver::{AccountDirectory, AuthFailure, IdentityResolver};
pub use roles::Role;
pub use token::{Claims, TokenCodec, TokenKind};
