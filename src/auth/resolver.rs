// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Turns a raw bearer token into an authenticated [`Principal`].

use chrono::Utc;
use thiserror::Error;

use crate::models::Account;

use super::principal::Principal;
use super::token::TokenCodec;

/// Account lookup needed during identity resolution.
///
/// The store implements this; tests substitute a fixture map.
pub trait AccountDirectory {
    fn account_by_email(&self, email: &str) -> Option<Account>;
}

/// Why a token did not resolve to a principal.
///
/// Cryptographic detail is collapsed into `InvalidToken` before it leaves
/// this module; clients only ever learn "authenticated or not".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("token rejected")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("account not found")]
    AccountNotFound,
}

/// Resolves bearer tokens against the token codec and the account store.
pub struct IdentityResolver<'a, D> {
    codec: &'a TokenCodec,
    directory: &'a D,
}

impl<'a, D: AccountDirectory> IdentityResolver<'a, D> {
    pub fn new(codec: &'a TokenCodec, directory: &'a D) -> Self {
        Self { codec, directory }
    }

    /// Full resolution: signature, expiry, then account lookup.
    ///
    /// The principal's roles come from the account row, not from the
    /// token, so a role change invalidates the authority of tokens issued
    /// before it.
    pub fn resolve(&self, raw: &str) -> Result<Principal, AuthFailure> {
        let claims = self
            .codec
            .decode(raw)
            .map_err(|_| AuthFailure::InvalidToken)?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(AuthFailure::ExpiredToken);
        }

        let account = self
            .directory
            .account_by_email(&claims.sub)
            .ok_or(AuthFailure::AccountNotFound)?;

        Ok(Principal {
            account_id: account.id,
            email: account.email,
            roles: account.roles,
        })
    }

    /// Signature + expiry only; no account lookup.
    ///
    /// Used where a liveness check is enough (refresh-token validation).
    pub fn is_valid(&self, raw: &str) -> bool {
        self.codec.is_valid(raw)
    }
}
