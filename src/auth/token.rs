// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed token issuance and verification.
//!
//! Tokens are standard three-segment JWTs signed with HMAC-SHA-256 using a
//! single symmetric deployment secret. Access tokens embed the account's
//! role names at issuance time (for downstream services that trust the
//! token directly); refresh tokens carry only the subject plus a
//! `typ: "refresh"` discriminator.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::roles::Role;

/// Which of the two token families a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived, sent on every API request
    Access,
    /// Long-lived, exchanged for a fresh pair at the refresh endpoint
    Refresh,
}

/// Errors from token encoding/decoding.
///
/// These never cross the resolver boundary: callers of the authentication
/// path only ever observe "authenticated or not".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
    #[error("token could not be signed")]
    Signing,
}

/// Claims carried by both token kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account email
    pub sub: String,
    /// Role names, embedded on access tokens only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
    /// `"refresh"` on refresh tokens, absent on access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Claims {
    pub fn kind(&self) -> TokenKind {
        match self.typ.as_deref() {
            Some("refresh") => TokenKind::Refresh,
            _ => TokenKind::Access,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Encodes and decodes the deployment's signed identity tokens.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    fn ttl_secs(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        }
    }

    /// Issue a token for `subject` stamped at the current time.
    pub fn issue(&self, subject: &str, roles: &[Role], kind: TokenKind) -> Result<String, TokenError> {
        self.issue_at(subject, roles, kind, Utc::now().timestamp())
    }

    /// Issue a token with an explicit issued-at timestamp.
    ///
    /// The expiry is `issued_at + ttl(kind)`; expiry tests inject a past
    /// timestamp here instead of waiting out the TTL.
    pub fn issue_at(
        &self,
        subject: &str,
        roles: &[Role],
        kind: TokenKind,
        issued_at: i64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            roles: match kind {
                TokenKind::Access => roles.iter().map(|r| r.as_str().to_string()).collect(),
                TokenKind::Refresh => Vec::new(),
            },
            iat: issued_at,
            exp: issued_at + self.ttl_secs(kind),
            typ: match kind {
                TokenKind::Access => None,
                TokenKind::Refresh => Some("refresh".to_string()),
            },
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify the signature and structure of `raw` and return its claims.
    ///
    /// Expiry is deliberately not checked here; the resolver owns that so
    /// it can tell an expired token from a forged one.
    pub fn decode(&self, raw: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<Claims>(raw, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Signature plus expiry check, nothing else.
    pub fn is_valid(&self, raw: &str) -> bool {
        self.decode(raw)
            .map(|claims| !claims.is_expired(Utc::now().timestamp()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("unit-test-secret-of-at-least-32-bytes!", 900, 1_209_600)
    }

    #[test]
    fn issue_then_decode_round_trips_claims() {
        let codec = codec();
        let token = codec
            .issue("alice@example.com", &[Role::Teacher, Role::Admin], TokenKind::Access)
            .unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.roles, vec!["TEACHER", "ADMIN"]);
        assert_eq!(claims.kind(), TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn refresh_tokens_carry_no_roles() {
        let codec = codec();
        let token = codec
            .issue("alice@example.com", &[Role::Teacher], TokenKind::Refresh)
            .unwrap();

        let claims = codec.decode(&token).unwrap();
        assert!(claims.roles.is_empty());
        assert_eq!(claims.kind(), TokenKind::Refresh);
        assert_eq!(claims.exp - claims.iat, 1_209_600);
    }

    #[test]
    fn expired_token_fails_is_valid_but_still_decodes() {
        let codec = codec();
        let issued_at = Utc::now().timestamp() - 10_000;
        let token = codec
            .issue_at("alice@example.com", &[], TokenKind::Access, issued_at)
            .unwrap();

        assert!(!codec.is_valid(&token));
        // decode does not check expiry
        let claims = codec.decode(&token).unwrap();
        assert!(claims.is_expired(Utc::now().timestamp()));
    }

    #[test]
    fn wrong_secret_is_rejected_as_invalid_signature() {
        let codec = codec();
        let other = TokenCodec::new("a-completely-different-32-byte-secret!!", 900, 1_209_600);
        let token = other
            .issue("alice@example.com", &[], TokenKind::Access)
            .unwrap();

        assert_eq!(codec.decode(&token), Err(TokenError::InvalidSignature));
        assert!(!codec.is_valid(&token));
    }

    #[test]
    fn garbage_is_rejected_as_malformed() {
        let codec = codec();
        assert_eq!(codec.decode("not-a-token"), Err(TokenError::Malformed));
        assert!(!codec.is_valid(""));
    }
}
