// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! External collaborator capabilities.
//!
//! Password hashing and outbound notification delivery are deployment
//! concerns; the application consumes them through these traits and the
//! defaults here keep a single-process deployment self-contained.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hashing,
}

/// Password digest capability.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, PasswordError>;
    fn verify(&self, plain: &str, digest: &str) -> bool;
}

/// Argon2id hasher producing PHC-format digests.
#[derive(Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        argon2::PasswordHasher::hash_password(&Argon2::default(), plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| PasswordError::Hashing)
    }

    fn verify(&self, plain: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Outbound notification capability.
///
/// Real-time delivery (WebSocket fan-out, email, ...) lives outside this
/// service; business operations publish domain events to a topic and the
/// deployment decides where they go.
pub trait Notifier: Send + Sync {
    fn publish(&self, topic: &str, payload: serde_json::Value);
}

/// Default notifier: emits the event as a structured log line.
#[derive(Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish(&self, topic: &str, payload: serde_json::Value) {
        tracing::info!(topic, %payload, "event published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hasher = Argon2Hasher;
        let digest = hasher.hash("s3cret-password").unwrap();

        assert!(digest.starts_with("$argon2"));
        assert!(hasher.verify("s3cret-password", &digest));
        assert!(!hasher.verify("wrong-password", &digest));
    }

    #[test]
    fn verify_rejects_malformed_digest() {
        let hasher = Argon2Hasher;
        assert!(!hasher.verify("whatever", "not-a-phc-string"));
    }
}
