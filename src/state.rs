// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::TokenCodec;
use crate::config::{DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS};
use crate::providers::{Argon2Hasher, LogNotifier, Notifier, PasswordHasher};
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub tokens: Arc<TokenCodec>,
    pub passwords: Arc<dyn PasswordHasher>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(store: InMemoryStore, tokens: TokenCodec) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens: Arc::new(tokens),
            passwords: Arc::new(Argon2Hasher),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

impl Default for AppState {
    /// Test-friendly state: empty store, development signing secret,
    /// default TTLs.
    fn default() -> Self {
        Self::new(
            InMemoryStore::new(),
            TokenCodec::new(
                "ima-server-development-signing-secret",
                DEFAULT_ACCESS_TTL_SECS,
                DEFAULT_REFRESH_TTL_SECS,
            ),
        )
    }
}
