// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr};

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use ima_server::{
    api::router,
    auth::{Role, TokenCodec},
    config::Settings,
    models::Account,
    providers::{Argon2Hasher, PasswordHasher},
    state::AppState,
    store::InMemoryStore,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    let tokens = TokenCodec::new(
        &settings.jwt_secret,
        settings.access_ttl_secs,
        settings.refresh_ttl_secs,
    );

    let mut store = InMemoryStore::new();
    if let (Ok(email), Ok(password)) = (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
        seed_admin(&mut store, &email, &password);
    }

    let state = AppState::new(store, tokens);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .expect("Failed to parse bind address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("IMA server listening on http://{addr} (docs at /docs)");
    axum::serve(listener, app).await.expect("HTTP server failed");
}

/// Seed the bootstrap admin account from the environment.
fn seed_admin(store: &mut InMemoryStore, email: &str, password: &str) {
    let password_hash = Argon2Hasher
        .hash(password)
        .expect("Failed to hash admin password");

    let account = Account {
        id: Uuid::new_v4(),
        email: email.to_string(),
        first_name: "Admin".into(),
        last_name: "Account".into(),
        telephone: None,
        password_hash,
        roles: vec![Role::Admin],
    };

    match store.insert_account(account) {
        Ok(()) => tracing::info!(%email, "seeded admin account"),
        Err(e) => tracing::warn!(error = %e, "failed to seed admin account"),
    }
}
