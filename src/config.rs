// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC-SHA-256 token signing secret (>= 32 bytes) | dev-only fallback |
//! | `JWT_ACCESS_TTL_SECS` | Access token lifetime in seconds | `900` (15 min) |
//! | `JWT_REFRESH_TTL_SECS` | Refresh token lifetime in seconds | `1209600` (14 days) |
//! | `ADMIN_EMAIL` | Email of the admin account seeded at startup | unset |
//! | `ADMIN_PASSWORD` | Password of the seeded admin account | unset |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;

/// Environment variable name for the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the access token lifetime (seconds).
pub const JWT_ACCESS_TTL_ENV: &str = "JWT_ACCESS_TTL_SECS";

/// Environment variable name for the refresh token lifetime (seconds).
pub const JWT_REFRESH_TTL_ENV: &str = "JWT_REFRESH_TTL_SECS";

/// Default access token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 900;

/// Default refresh token lifetime: 14 days.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 1_209_600;

/// Signing secret used when `JWT_SECRET` is unset. Development only;
/// `Settings::from_env` warns loudly when it is in effect.
const DEV_JWT_SECRET: &str = "ima-server-development-signing-secret";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl Settings {
    /// Load settings from the environment, falling back to defaults.
    ///
    /// A missing or short `JWT_SECRET` is a deployment error, not a runtime
    /// error: the server still starts (so local development works) but a
    /// warning is emitted.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let jwt_secret = match env::var(JWT_SECRET_ENV) {
            Ok(secret) => secret,
            Err(_) => {
                tracing::warn!("{JWT_SECRET_ENV} is not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };
        if jwt_secret.len() < 32 {
            tracing::warn!(
                "{JWT_SECRET_ENV} is shorter than 32 bytes; HMAC-SHA-256 expects a 256-bit key"
            );
        }

        let access_ttl_secs = env_i64(JWT_ACCESS_TTL_ENV, DEFAULT_ACCESS_TTL_SECS);
        let refresh_ttl_secs = env_i64(JWT_REFRESH_TTL_ENV, DEFAULT_REFRESH_TTL_SECS);

        Self {
            host,
            port,
            jwt_secret,
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
