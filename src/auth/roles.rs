// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// An account may hold several roles at once (e.g. a teacher who is also
/// an admin). `User` is the default granted at registration when no other
/// role is requested; it carries no resource-specific rights beyond "is
/// authenticated".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Applies to internships, owns applications
    Student,
    /// Validates agreements assigned to them
    Teacher,
    /// Publishes internships, party to agreements
    Company,
    /// Full administrative access
    Admin,
    /// Plain authenticated account
    User,
}

impl Role {
    /// Parse a role from its wire name (case-insensitive).
    ///
    /// Used when assigning roles at registration; unknown names yield
    /// `None` and are ignored by the caller.
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_uppercase().as_str() {
            "STUDENT" => Some(Role::Student),
            "TEACHER" => Some(Role::Teacher),
            "COMPANY" => Some(Role::Company),
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    /// The name used in token claims and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Teacher => "TEACHER",
            Role::Company => "COMPANY",
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl Default for Role {
    /// Default role is User (least privilege for authenticated accounts).
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_any_case() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("Student"), Some(Role::Student));
        assert_eq!(Role::parse("unknown"), None);
    }

    #[test]
    fn wire_names_round_trip() {
        for role in [
            Role::Student,
            Role::Teacher,
            Role::Company,
            Role::Admin,
            Role::User,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn serializes_to_uppercase_names() {
        assert_eq!(
            serde_json::to_string(&Role::Student).unwrap(),
            r#""STUDENT""#
        );
    }

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }
}
