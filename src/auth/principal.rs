// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authenticated identity bound to a request.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::Role;

/// Authenticated account information derived from a bearer token.
///
/// Constructed once per request by the identity resolver, bound to the
/// request's extensions, and discarded when the request ends. The role set
/// is re-derived from the account store at resolution time, so a token
/// issued before a role change never grants stale authority.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Account identifier (primary key of the account row)
    pub account_id: Uuid,
    /// Account email, the token subject
    pub email: String,
    /// Current role set of the account
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_role_checks_membership() {
        let principal = Principal {
            account_id: Uuid::new_v4(),
            email: "t@example.com".into(),
            roles: vec![Role::Teacher, Role::Admin],
        };

        assert!(principal.has_role(Role::Teacher));
        assert!(principal.is_admin());
        assert!(!principal.has_role(Role::Student));
    }
}
