// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of roles held by a session or required by a resource.
pub type RoleSet = BTreeSet<Role>;

/// Staff and student roles known to the workload system.
///
/// ## No Hierarchy
///
/// Roles are flat. A resource open to "any signed-in user" lists all four
/// roles explicitly; an Academic Officer does not implicitly hold the
/// privileges of a Program Chair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Faculty administration staff
    #[serde(rename = "Academic Officer")]
    AcademicOfficer,
    /// Chair of an academic program
    #[serde(rename = "Program Chair")]
    ProgramChair,
    /// Teaching staff
    #[serde(rename = "Professor")]
    Professor,
    /// Enrolled student
    #[serde(rename = "Student")]
    Student,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 4] = [
        Role::AcademicOfficer,
        Role::ProgramChair,
        Role::Professor,
        Role::Student,
    ];

    /// Name of the role as it appears in token claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::AcademicOfficer => "Academic Officer",
            Role::ProgramChair => "Program Chair",
            Role::Professor => "Professor",
            Role::Student => "Student",
        }
    }

    /// Parse a role from its claim name.
    ///
    /// Matching is exact and case-sensitive: `"professor"` is not a role.
    pub fn parse(s: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.as_str() == s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a [`RoleSet`] from a slice.
pub fn role_set(roles: &[Role]) -> RoleSet {
    roles.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(Role::parse("Professor"), Some(Role::Professor));
        assert_eq!(Role::parse("Academic Officer"), Some(Role::AcademicOfficer));
        assert_eq!(Role::parse("professor"), None);
        assert_eq!(Role::parse("PROGRAM CHAIR"), None);
        assert_eq!(Role::parse("Dean"), None);
    }

    #[test]
    fn display_matches_claim_name() {
        for role in Role::ALL {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn serde_uses_claim_names() {
        let json = serde_json::to_string(&Role::ProgramChair).unwrap();
        assert_eq!(json, r#""Program Chair""#);

        let role: Role = serde_json::from_str(r#""Student""#).unwrap();
        assert_eq!(role, Role::Student);
    }
}
