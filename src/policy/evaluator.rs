// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization decisions.
//!
//! These decisions only steer navigation and what the UI shows. The backend
//! authorizes every request independently.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::table::{PolicyTable, Requirement};
use crate::auth::RoleSet;
use crate::session::Session;

/// Outcome of checking a session against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationDecision {
    Allowed,
    /// Resource needs a signed-in session
    DeniedUnauthenticated,
    /// Signed in, but without any of the required roles
    DeniedForbidden,
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allowed)
    }
}

/// Decide whether `session` may use `resource` at `now`.
pub fn can_access_at(
    session: &Session,
    table: &PolicyTable,
    resource: &str,
    now: DateTime<Utc>,
) -> AuthorizationDecision {
    let decision = match table.resolve(resource).map(|entry| entry.requirement()) {
        None | Some(Requirement::Public) => AuthorizationDecision::Allowed,
        Some(Requirement::AnyOf(_)) if !session.is_authenticated_at(now) => {
            AuthorizationDecision::DeniedUnauthenticated
        }
        Some(Requirement::AnyOf(required)) => {
            if has_required_role(required, &session.roles()) {
                AuthorizationDecision::Allowed
            } else {
                AuthorizationDecision::DeniedForbidden
            }
        }
    };

    tracing::debug!(resource, ?decision, "Evaluated access");
    decision
}

/// Decide whether `session` may use `resource` now.
pub fn can_access(session: &Session, table: &PolicyTable, resource: &str) -> AuthorizationDecision {
    can_access_at(session, table, resource, Utc::now())
}

/// At least one held role is among the required ones.
pub fn has_required_role(required: &RoleSet, held: &RoleSet) -> bool {
    !required.is_disjoint(held)
}
