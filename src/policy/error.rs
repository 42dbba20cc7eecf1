// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Policy table construction errors.

/// Error raised while building a [`PolicyTable`](super::PolicyTable).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// Resource identifier cannot be parsed
    #[error("Invalid resource pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },
    /// An entry lists no roles; use a public entry instead
    #[error("Policy entry '{0}' requires an empty role set")]
    EmptyRoleSet(String),
    /// Two entries share the same resource identifier
    #[error("Duplicate policy entry '{0}'")]
    DuplicateEntry(String),
}
