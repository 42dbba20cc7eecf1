// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Declarative resource → role mapping.
//!
//! ## Resolution
//!
//! 1. An entry whose identifier equals the (normalized) resource wins.
//! 2. Otherwise the first parameterized entry, in declaration order, that
//!    matches the resource.
//! 3. Otherwise nothing: the resource is unlisted and therefore public.
//!
//! Unlisted resources being public keeps ungated pages working, but it also
//! means a new protected page is open until it gets an entry here.

use std::collections::{HashMap, HashSet};

use super::error::PolicyError;
use super::pattern::{normalize, ResourcePattern};
use crate::auth::{role_set, Role, RoleSet};

/// Who may use a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// No sign-in needed
    Public,
    /// Signed in with at least one of these roles (never empty)
    AnyOf(RoleSet),
}

/// One row of the policy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyEntry {
    pattern: ResourcePattern,
    requirement: Requirement,
}

impl PolicyEntry {
    pub fn pattern(&self) -> &ResourcePattern {
        &self.pattern
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

/// Immutable policy table. Build with [`PolicyTable::builder`].
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    entries: Vec<PolicyEntry>,
    /// Normalized identifier → index, for entries without parameters
    exact: HashMap<String, usize>,
}

impl PolicyTable {
    pub fn builder() -> PolicyTableBuilder {
        PolicyTableBuilder::default()
    }

    /// Find the entry governing `resource`, `None` if unlisted.
    pub fn resolve(&self, resource: &str) -> Option<&PolicyEntry> {
        let resource = normalize(resource);

        if let Some(entry) = self.exact.get(resource).and_then(|&i| self.entries.get(i)) {
            return Some(entry);
        }

        self.entries
            .iter()
            .find(|entry| entry.pattern.is_parameterized() && entry.pattern.matches(resource))
    }

    /// Routes, menu entries and their roles for the workload application.
    ///
    /// Menu entries are named `menu:<id>` and pair with
    /// [`academic_menu`](super::menu::academic_menu).
    pub fn academic() -> Self {
        use Role::{AcademicOfficer, ProgramChair, Professor};

        let staff = &[Professor, ProgramChair, AcademicOfficer];
        let managers = &[ProgramChair, AcademicOfficer];
        let officer = &[AcademicOfficer];
        let everyone = &Role::ALL;

        PolicyTable::builder()
            // Public pages
            .public("/login")
            .public("/unauthorized")
            .public("/font-test")
            // Home
            .allow("/", everyone)
            .allow("/profile", everyone)
            // Subjects
            .allow("/subjects", staff)
            .allow("/subjects/create", managers)
            .allow("/subjects/:id", staff)
            .allow("/subjects/:id/edit", managers)
            .allow("/subjects/edit/:id", managers)
            // Same roles as menu:my-subjects, so the entry never leads to /unauthorized
            .allow("/my-subjects", &[Professor, AcademicOfficer])
            // Terms
            .allow("/terms", everyone)
            .allow("/terms/create", officer)
            .allow("/terms/:id", everyone)
            .allow("/terms/edit/:id", officer)
            // Course status
            .allow("/course-status", staff)
            .allow("/course-status/term/:termId", staff)
            // Reporting and administration
            .allow("/dashboard", managers)
            .allow("/permissions", managers)
            // Menu entries
            .allow("menu:home", everyone)
            .allow("menu:subjects", officer)
            .allow("menu:subjects-list", staff)
            .allow("menu:subjects-create", managers)
            .allow("menu:terms", officer)
            .allow("menu:course-status", staff)
            .allow("menu:my-subjects", &[AcademicOfficer, Professor])
            .allow("menu:dashboard", managers)
            .allow("menu:role-management", managers)
            .build()
            .expect("academic policy table is well-formed")
    }
}

/// Collects entries; validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct PolicyTableBuilder {
    rows: Vec<(String, Option<RoleSet>)>,
}

impl PolicyTableBuilder {
    /// Add a resource anyone may use.
    pub fn public(mut self, resource: impl Into<String>) -> Self {
        self.rows.push((resource.into(), None));
        self
    }

    /// Add a resource usable by any of `roles`.
    pub fn allow(mut self, resource: impl Into<String>, roles: &[Role]) -> Self {
        self.rows.push((resource.into(), Some(role_set(roles))));
        self
    }

    /// Validate the entries and build the table.
    pub fn build(self) -> Result<PolicyTable, PolicyError> {
        let mut table = PolicyTable::default();
        let mut seen = HashSet::new();

        for (raw, roles) in self.rows {
            let pattern = ResourcePattern::parse(&raw)?;
            let requirement = match roles {
                None => Requirement::Public,
                Some(roles) if roles.is_empty() => return Err(PolicyError::EmptyRoleSet(raw)),
                Some(roles) => Requirement::AnyOf(roles),
            };

            if !seen.insert(pattern.as_str().to_string()) {
                return Err(PolicyError::DuplicateEntry(raw));
            }

            if !pattern.is_parameterized() {
                table
                    .exact
                    .insert(pattern.as_str().to_string(), table.entries.len());
            }
            table.entries.push(PolicyEntry {
                pattern,
                requirement,
            });
        }

        Ok(table)
    }
}
