// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Policy Module
//!
//! Role-based access control for routes, menu entries and UI actions.
//!
//! - `pattern` - resource identifiers with `:param` segments
//! - `table` - static resource → role mapping
//! - `evaluator` - allow / deny decisions for a session
//! - `menu` - menu tree filtering

pub mod error;
pub mod evaluator;
pub mod menu;
pub mod pattern;
pub mod table;

pub use error::PolicyError;
pub use evaluator::{can_access, can_access_at, has_required_role, AuthorizationDecision};
pub use menu::{academic_menu, filter_menu, MenuNode};
pub use pattern::ResourcePattern;
pub use table::{PolicyEntry, PolicyTable, PolicyTableBuilder, Requirement};
