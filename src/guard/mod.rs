// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Guard Module
//!
//! Enforces authorization decisions at navigation time.
//!
//! - `route` - the [`RouteGuard`] and its outcomes
//! - `middleware` - Axum middleware mapping outcomes to HTTP responses

pub mod middleware;
pub mod route;

pub use middleware::{forbidden_page, route_guard};
pub use route::{return_target, ForbiddenView, GuardConfig, GuardOutcome, RouteGuard, NEXT_PARAM};
