// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Workload Access - Session Claims & Role-Based Access Control
//!
//! This crate provides the client-side session and authorization model of the
//! academic workload front-end. It decides what a signed-in user may navigate
//! to and see; the backend remains the authority on every request.
//!
//! ## Modules
//!
//! - `auth` - roles, JWT claims decoding and the authentication service client
//! - `session` - durable credential storage and the session store
//! - `policy` - policy table, authorization evaluator and menu filtering
//! - `guard` - route guard and its Axum middleware
//! - `config` - environment configuration
//! - `logging` - tracing subscriber setup

pub mod auth;
pub mod config;
pub mod guard;
pub mod logging;
pub mod policy;
pub mod session;
