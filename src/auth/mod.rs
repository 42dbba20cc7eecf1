// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer credentials for the workload front-end.
//!
//! ## Auth Flow
//!
//! 1. The user submits username and password
//! 2. [`AuthService::login`] exchanges them with the backend for a JWT
//! 3. [`claims::decode`] reads the JWT payload locally:
//!    - `sub` → subject id
//!    - `roles` → role names
//!    - `exp` → expiry
//! 4. The session store keeps the JWT; the policy evaluator uses its roles
//!
//! ## Security
//!
//! - The signature is NOT verified here; the backend verifies it on every
//!   request
//! - Decoded roles only gate navigation and menus
//! - Expiry is checked against the local clock with no leeway

pub mod claims;
pub mod error;
pub mod roles;
pub mod service;

pub use claims::{decode, Claims};
pub use error::{AuthServiceError, DecodeError, LoginError};
pub use roles::{role_set, Role, RoleSet};
pub use service::{AuthService, HttpAuthService, LoginGrant};
