// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Module
//!
//! Holds the bearer credential across process restarts and derives the
//! current [`Session`] from it.
//!
//! - `storage` - durable key-value persistence of the credential record
//! - `store` - the [`SessionStore`], sole writer of that record

pub mod storage;
pub mod store;

pub use storage::{
    CredentialStorage, FileStorage, MemoryStorage, StorageError, StorageResult, StoredAuth,
    AUTH_STORAGE_KEY,
};
pub use store::{Session, SessionState, SessionStore};
