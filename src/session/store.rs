// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session store: the single source of truth for "who is signed in".
//!
//! ## Lifecycle
//!
//! ```text
//! Initializing --initialize()--> Resolved(Session)
//!                                   |  login()      -> live session
//!                                   |  logout()     -> empty session
//!                                   |  invalidate() -> empty session
//!                                   |  expiry seen  -> empty session
//! ```
//!
//! Every change is published on a `tokio::sync::watch` channel; the route
//! guard and any UI layer subscribe instead of reading storage.
//!
//! Each login attempt takes a generation ticket. `logout()` and
//! `invalidate()` advance the generation, so a login that completes after
//! them is discarded instead of resurrecting the session.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::storage::{CredentialStorage, StorageError, StoredAuth, AUTH_STORAGE_KEY};
use crate::auth::{
    claims, AuthService, AuthServiceError, Claims, DecodeError, LoginError, LoginGrant, RoleSet,
};

/// A bearer token together with what was decoded from it.
#[derive(Debug, Clone, PartialEq)]
struct Credential {
    token: String,
    claims: Claims,
    profile: Option<Value>,
}

/// Current user's authentication state.
///
/// `is_authenticated` is derived on every call: a credential must be present
/// AND unexpired at that instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    credential: Option<Credential>,
}

impl Session {
    /// The signed-out session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a session around `token`, decoding its claims.
    pub fn from_token(token: impl Into<String>, profile: Option<Value>) -> Result<Self, DecodeError> {
        let token = token.into();
        let claims = claims::decode(&token)?;
        Ok(Self {
            credential: Some(Credential {
                token,
                claims,
                profile,
            }),
        })
    }

    /// Whether a credential is held, expired or not.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Whether the session is signed in at `now`.
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.credential
            .as_ref()
            .is_some_and(|c| !c.claims.is_expired_at(now))
    }

    /// Whether the session is signed in according to the wall clock.
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// Known roles carried by the credential.
    pub fn roles(&self) -> RoleSet {
        self.credential
            .as_ref()
            .map(|c| c.claims.known_roles())
            .unwrap_or_default()
    }

    /// Subject id (`sub`) of the credential.
    pub fn subject_id(&self) -> Option<&str> {
        self.credential.as_ref()?.claims.subject_id.as_deref()
    }

    /// Raw bearer token.
    pub fn token(&self) -> Option<&str> {
        self.credential.as_ref().map(|c| c.token.as_str())
    }

    /// Decoded claims.
    pub fn claims(&self) -> Option<&Claims> {
        self.credential.as_ref().map(|c| &c.claims)
    }

    /// Display profile returned at login.
    pub fn profile(&self) -> Option<&Value> {
        self.credential.as_ref()?.profile.as_ref()
    }
}

/// State published by the [`SessionStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Stored credential not read yet
    Initializing,
    /// Session known
    Resolved(Session),
}

impl SessionState {
    /// The resolved session, `None` while initializing.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Initializing => None,
            SessionState::Resolved(session) => Some(session),
        }
    }
}

/// Owner of the current session and its persisted credential.
pub struct SessionStore<A, S> {
    auth: A,
    storage: S,
    state: watch::Sender<SessionState>,
    /// Login generation; also serializes state transitions
    generation: Mutex<u64>,
}

impl<A: AuthService, S: CredentialStorage> SessionStore<A, S> {
    /// Create a store in the `Initializing` state.
    pub fn new(auth: A, storage: S) -> Self {
        let (state, _) = watch::channel(SessionState::Initializing);
        Self {
            auth,
            storage,
            state,
            generation: Mutex::new(0),
        }
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Restore the session persisted by a previous run.
    ///
    /// Never fails: unreadable, undecodable or expired records yield the
    /// empty session (and are removed from storage). Calling it again after
    /// the store has resolved returns the current session.
    pub fn initialize(&self) -> Session {
        let guard = self.lock_generation();
        let resolved = self.state.borrow().session().is_some();
        if resolved {
            drop(guard);
            return self.session();
        }

        let session = self.restore();
        info!(
            authenticated = session.is_authenticated(),
            "Session store initialized"
        );
        self.state.send_replace(SessionState::Resolved(session.clone()));
        session
    }

    /// Current state, with expiry re-checked.
    pub fn state(&self) -> SessionState {
        let state = self.state.borrow().clone();
        match state {
            SessionState::Resolved(session)
                if session.has_credential() && !session.is_authenticated() =>
            {
                if let Some(token) = session.token() {
                    self.expire(token);
                }
                SessionState::Resolved(Session::empty())
            }
            other => other,
        }
    }

    /// Current session; empty while initializing.
    pub fn session(&self) -> Session {
        match self.state() {
            SessionState::Initializing => Session::empty(),
            SessionState::Resolved(session) => session,
        }
    }

    /// `Authorization` header value for API calls, if signed in.
    pub fn authorization_header(&self) -> Option<String> {
        let session = self.session();
        session.token().map(|token| format!("Bearer {token}"))
    }

    /// Sign in through the authentication service.
    ///
    /// On failure the current session is left as it was and the service's
    /// message is returned unchanged. Callers should not start a second
    /// login while one is pending; if a logout happens meanwhile, the result
    /// is discarded with [`LoginError::Superseded`].
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Session, LoginError> {
        let ticket = {
            let mut generation = self.lock_generation();
            *generation += 1;
            *generation
        };

        let result = self.auth.login(identifier, secret).await;
        self.complete_login(ticket, result)
    }

    fn complete_login(
        &self,
        ticket: u64,
        result: Result<LoginGrant, AuthServiceError>,
    ) -> Result<Session, LoginError> {
        let generation = self.lock_generation();
        if *generation != ticket {
            info!(ticket, current = *generation, "Discarding superseded login result");
            return Err(LoginError::Superseded);
        }

        let grant = result.map_err(|e| {
            warn!(error = %e, "Login rejected by authentication service");
            LoginError::from(e)
        })?;

        let session = Session::from_token(grant.credential.clone(), grant.profile.clone())
            .map_err(LoginError::UnusableCredential)?;
        if !session.is_authenticated() {
            return Err(LoginError::CredentialExpired);
        }

        self.persist(&grant);
        self.state.send_replace(SessionState::Resolved(session.clone()));
        drop(generation);

        info!(subject_id = session.subject_id().unwrap_or("-"), "Login succeeded");
        Ok(session)
    }

    /// Sign out.
    ///
    /// The session and the stored credential are cleared first; the service
    /// is then notified with the dropped token. A failed notification is only
    /// logged, and a login started while it is pending is kept.
    pub async fn logout(&self) {
        if let Some(token) = self.clear() {
            if let Err(e) = self.auth.logout(&token).await {
                warn!(error = %e, "Logout notification failed, session already cleared");
            }
        }
        info!("Logged out");
    }

    /// Drop the session because the backend rejected the credential.
    pub fn invalidate(&self) {
        warn!("Credential rejected by backend, clearing session");
        self.clear();
    }

    /// Empty the session and storage, returning the token that was held.
    fn clear(&self) -> Option<String> {
        let mut generation = self.lock_generation();
        *generation += 1;
        let token = self
            .state
            .borrow()
            .session()
            .and_then(Session::token)
            .map(str::to_owned);
        self.discard();
        self.state.send_replace(SessionState::Resolved(Session::empty()));
        token
    }

    /// Clear the session if it still holds the expired `token`.
    fn expire(&self, token: &str) {
        let _generation = self.lock_generation();
        let still_current =
            self.state.borrow().session().and_then(Session::token) == Some(token);
        if still_current {
            info!("Credential expired, clearing session");
            self.discard();
            self.state.send_replace(SessionState::Resolved(Session::empty()));
        }
    }

    fn restore(&self) -> Session {
        let raw = match self.storage.load(AUTH_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Session::empty(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                return Session::empty();
            }
        };

        let record: StoredAuth = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Stored session is corrupt, discarding");
                self.discard();
                return Session::empty();
            }
        };

        let session = match Session::from_token(record.token, record.user) {
            Ok(session) => session,
            Err(e) => {
                debug!(error_code = e.error_code(), "Stored credential is unreadable, discarding");
                self.discard();
                return Session::empty();
            }
        };

        if !session.is_authenticated() {
            info!("Stored credential has expired, discarding");
            self.discard();
            return Session::empty();
        }

        session
    }

    /// Persist the credential; failure leaves the in-memory session valid.
    fn persist(&self, grant: &LoginGrant) {
        let record = StoredAuth {
            token: grant.credential.clone(),
            user: grant.profile.clone(),
        };
        let result = serde_json::to_string(&record)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.save(AUTH_STORAGE_KEY, &raw));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist session, continuing in memory");
        }
    }

    fn discard(&self) {
        if let Err(e) = self.storage.remove(AUTH_STORAGE_KEY) {
            warn!(error = %e, "Failed to remove stored session");
        }
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
