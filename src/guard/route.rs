// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Navigation gate.
//!
//! ## Outcomes
//!
//! | Session state                  | Outcome                |
//! |--------------------------------|------------------------|
//! | store still initializing       | `Pending`              |
//! | signed in, visiting login page | `RedirectToHome`       |
//! | `DeniedUnauthenticated`        | `RedirectToLogin`      |
//! | `DeniedForbidden`              | `RedirectToForbidden`  |
//! | `Allowed`                      | `Render`               |
//!
//! Evaluation is synchronous and has no side effects, so it can run on every
//! navigation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use url::form_urlencoded;

use crate::auth::Role;
use crate::policy::pattern::normalize;
use crate::policy::{can_access_at, AuthorizationDecision, PolicyTable};
use crate::session::{Session, SessionState};

/// Query parameter carrying the page to return to after login.
pub const NEXT_PARAM: &str = "next";

const FORBIDDEN_MESSAGE: &str = "You do not have permission to view this page.";

/// Where the guard sends users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    pub login_path: String,
    pub forbidden_path: String,
    /// Landing page for signed-in users who open the login page
    pub home_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            forbidden_path: "/unauthorized".to_string(),
            home_path: "/profile".to_string(),
        }
    }
}

/// What to do with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session not resolved yet; show a loading indicator
    Pending,
    Render,
    RedirectToLogin { location: String },
    RedirectToForbidden { location: String },
    RedirectToHome { location: String },
}

impl GuardOutcome {
    /// Redirect target, if the outcome is a redirect.
    pub fn location(&self) -> Option<&str> {
        match self {
            GuardOutcome::RedirectToLogin { location }
            | GuardOutcome::RedirectToForbidden { location }
            | GuardOutcome::RedirectToHome { location } => Some(location),
            GuardOutcome::Pending | GuardOutcome::Render => None,
        }
    }
}

/// Content of the "not authorized" page.
///
/// Shows the user's own roles but never what the resource requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForbiddenView {
    pub message: String,
    pub current_roles: Vec<Role>,
}

/// Gate evaluated on every navigation.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: watch::Receiver<SessionState>,
    policy: Arc<PolicyTable>,
    config: Arc<GuardConfig>,
}

impl RouteGuard {
    /// Guard driven by a session store subscription.
    pub fn new(session: watch::Receiver<SessionState>, policy: Arc<PolicyTable>) -> Self {
        Self::with_config(session, policy, GuardConfig::default())
    }

    pub fn with_config(
        session: watch::Receiver<SessionState>,
        policy: Arc<PolicyTable>,
        config: GuardConfig,
    ) -> Self {
        Self {
            session,
            policy,
            config: Arc::new(config),
        }
    }

    /// Decide what happens when navigating to `resource`.
    pub fn check(&self, resource: &str) -> GuardOutcome {
        self.check_at(resource, Utc::now())
    }

    /// [`check`](Self::check) evaluated at `now`.
    pub fn check_at(&self, resource: &str, now: DateTime<Utc>) -> GuardOutcome {
        let Some(session) = self.current() else {
            return GuardOutcome::Pending;
        };

        if normalize(resource) == normalize(&self.config.login_path)
            && session.is_authenticated_at(now)
        {
            return GuardOutcome::RedirectToHome {
                location: self.config.home_path.clone(),
            };
        }

        match can_access_at(&session, &self.policy, resource, now) {
            AuthorizationDecision::Allowed => GuardOutcome::Render,
            AuthorizationDecision::DeniedUnauthenticated => GuardOutcome::RedirectToLogin {
                location: self.login_location(resource),
            },
            AuthorizationDecision::DeniedForbidden => GuardOutcome::RedirectToForbidden {
                location: self.config.forbidden_path.clone(),
            },
        }
    }

    /// Content for the "not authorized" page.
    pub fn forbidden_view(&self) -> ForbiddenView {
        let current_roles: Vec<Role> = self
            .current()
            .filter(Session::is_authenticated)
            .map(|session| session.roles().into_iter().collect())
            .unwrap_or_default();

        ForbiddenView {
            message: FORBIDDEN_MESSAGE.to_string(),
            current_roles,
        }
    }

    fn current(&self) -> Option<Session> {
        self.session.borrow().session().cloned()
    }

    fn login_location(&self, resource: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(NEXT_PARAM, resource)
            .finish();
        format!("{}?{query}", self.config.login_path)
    }
}

/// Page to return to after login, read from the login page's query string.
///
/// Only local absolute paths are accepted, so `next` cannot send the user
/// to another site.
pub fn return_target(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == NEXT_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|target| is_local_path(target))
}

fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}
