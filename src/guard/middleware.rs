// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route guard as Axum middleware.
//!
//! ```rust,ignore
//! let guard = RouteGuard::new(store.subscribe(), Arc::new(PolicyTable::academic()));
//!
//! let app = Router::new()
//!     .route("/subjects", get(subjects_page))
//!     .route("/unauthorized", get(forbidden_page))
//!     .layer(axum::middleware::from_fn_with_state(guard.clone(), route_guard))
//!     .with_state(guard);
//! ```

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};

use super::route::{ForbiddenView, GuardOutcome, RouteGuard};

/// Seconds a client should wait while the session is still loading.
const PENDING_RETRY_AFTER_SECS: &str = "1";

/// Gate each request through the [`RouteGuard`].
///
/// - `Pending` → 503 with `Retry-After`
/// - redirects → 303 with `Location`
/// - `Render` → the wrapped handler
pub async fn route_guard(State(guard): State<RouteGuard>, request: Request, next: Next) -> Response {
    let resource = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path());

    let outcome = guard.check(resource);
    tracing::debug!(resource = %resource, ?outcome, "Route guard");

    match outcome {
        GuardOutcome::Render => next.run(request).await,
        GuardOutcome::Pending => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(RETRY_AFTER, PENDING_RETRY_AFTER_SECS)],
        )
            .into_response(),
        GuardOutcome::RedirectToLogin { location }
        | GuardOutcome::RedirectToForbidden { location }
        | GuardOutcome::RedirectToHome { location } => Redirect::to(&location).into_response(),
    }
}

/// Handler for the "not authorized" page.
pub async fn forbidden_page(State(guard): State<RouteGuard>) -> (StatusCode, Json<ForbiddenView>) {
    (StatusCode::FORBIDDEN, Json(guard.forbidden_view()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header::LOCATION, Request},
        routing::get,
        Router,
    };
    use tokio::sync::watch;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::claims::testing::token_for;
    use crate::policy::PolicyTable;
    use crate::session::{Session, SessionState};

    fn app(state: SessionState) -> (Router, watch::Sender<SessionState>) {
        let (tx, rx) = watch::channel(state);
        let guard = RouteGuard::new(rx, Arc::new(PolicyTable::academic()));
        let router = Router::new()
            .route("/subjects/create", get(|| async { "create subject" }))
            .route("/course-status", get(|| async { "course status" }))
            .route("/unauthorized", get(forbidden_page))
            .layer(axum::middleware::from_fn_with_state(guard.clone(), route_guard))
            .with_state(guard);
        (router, tx)
    }

    fn signed_in(roles: &[&str]) -> SessionState {
        SessionState::Resolved(Session::from_token(token_for("u_1", roles, 3600), None).unwrap())
    }

    async fn get_path(router: Router, path: &str) -> Response {
        router
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn allowed_request_reaches_handler() {
        let (router, _tx) = app(signed_in(&["Professor"]));
        let response = get_path(router, "/course-status").await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"course status");
    }

    #[tokio::test]
    async fn initializing_session_answers_retry_later() {
        let (router, _tx) = app(SessionState::Initializing);
        let response = get_path(router, "/course-status").await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[RETRY_AFTER], "1");
    }

    #[tokio::test]
    async fn signed_out_request_redirects_to_login() {
        let (router, _tx) = app(SessionState::Resolved(Session::empty()));
        let response = get_path(router, "/course-status?term=3").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[LOCATION],
            "/login?next=%2Fcourse-status%3Fterm%3D3"
        );
    }

    #[tokio::test]
    async fn forbidden_request_redirects_to_forbidden_page() {
        let (router, _tx) = app(signed_in(&["Professor"]));
        let response = get_path(router.clone(), "/subjects/create").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/unauthorized");

        let response = get_path(router, "/unauthorized").await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["current_roles"], serde_json::json!(["Professor"]));
        assert!(json.get("required_roles").is_none());
    }

    #[tokio::test]
    async fn guard_sees_session_changes() {
        let (router, tx) = app(signed_in(&["Program Chair"]));
        let response = get_path(router.clone(), "/subjects/create").await;
        assert_eq!(response.status(), StatusCode::OK);

        tx.send_replace(SessionState::Resolved(Session::empty()));
        let response = get_path(router, "/subjects/create").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
