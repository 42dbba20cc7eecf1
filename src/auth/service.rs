// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication service client.
//!
//! The workload backend exchanges a username and password for a bearer
//! token:
//!
//! ```text
//! POST {base}/auth/login   {"UserName": "...", "PassWord": "..."}
//!   -> {"success": true, "token": "<jwt>", "user": {...}}
//!   -> {"success": false, "message": "..."}
//! POST {base}/auth/logout  Authorization: Bearer <jwt>
//! ```

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::AuthServiceError;

/// Message used when the backend rejects a login without saying why.
const DEFAULT_LOGIN_FAILURE: &str = "Login failed";

/// Result of a successful login exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginGrant {
    /// Bearer token (JWT)
    pub credential: String,

    /// Display profile returned by the backend, if any.
    /// Never used for authorization decisions.
    pub profile: Option<Value>,
}

/// External authentication service.
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a bearer token.
    fn login(
        &self,
        identifier: &str,
        secret: &str,
    ) -> impl Future<Output = Result<LoginGrant, AuthServiceError>> + Send;

    /// Tell the service the credential is no longer in use.
    fn logout(&self, credential: &str) -> impl Future<Output = Result<(), AuthServiceError>> + Send;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "UserName")]
    user_name: &'a str,
    #[serde(rename = "PassWord")]
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<Value>,
}

/// HTTP client for the workload backend's auth endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    /// API base URL, e.g. `http://localhost:4000/api`
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthService {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthServiceError::new(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl AuthService for HttpAuthService {
    async fn login(&self, identifier: &str, secret: &str) -> Result<LoginGrant, AuthServiceError> {
        let response = self
            .client
            .post(self.endpoint("/auth/login"))
            .json(&LoginRequest {
                user_name: identifier,
                password: secret,
            })
            .send()
            .await
            .map_err(|e| AuthServiceError::new(e.to_string()))?;

        let status = response.status();
        let body = match response.json::<LoginResponse>().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(AuthServiceError::new(format!("HTTP {}", status.as_u16())));
            }
            Err(e) => {
                return Err(AuthServiceError::new(format!("Invalid login response: {e}")));
            }
        };

        if !status.is_success() {
            return Err(AuthServiceError::new(
                body.message
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            ));
        }

        if !body.success {
            return Err(AuthServiceError::new(
                body.message
                    .unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_string()),
            ));
        }

        let credential = body
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthServiceError::new("Login response did not include a token"))?;

        Ok(LoginGrant {
            credential,
            profile: body.user,
        })
    }

    async fn logout(&self, credential: &str) -> Result<(), AuthServiceError> {
        let response = self
            .client
            .post(self.endpoint("/auth/logout"))
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| AuthServiceError::new(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthServiceError::new(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        Ok(())
    }
}
