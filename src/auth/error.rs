// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

/// Failure to read claims out of a bearer credential.
///
/// Never surfaced to the UI: the session store turns either variant into
/// the empty session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Token does not have exactly three dot-separated segments
    #[error("Token is malformed")]
    MalformedToken,
    /// Payload segment is not base64url-encoded JSON object
    #[error("Token payload is malformed")]
    MalformedPayload,
}

impl DecodeError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            DecodeError::MalformedToken => "malformed_token",
            DecodeError::MalformedPayload => "malformed_payload",
        }
    }
}

/// Error reported by the external authentication service.
///
/// The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthServiceError {
    pub message: String,
}

impl AuthServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// The authentication service refused the credentials
    #[error("{0}")]
    AuthenticationFailed(String),
    /// The service answered with a token whose claims cannot be read
    #[error("Authentication service returned an unreadable credential: {0}")]
    UnusableCredential(DecodeError),
    /// The service answered with a token that has already expired
    #[error("Authentication service returned an expired credential")]
    CredentialExpired,
    /// A logout or a newer login happened while this attempt was in flight
    #[error("Login attempt was superseded")]
    Superseded,
}

impl LoginError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            LoginError::AuthenticationFailed(_) => "authentication_failed",
            LoginError::UnusableCredential(_) => "unusable_credential",
            LoginError::CredentialExpired => "credential_expired",
            LoginError::Superseded => "superseded",
        }
    }
}

impl From<AuthServiceError> for LoginError {
    fn from(e: AuthServiceError) -> Self {
        LoginError::AuthenticationFailed(e.message)
    }
}
