// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims decoding.
//!
//! The payload is read without verifying the signature. Claims decoded here
//! only drive what the front-end shows and where it navigates; the backend
//! re-validates the credential on every privileged request.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::error::DecodeError;
use super::roles::{Role, RoleSet};

/// Base64url engine that accepts the payload with or without padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims read from a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    /// Subject (`sub`), the stable user identifier
    pub subject_id: Option<String>,

    /// Role names (`roles`), exactly as they appear in the token
    pub roles: Vec<String>,

    /// Expiration (`exp`). `None` means the token carries no usable expiry
    /// and is treated as expired since forever.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Claims {
    /// Check whether the credential has expired at `now`.
    ///
    /// The expiry instant itself counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    /// Check whether the credential has expired according to the wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Roles from the token that name a known [`Role`].
    pub fn known_roles(&self) -> RoleSet {
        self.roles
            .iter()
            .filter_map(|name| {
                let role = Role::parse(name);
                if role.is_none() {
                    tracing::debug!(role = %name, "Ignoring unknown role claim");
                }
                role
            })
            .collect()
    }
}

/// Decode the claims of a JWT without verifying it.
///
/// Accepts any input and never panics. Missing `sub`, `roles` or `exp`
/// fields are not errors; see [`Claims`] for how each is defaulted.
pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::MalformedToken);
    };

    let bytes = PAYLOAD_ENGINE
        .decode(payload)
        .map_err(|_| DecodeError::MalformedPayload)?;
    let Value::Object(payload) =
        serde_json::from_slice::<Value>(&bytes).map_err(|_| DecodeError::MalformedPayload)?
    else {
        return Err(DecodeError::MalformedPayload);
    };

    Ok(Claims {
        subject_id: subject_from(payload.get("sub")),
        roles: roles_from(payload.get("roles")),
        expires_at: expiry_from(payload.get("exp")),
    })
}

fn subject_from(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(sub) if !sub.is_empty() => Some(sub.clone()),
        Value::Number(sub) => Some(sub.to_string()),
        _ => None,
    }
}

/// `roles` must be an array made only of strings; anything else yields no roles.
fn roles_from(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| item.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

/// `exp` is Unix seconds, integral or fractional. Out-of-range values saturate.
fn expiry_from(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let value = value?;

    if let Some(secs) = value.as_i64() {
        return Some(DateTime::from_timestamp(secs, 0).unwrap_or_else(|| saturate(secs)));
    }

    let millis = (value.as_f64()? * 1000.0) as i64;
    Some(DateTime::from_timestamp_millis(millis).unwrap_or_else(|| saturate(millis)))
}

fn saturate(offset: i64) -> DateTime<Utc> {
    if offset > 0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{token_for, token_with_payload};
    use super::*;
    use chrono::Duration;

    #[test]
    fn decodes_standard_claims() {
        let token = token_with_payload(
            r#"{"sub":"u_6401","roles":["Professor","Program Chair"],"exp":1893456000}"#,
        );
        let claims = decode(&token).unwrap();

        assert_eq!(claims.subject_id.as_deref(), Some("u_6401"));
        assert_eq!(claims.roles, vec!["Professor", "Program Chair"]);
        assert_eq!(claims.expires_at, DateTime::from_timestamp(1893456000, 0));
    }

    #[test]
    fn wrong_segment_count_is_malformed_token() {
        assert_eq!(decode("not-a-jwt"), Err(DecodeError::MalformedToken));
        assert_eq!(decode(""), Err(DecodeError::MalformedToken));
        assert_eq!(decode("a.b"), Err(DecodeError::MalformedToken));
        assert_eq!(decode("a.b.c.d"), Err(DecodeError::MalformedToken));
    }

    #[test]
    fn undecodable_payload_is_malformed_payload() {
        assert_eq!(decode("a.!!!.c"), Err(DecodeError::MalformedPayload));
        assert_eq!(decode("a..c"), Err(DecodeError::MalformedPayload));

        // Valid base64, not JSON
        let not_json = token_with_payload("hello");
        assert_eq!(decode(&not_json), Err(DecodeError::MalformedPayload));

        // Valid JSON, not an object
        let array = token_with_payload("[1,2,3]");
        assert_eq!(decode(&array), Err(DecodeError::MalformedPayload));
    }

    #[test]
    fn padded_payload_is_accepted() {
        use base64::engine::general_purpose::URL_SAFE;
        let payload = URL_SAFE.encode(br#"{"sub":"x"}"#);
        assert!(payload.ends_with('='));

        let claims = decode(&format!("h.{payload}.s")).unwrap();
        assert_eq!(claims.subject_id.as_deref(), Some("x"));
    }

    #[test]
    fn missing_fields_default_without_error() {
        let claims = decode(&token_with_payload("{}")).unwrap();

        assert_eq!(claims.subject_id, None);
        assert!(claims.roles.is_empty());
        assert_eq!(claims.expires_at, None);
        assert!(claims.is_expired());
    }

    #[test]
    fn roles_of_wrong_shape_are_empty() {
        for payload in [
            r#"{"roles":"Professor"}"#,
            r#"{"roles":{"0":"Professor"}}"#,
            r#"{"roles":["Professor",7]}"#,
            r#"{"roles":null}"#,
        ] {
            let claims = decode(&token_with_payload(payload)).unwrap();
            assert!(claims.roles.is_empty(), "payload {payload}");
        }
    }

    #[test]
    fn numeric_subject_is_stringified() {
        let claims = decode(&token_with_payload(r#"{"sub":6401}"#)).unwrap();
        assert_eq!(claims.subject_id.as_deref(), Some("6401"));

        let claims = decode(&token_with_payload(r#"{"sub":false}"#)).unwrap();
        assert_eq!(claims.subject_id, None);
    }

    #[test]
    fn fractional_and_non_numeric_expiry() {
        let claims = decode(&token_with_payload(r#"{"exp":1700000000.5}"#)).unwrap();
        assert_eq!(
            claims.expires_at,
            DateTime::from_timestamp_millis(1_700_000_000_500)
        );

        let claims = decode(&token_with_payload(r#"{"exp":"tomorrow"}"#)).unwrap();
        assert_eq!(claims.expires_at, None);
    }

    #[test]
    fn huge_expiry_saturates_to_far_future() {
        let claims = decode(&token_with_payload(r#"{"exp":18446744073709551615}"#)).unwrap();
        assert_eq!(claims.expires_at, Some(DateTime::<Utc>::MAX_UTC));
        assert!(!claims.is_expired());
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let exp = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims {
            subject_id: None,
            roles: Vec::new(),
            expires_at: Some(exp),
        };

        assert!(!claims.is_expired_at(exp - Duration::milliseconds(1)));
        assert!(claims.is_expired_at(exp));
        assert!(claims.is_expired_at(exp + Duration::seconds(1)));
    }

    #[test]
    fn expiry_is_monotonic() {
        let exp = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims {
            subject_id: None,
            roles: Vec::new(),
            expires_at: Some(exp),
        };

        for offset in [-86_400, -60, -1, 0, 1, 60, 86_400] {
            let now = exp + Duration::seconds(offset);
            assert_eq!(claims.is_expired_at(now), offset >= 0, "offset {offset}");
        }
    }

    #[test]
    fn decode_never_panics_on_garbage() {
        for input in ["...", "..", ".", "a.b.", ".b.c", "é.ü.ß", "a.%%%%.c", "a.eyJ.c"] {
            let _ = decode(input);
        }
    }

    #[test]
    fn known_roles_drop_unknown_names() {
        let token = token_for("u1", &["Professor", "Dean", "student"], 3600);
        let claims = decode(&token).unwrap();

        assert_eq!(claims.known_roles(), crate::auth::role_set(&[Role::Professor]));
        assert!(!claims.is_expired());
    }
}
