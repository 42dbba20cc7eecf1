// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resource identifiers and parameterized patterns.
//!
//! A pattern is a `/`-separated path where a segment written `:name` stands
//! for any single non-empty segment: `/terms/edit/:id` matches
//! `/terms/edit/42` but not `/terms/edit/` or `/terms/edit/42/x`.
//! Identifiers without a leading `/` (`menu:subjects`) are plain names.

use super::error::PolicyError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param,
}

/// Parsed resource identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl ResourcePattern {
    /// Parse a resource identifier.
    pub fn parse(raw: &str) -> Result<Self, PolicyError> {
        let invalid = |reason| PolicyError::InvalidPattern {
            pattern: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(invalid("identifier is empty"));
        }
        if raw.contains(['?', '#']) {
            return Err(invalid("identifier contains a query or fragment"));
        }

        let normalized = normalize(raw);
        let segments = normalized
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some("") => Err(invalid("parameter segment has no name")),
                Some(_) => Ok(Segment::Param),
                None => Ok(Segment::Static(segment.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: normalized.to_string(),
            segments,
        })
    }

    /// Normalized identifier text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern has at least one `:name` segment.
    pub fn is_parameterized(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Param))
    }

    /// Check a concrete resource (already normalized) against the pattern.
    pub fn matches(&self, resource: &str) -> bool {
        let mut parts = resource.split('/');
        for segment in &self.segments {
            let Some(part) = parts.next() else {
                return false;
            };
            let ok = match segment {
                Segment::Static(text) => text == part,
                Segment::Param => !part.is_empty(),
            };
            if !ok {
                return false;
            }
        }
        parts.next().is_none()
    }
}

impl std::fmt::Display for ResourcePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Reduce a concrete resource to the form patterns are matched against.
///
/// Drops any query string or fragment and a single trailing `/`
/// (the root `/` is kept).
pub fn normalize(resource: &str) -> &str {
    let path = resource
        .split(['?', '#'])
        .next()
        .unwrap_or(resource);
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}
