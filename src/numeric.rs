//! Loose numeric and identifier normalization.
//!
//! Records arriving from the API or from stored plan payloads carry numbers
//! as JSON numbers, numeric strings, or nothing at all, and identifiers as
//! either integers or strings. Every other module funnels those values
//! through here, so "unparsable input becomes zero" and "blank id means no
//! id" each have exactly one definition.

use serde::{Deserialize, Serialize};

/// A numeric field as it appears on the wire: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Num(f64),
    Text(String),
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Num(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Num(value as f64)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// An identifier as it appears on the wire: numeric or string (UUIDs,
/// form-state strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Num(f64),
    Text(String),
}

impl From<i64> for RawId {
    fn from(value: i64) -> Self {
        RawId::Num(value as f64)
    }
}

impl From<&str> for RawId {
    fn from(value: &str) -> Self {
        RawId::Text(value.to_string())
    }
}

/// Coerce a loosely-typed value to a finite number, defaulting to zero.
///
/// A finite number passes through; a non-empty string parsing to a finite
/// float yields the parsed value; everything else (absent, blank,
/// unparsable, non-finite) yields `0.0`.
pub fn to_number(value: Option<&Scalar>) -> f64 {
    match value {
        Some(Scalar::Num(n)) if n.is_finite() => *n,
        Some(Scalar::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return 0.0;
            }
            match trimmed.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => parsed,
                _ => 0.0,
            }
        }
        _ => 0.0,
    }
}

/// Canonical string form of an identifier.
///
/// Absent ids and empty-or-whitespace strings map to `None` (the "no
/// identifier" sentinel); numbers render the way `Display` renders `f64`,
/// so an id of `42.0` and the string `"42"` compare equal.
pub fn normalize_id(value: Option<&RawId>) -> Option<String> {
    match value {
        Some(RawId::Num(n)) => Some(format!("{n}")),
        Some(RawId::Text(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}
