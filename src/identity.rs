//! Typed participant identities.
//!
//! The registries never accept loose numeric or string identities: a national
//! id must parse as a positive integer and an address must be non-empty text.
//! Malformed input fails fast with [`ElectionError::ValidationError`] instead
//! of being silently truncated or coerced.

use crate::error::ElectionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric national identity number (CNIC equivalent).
///
/// Voters and candidates occupy independent identity spaces; uniqueness is
/// enforced per registry, not globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NationalId(u64);

impl NationalId {
    /// Wraps a raw national id, rejecting zero.
    pub fn new(raw: u64) -> Result<Self, ElectionError> {
        if raw == 0 {
            return Err(ElectionError::ValidationError {
                field: "national_id",
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(Self(raw))
    }

    /// Parses a national id from decimal text.  Only ASCII digits are
    /// accepted; anything else is a validation failure, never a coercion.
    pub fn parse(text: &str) -> Result<Self, ElectionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ElectionError::ValidationError {
                field: "national_id",
                reason: "must not be empty".to_string(),
            });
        }
        let raw = trimmed
            .parse::<u64>()
            .map_err(|err| ElectionError::ValidationError {
                field: "national_id",
                reason: err.to_string(),
            })?;
        Self::new(raw)
    }

    /// Returns the raw numeric value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque participant address (wallet/account equivalent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoterAddress(String);

impl VoterAddress {
    /// Wraps an address string, rejecting empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Result<Self, ElectionError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ElectionError::ValidationError {
                field: "address",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the address text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a required free-text field, returning the trimmed value.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ElectionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ElectionError::ValidationError {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_id_rejects_zero() {
        assert!(NationalId::new(0).is_err());
        assert_eq!(NationalId::new(42101).unwrap().value(), 42101);
    }

    #[test]
    fn national_id_parse_rejects_non_digits() {
        assert!(NationalId::parse("42101-7").is_err());
        assert!(NationalId::parse("").is_err());
        assert!(NationalId::parse("  ").is_err());
        assert_eq!(NationalId::parse(" 42101 ").unwrap().value(), 42101);
    }

    #[test]
    fn address_rejects_blank_input() {
        assert!(VoterAddress::new("").is_err());
        assert!(VoterAddress::new("   ").is_err());
        assert_eq!(VoterAddress::new(" 0xa1 ").unwrap().as_str(), "0xa1");
    }

    #[test]
    fn require_text_trims_and_rejects_empty() {
        assert_eq!(require_text("name", " Ayesha ").unwrap(), "Ayesha");
        let err = require_text("city", "  ").unwrap_err();
        assert!(matches!(
            err,
            ElectionError::ValidationError { field: "city", .. }
        ));
    }
}
