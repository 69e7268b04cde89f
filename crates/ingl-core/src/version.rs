//! Version helpers for wire payload schemas.
//!
//! Producers and the on-chain consumer must agree on the layout byte-for-byte,
//! so every schema carries an explicit version and unknown versions are
//! rejected rather than guessed.

use crate::errors::{OnboardError, OnboardResult};

/// Known payload schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadVersion {
    V1,
}

impl PayloadVersion {
    /// Parse a version string (e.g. "v1").
    pub fn parse(s: &str) -> OnboardResult<Self> {
        match s {
            "v1" => Ok(Self::V1),
            _ => Err(OnboardError::invalid_argument(format!(
                "unsupported payload version: {s}"
            ))),
        }
    }

    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

/// Version used by this build when encoding.
pub const CURRENT_PAYLOAD_VERSION: PayloadVersion = PayloadVersion::V1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        let v = PayloadVersion::parse("v1").unwrap();
        assert_eq!(v.as_str(), "v1");
        assert_eq!(v, CURRENT_PAYLOAD_VERSION);
    }

    #[test]
    fn unknown_version_rejected() {
        assert!(PayloadVersion::parse("v2").is_err());
        assert!(PayloadVersion::parse("").is_err());
    }
}
