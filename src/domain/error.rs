//! Domain-level errors (no external dependencies)
//!
//! Navigation never fails: absence is a normal value. These errors only
//! come from decoding encoded scalars and from the checked accessors.

use thiserror::Error;

/// Decoding failures of binary-encoded scalars.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid timestamp encoding: {0}")]
    Timestamp(String),

    #[error("invalid WKB geometry: {0}")]
    Geometry(String),
}

/// Failure of a variant-checked scalar accessor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    #[error("value is absent")]
    Absent,

    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot decode {kind}: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: DomainError,
    },
}
