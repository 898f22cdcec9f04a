//! Error types for identifier and path validation.

use thiserror::Error;

/// Errors raised before any filesystem access takes place.
#[derive(Debug, Error)]
pub enum TypesError {
    /// The display name normalizes to an empty or reserved identifier.
    #[error("bad name: {name:?}")]
    BadName { name: String },

    /// A nested-path segment cannot be used to address a directory under the root.
    #[error("bad path segment {segment:?}: {reason}")]
    BadSegment { segment: String, reason: String },

    /// The opaque payload could not be encoded or decoded.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Convenience type alias for this crate.
pub type Result<T> = std::result::Result<T, TypesError>;
