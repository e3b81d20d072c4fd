//! Protocol error types.

use thiserror::Error;

/// Convenience alias for protocol results.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Reasons a radar datagram is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The datagram carried fewer than the four required fields.
    #[error("datagram has {got} fields, need at least 4")]
    TooFewFields {
        /// Number of comma-separated fields present.
        got: usize,
    },

    /// The speed field did not parse as a non-negative integer.
    #[error("speed field {field:?} is not a non-negative integer")]
    InvalidSpeed {
        /// The raw speed field as received.
        field: String,
    },
}
