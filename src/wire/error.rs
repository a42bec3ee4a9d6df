//! Wire decoding error types.

use thiserror::Error;

/// Errors produced while decoding a config record stream.
///
/// Any of these fails the decode as a whole; no partial batch is returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The underlying reader failed or the stream ended early.
    #[error("config stream read failed")]
    Io(#[source] std::io::Error),

    /// The stream is not well-formed CBOR.
    #[error("malformed config stream at byte {0}")]
    Syntax(usize),

    /// The stream is valid CBOR but does not match the envelope shape
    /// (wrong top-level type, wrong field arity, wrong field types).
    #[error("config stream has unexpected shape: {reason}")]
    Schema {
        offset: Option<usize>,
        reason: String,
    },

    /// Nesting depth exceeded the codec's recursion limit.
    #[error("config stream nesting exceeds recursion limit")]
    RecursionLimit,
}

impl From<ciborium::de::Error<std::io::Error>> for DecodeError {
    fn from(err: ciborium::de::Error<std::io::Error>) -> Self {
        use ciborium::de::Error;
        match err {
            Error::Io(e) => Self::Io(e),
            Error::Syntax(offset) => Self::Syntax(offset),
            Error::Semantic(offset, reason) => Self::Schema { offset, reason },
            Error::RecursionLimitExceeded => Self::RecursionLimit,
        }
    }
}
