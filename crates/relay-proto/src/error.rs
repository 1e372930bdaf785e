//! Error types for the relay protocol library.
//!
//! [`ProtocolError`] covers the framing layer. Any of these observed while
//! reading from a peer means the byte stream can no longer be trusted, so
//! callers treat them as connection-fatal.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Outgoing text cannot be framed (empty, or larger than the ceiling).
    #[error("invalid message: {reason}")]
    InvalidMessage {
        /// Why the text was refused.
        reason: &'static str,
        /// Payload size in bytes.
        len: usize,
    },

    /// The 4-byte length prefix is not made of ASCII digits.
    #[error("invalid length prefix: {raw:?}")]
    InvalidLength {
        /// The raw header bytes.
        raw: [u8; 4],
    },

    /// The length prefix announced a zero-byte payload.
    #[error("zero-length frame")]
    EmptyFrame,

    /// The stream ended before the announced payload arrived.
    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Length announced by the prefix.
        expected: usize,
        /// Bytes actually received.
        actual: usize,
    },

    /// The payload is not valid UTF-8.
    #[error("invalid UTF-8 in payload at byte {byte_pos}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
    },
}

impl ProtocolError {
    /// Whether the error came from the underlying transport rather than from
    /// malformed bytes.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err: ProtocolError = io_err.into();

        assert!(err.is_io());
        assert_eq!(err.to_string(), "io error: reset by peer");
    }

    #[test]
    fn test_error_display() {
        let err = ProtocolError::InvalidLength { raw: *b"12ab" };
        assert!(err.to_string().contains("invalid length prefix"));
        assert!(!err.is_io());

        let err = ProtocolError::Truncated {
            expected: 10,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "truncated frame: expected 10 bytes, got 3"
        );
    }
}
