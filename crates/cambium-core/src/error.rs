//! Unified error handling for Cambium
//!
//! A single error type covers the three failure classes the client can hit:
//! body encoding against a schema, cryptographic operations, and network
//! submission. Encoding and crypto failures are deterministic given their
//! inputs and are never retried; transport failures may be retried by the
//! caller within an explicit attempt budget.

use serde::{Deserialize, Serialize};

/// Unified error type for all Cambium operations.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    /// Body encoding or decoding against a schema failed
    #[error("Encoding error: {message}")]
    Encoding {
        /// Description of the schema/data mismatch
        message: String,
    },

    /// Cryptographic operation failed (malformed key, signature, or digest)
    #[error("Crypto error: {message}")]
    Crypto {
        /// Description of the cryptographic failure
        message: String,
    },

    /// Network submission failed after all attempts were exhausted
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },
}

impl Error {
    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Create a crypto error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Standard result type for Cambium operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::encoding("missing field").to_string(),
            "Encoding error: missing field"
        );
        assert_eq!(
            Error::crypto("bad key").to_string(),
            "Crypto error: bad key"
        );
        assert_eq!(
            Error::transport("all attempts exhausted").to_string(),
            "Transport error: all attempts exhausted"
        );
    }
}
