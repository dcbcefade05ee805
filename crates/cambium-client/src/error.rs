//! Transport errors using the unified error system
//!
//! All transport failures are instances of the core [`Error`] type with the
//! `Transport` variant; this module provides transport-specific
//! constructors so call sites stay uniform.

pub use cambium_core::{Error, Result};

/// Type alias for transport errors.
pub type TransportError = Error;

/// Transport-specific error constructors.
pub struct TransportErrorBuilder;

impl TransportErrorBuilder {
    /// The node could not be reached at all.
    pub fn unreachable(reason: impl std::fmt::Display) -> Error {
        Error::transport(format!("failed to reach node: {reason}"))
    }

    /// The node answered but rejected the submission.
    pub fn rejected(status: impl std::fmt::Display) -> Error {
        Error::transport(format!("node rejected transaction: {status}"))
    }

    /// The node's response could not be parsed.
    pub fn bad_response(reason: impl std::fmt::Display) -> Error {
        Error::transport(format!("failed to parse node response: {reason}"))
    }

    /// Every attempt in the retry budget failed.
    pub fn exhausted(attempts: u32, last_error: impl std::fmt::Display) -> Error {
        Error::transport(format!("all {attempts} attempts exhausted: {last_error}"))
    }
}
