//! Error handling for the key engine

use std::fmt;

/// The error type for curve, signature and derivation operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A scalar (private key, nonce or tweak) is zero or not below the group order
    InvalidScalar {
        /// Context where the scalar was rejected
        context: &'static str,
        /// Reason why the scalar is invalid
        reason: &'static str,
    },

    /// A point failed the curve equation or carried a malformed encoding
    InvalidPoint {
        /// Context where the point was rejected
        context: &'static str,
        /// Reason why the point is invalid
        reason: &'static str,
    },

    /// A signature component is zero or not below the group order
    InvalidSignature {
        /// Context where the signature was rejected
        context: &'static str,
        /// Reason why the signature is invalid
        reason: &'static str,
    },

    /// Hardened derivation was requested on a public-only extended key
    HardenedFromPublicOnly {
        /// The offending child index (top bit set)
        index: u32,
    },

    /// A Base58Check payload failed checksum validation
    ChecksumMismatch {
        /// Context where the checksum failed
        context: &'static str,
    },

    /// A serialized key (extended key or WIF) has the wrong length, an
    /// unknown version or prefix, or a field inconsistent with its kind
    MalformedKey {
        /// Reason why the serialization was rejected
        reason: &'static str,
    },

    /// A derivation path string could not be parsed
    InvalidPath {
        /// Reason why the path was rejected
        reason: &'static str,
    },

    /// Length validation error
    Length {
        /// Context where the length error occurred
        context: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },
}

/// Result type for key-engine operations
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidScalar { context, reason } => {
                write!(f, "Invalid scalar in {}: {}", context, reason)
            }
            Error::InvalidPoint { context, reason } => {
                write!(f, "Invalid point in {}: {}", context, reason)
            }
            Error::InvalidSignature { context, reason } => {
                write!(f, "Invalid signature in {}: {}", context, reason)
            }
            Error::HardenedFromPublicOnly { index } => {
                write!(
                    f,
                    "Hardened derivation of index {:#010x} requires a private extended key",
                    index
                )
            }
            Error::ChecksumMismatch { context } => {
                write!(f, "Base58Check checksum mismatch in {}", context)
            }
            Error::MalformedKey { reason } => {
                write!(f, "Malformed key encoding: {}", reason)
            }
            Error::InvalidPath { reason } => {
                write!(f, "Invalid derivation path: {}", reason)
            }
            Error::Length {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Invalid length for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for Error {}

pub mod validate;

#[cfg(test)]
mod tests;
