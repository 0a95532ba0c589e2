use thiserror::Error;
use wen_typed_data::TypedDataError;

/// Errors raised while packing, unpacking or producing oracle signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Encoded signature has the wrong length.
    #[error("malformed signature: expected {expected} bytes, got {actual}")]
    MalformedSignature {
        /// Required length in bytes.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
    /// Hex text could not be decoded.
    #[error("invalid hex for {context}: {value}")]
    InvalidHex {
        /// What was being decoded.
        context: &'static str,
        /// Offending input.
        value: String,
    },
    /// The external signer failed.
    #[error("signer failed: {0}")]
    Signer(String),
    /// Signature was produced for a block outside the accepted window.
    #[error(
        "signature for block {block_height} is stale at block {current_height} (window {window})"
    )]
    StaleSignature {
        /// Block height carried by the signature.
        block_height: u32,
        /// Height the verifier is at.
        current_height: u32,
        /// Maximum accepted age in blocks.
        window: u32,
    },
    /// A typed-data document could not be hashed.
    #[error(transparent)]
    TypedData(#[from] TypedDataError),
}
