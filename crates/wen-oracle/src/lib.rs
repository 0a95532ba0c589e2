//! Oracle signatures for Wen signing requests.
//!
//! An oracle signs `keccak256(signingHash || be32(blockHeight))` and ships
//! the result as a fixed 89-byte record:
//!
//! ```text
//! r (32) | s (32) | v (1) | blockHeight (4, big-endian) | attester (20)
//! ```
//!
//! Curve arithmetic is not part of this crate. Signing goes through the
//! [`DigestSigner`] trait.
//!
//! ```rust
//! use alloy_primitives::{Address, B256};
//! use wen_oracle::{pack, unpack};
//!
//! let attester = Address::repeat_byte(0xcd);
//! let bytes = pack(B256::repeat_byte(1), B256::repeat_byte(2), 27, 23, attester);
//! let sig = unpack(&bytes)?;
//! assert_eq!(sig.block_height, 23);
//! assert_eq!(sig.attester, attester);
//! # Ok::<(), wen_oracle::OracleError>(())
//! ```
#![deny(missing_docs)]

/// Signature production.
pub mod attestor;
/// 89-byte wire codec.
pub mod codec;
/// Error types.
pub mod errors;
/// ECDSA signature value and signer trait.
pub mod signature;

pub use attestor::OracleAttestor;
pub use codec::{pack, unpack, OracleSignature, ORACLE_SIGNATURE_LEN};
pub use errors::OracleError;
pub use signature::{DigestSigner, EcdsaSignature, ECDSA_SIGNATURE_LEN};
