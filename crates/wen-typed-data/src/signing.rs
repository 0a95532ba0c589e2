//! Final digests presented to the external signer.

use crate::digest::Digest;
use crate::domain::Domain;
use crate::errors::TypedDataError;
use crate::registry::TypeRegistry;
use crate::value::TypedValue;

/// `\x19\x01` prefix of every typed-data signing hash.
pub const SIGNING_PREFIX: [u8; 2] = [0x19, 0x01];

/// `keccak256(0x1901 || domainSeparator || messageHash)`.
pub fn signing_hash(domain_separator: &Digest, message_hash: &Digest) -> Digest {
    Digest::keccak_concat([
        SIGNING_PREFIX.as_slice(),
        domain_separator.as_bytes(),
        message_hash.as_bytes(),
    ])
}

/// `keccak256(signingHash || be32(blockHeight))`.
///
/// Oracle attesters sign this instead of the plain signing hash so a
/// signature is only valid for one block height.
pub fn block_bound_hash(signing_hash: &Digest, block_height: u32) -> Digest {
    Digest::keccak_concat([
        signing_hash.as_bytes().as_slice(),
        &block_height.to_be_bytes(),
    ])
}

impl TypeRegistry {
    /// Signing hash of `message` (a `primary_type` record) under `domain`.
    ///
    /// The domain is hashed as [`crate::DEFAULT_DOMAIN_TYPE`], which must be
    /// registered.
    pub fn signing_hash(
        &self,
        domain: &Domain,
        primary_type: &str,
        message: &TypedValue,
    ) -> Result<Digest, TypedDataError> {
        let domain_separator = domain.separator(self)?;
        let message_hash = self.hash_struct(primary_type, message)?;
        Ok(signing_hash(&domain_separator, &message_hash))
    }
}
