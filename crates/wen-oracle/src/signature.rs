//! Recoverable ECDSA signatures and the signer seam.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use wen_typed_data::Digest;

use crate::codec::{FieldReader, FieldWriter};
use crate::errors::OracleError;

/// Length of `r || s || v`.
pub const ECDSA_SIGNATURE_LEN: usize = 65;

/// A secp256k1 signature as produced by an Ethereum signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EcdsaSignature {
    /// `r` scalar.
    pub r: B256,
    /// `s` scalar.
    pub s: B256,
    /// Recovery id, usually 27 or 28.
    pub v: u8,
}

impl EcdsaSignature {
    /// Creates a signature from its parts.
    pub fn new(r: B256, s: B256, v: u8) -> Self {
        Self { r, s, v }
    }

    /// `r || s || v`.
    pub fn to_bytes(&self) -> [u8; ECDSA_SIGNATURE_LEN] {
        let mut writer = FieldWriter::<ECDSA_SIGNATURE_LEN>::new();
        writer.put(self.r.as_slice());
        writer.put(self.s.as_slice());
        writer.put(&[self.v]);
        writer.finish()
    }

    /// Parses `r || s || v`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OracleError> {
        let mut reader = FieldReader::exact(bytes, ECDSA_SIGNATURE_LEN)?;
        Ok(Self {
            r: B256::from(reader.take::<32>()),
            s: B256::from(reader.take::<32>()),
            v: reader.take::<1>()[0],
        })
    }
}

/// Signs 32-byte digests on behalf of one address.
///
/// Curve arithmetic lives behind this trait: implementations wrap a local
/// key, a hardware module or a remote signing service.
pub trait DigestSigner {
    /// Failure type of the underlying signer.
    type Error: std::fmt::Display;

    /// Address whose key produces the signatures.
    fn address(&self) -> Address;

    /// Signs `digest` as-is, without any message prefix.
    fn sign_digest(&self, digest: &Digest) -> Result<EcdsaSignature, Self::Error>;
}

impl<S: DigestSigner + ?Sized> DigestSigner for &S {
    type Error = S::Error;

    fn address(&self) -> Address {
        (**self).address()
    }

    fn sign_digest(&self, digest: &Digest) -> Result<EcdsaSignature, Self::Error> {
        (**self).sign_digest(digest)
    }
}
