use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use wen_typed_data::{block_bound_hash, Digest};

use crate::errors::OracleError;
use crate::signature::EcdsaSignature;

/// Packed oracle signature size in bytes: 89.
pub const ORACLE_SIGNATURE_LEN: usize = 32 + 32 + 1 + 4 + 20;

/// An ECDSA signature bound to a block height and the attesting address.
///
/// Wire layout, no length prefixes:
///
/// ```text
/// r (32) | s (32) | v (1) | blockHeight (4, big-endian) | attester (20)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OracleSignature {
    /// Signature over the block-bound hash.
    pub signature: EcdsaSignature,
    /// Block height the signature is valid for.
    pub block_height: u32,
    /// Address of the oracle that produced the signature.
    pub attester: Address,
}

impl OracleSignature {
    /// Creates an oracle signature from its parts.
    pub fn new(signature: EcdsaSignature, block_height: u32, attester: Address) -> Self {
        Self {
            signature,
            block_height,
            attester,
        }
    }

    /// Serializes to the 89-byte wire form.
    pub fn to_bytes(&self) -> [u8; ORACLE_SIGNATURE_LEN] {
        let mut writer = FieldWriter::<ORACLE_SIGNATURE_LEN>::new();
        writer.put(self.signature.r.as_slice());
        writer.put(self.signature.s.as_slice());
        writer.put(&[self.signature.v]);
        writer.put(&self.block_height.to_be_bytes());
        writer.put(self.attester.as_slice());
        writer.finish()
    }

    /// Deserializes the 89-byte wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OracleError> {
        let mut reader = FieldReader::exact(bytes, ORACLE_SIGNATURE_LEN)?;
        let r = B256::from(reader.take::<32>());
        let s = B256::from(reader.take::<32>());
        let [v] = reader.take::<1>();
        let block_height = u32::from_be_bytes(reader.take::<4>());
        let attester = Address::from(reader.take::<20>());
        Ok(Self {
            signature: EcdsaSignature::new(r, s, v),
            block_height,
            attester,
        })
    }

    /// `0x`-prefixed lowercase hex of the wire form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Parses hex, with or without the `0x` prefix.
    pub fn from_hex(value: &str) -> Result<Self, OracleError> {
        let digits = value.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);
        let bytes = hex::decode(digits).map_err(|_| OracleError::InvalidHex {
            context: "oracle signature",
            value: value.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// The digest the attester signed for `signing_hash` at this height.
    pub fn block_bound_hash(&self, signing_hash: &Digest) -> Digest {
        block_bound_hash(signing_hash, self.block_height)
    }

    /// Rejects signatures older than `window` blocks or from the future.
    pub fn check_freshness(&self, current_height: u32, window: u32) -> Result<(), OracleError> {
        let age = current_height.checked_sub(self.block_height);
        match age {
            Some(age) if age <= window => Ok(()),
            _ => Err(OracleError::StaleSignature {
                block_height: self.block_height,
                current_height,
                window,
            }),
        }
    }
}

impl fmt::Display for OracleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for OracleSignature {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Packs an oracle signature into its 89-byte wire form.
pub fn pack(
    r: B256,
    s: B256,
    v: u8,
    block_height: u32,
    attester: Address,
) -> [u8; ORACLE_SIGNATURE_LEN] {
    OracleSignature::new(EcdsaSignature::new(r, s, v), block_height, attester).to_bytes()
}

/// Unpacks an 89-byte wire form.
pub fn unpack(bytes: &[u8]) -> Result<OracleSignature, OracleError> {
    OracleSignature::from_bytes(bytes)
}

/// Appends fixed-width fields to a buffer of known size.
pub(crate) struct FieldWriter<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> FieldWriter<N> {
    pub(crate) fn new() -> Self {
        Self {
            bytes: [0u8; N],
            len: 0,
        }
    }

    pub(crate) fn put(&mut self, field: &[u8]) {
        self.bytes[self.len..self.len + field.len()].copy_from_slice(field);
        self.len += field.len();
    }

    pub(crate) fn finish(self) -> [u8; N] {
        debug_assert_eq!(self.len, N, "fields do not fill the buffer");
        self.bytes
    }
}

/// Consumes fixed-width fields from a buffer whose length was checked up front.
pub(crate) struct FieldReader<'a> {
    rest: &'a [u8],
}

impl<'a> FieldReader<'a> {
    /// Fails with `MalformedSignature` unless `bytes` is exactly `len` long.
    pub(crate) fn exact(bytes: &'a [u8], len: usize) -> Result<Self, OracleError> {
        if bytes.len() != len {
            return Err(OracleError::MalformedSignature {
                expected: len,
                actual: bytes.len(),
            });
        }
        Ok(Self { rest: bytes })
    }

    /// Takes the next `M` bytes. Callers never read past the checked length.
    pub(crate) fn take<const M: usize>(&mut self) -> [u8; M] {
        let (head, tail) = self.rest.split_at(M);
        self.rest = tail;
        let mut field = [0u8; M];
        field.copy_from_slice(head);
        field
    }
}
