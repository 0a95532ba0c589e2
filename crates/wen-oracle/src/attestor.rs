use tracing::debug;
use wen_typed_data::{block_bound_hash, Digest, TypedDataDocument};

use crate::codec::OracleSignature;
use crate::errors::OracleError;
use crate::signature::DigestSigner;

/// Produces oracle signatures with one signer.
#[derive(Debug, Clone)]
pub struct OracleAttestor<S> {
    signer: S,
}

impl<S: DigestSigner> OracleAttestor<S> {
    /// Wraps a signer.
    pub fn new(signer: S) -> Self {
        Self { signer }
    }

    /// The wrapped signer.
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Signs `signing_hash` bound to `block_height`.
    ///
    /// The signer sees `keccak256(signing_hash || be32(block_height))`, never
    /// the bare signing hash, so the result cannot be replayed at another
    /// height.
    pub fn attest(
        &self,
        signing_hash: &Digest,
        block_height: u32,
    ) -> Result<OracleSignature, OracleError> {
        let digest = block_bound_hash(signing_hash, block_height);
        let attester = self.signer.address();
        debug!(%signing_hash, block_height, %attester, "signing block-bound hash");
        let signature = self
            .signer
            .sign_digest(&digest)
            .map_err(|e| OracleError::Signer(e.to_string()))?;
        Ok(OracleSignature::new(signature, block_height, attester))
    }

    /// Hashes `document` and signs its signing hash bound to `block_height`.
    ///
    /// Schema and value errors surface as [`OracleError::TypedData`] before
    /// the signer is consulted.
    pub fn attest_document(
        &self,
        document: &TypedDataDocument,
        block_height: u32,
    ) -> Result<OracleSignature, OracleError> {
        let signing_hash = document.signing_hash()?;
        self.attest(&signing_hash, block_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::EcdsaSignature;
    use alloy_primitives::{Address, B256};
    use std::cell::RefCell;
    use wen_typed_data::TypedDataError;

    const PING: &str = r#"{
        "types": {
            "EIP712Domain": [{ "name": "name", "type": "string" }],
            "Ping": [{ "name": "nonce", "type": "uint64" }]
        },
        "primaryType": "Ping",
        "domain": { "name": "wen" },
        "message": { "nonce": 9 }
    }"#;

    const DANGLING: &str = r#"{
        "types": {
            "EIP712Domain": [{ "name": "name", "type": "string" }],
            "Ping": [{ "name": "fee", "type": "FeeRate" }]
        },
        "primaryType": "Ping",
        "domain": { "name": "wen" },
        "message": { "fee": {} }
    }"#;

    fn recording_signer() -> RecordingSigner {
        RecordingSigner {
            seen: RefCell::new(Vec::new()),
        }
    }

    /// Records the digests it was asked to sign.
    struct RecordingSigner {
        seen: RefCell<Vec<Digest>>,
    }

    impl DigestSigner for RecordingSigner {
        type Error = String;

        fn address(&self) -> Address {
            Address::repeat_byte(0x42)
        }

        fn sign_digest(&self, digest: &Digest) -> Result<EcdsaSignature, String> {
            self.seen.borrow_mut().push(*digest);
            Ok(EcdsaSignature::new(B256::from(*digest.as_bytes()), B256::ZERO, 27))
        }
    }

    struct FailingSigner;

    impl DigestSigner for FailingSigner {
        type Error = &'static str;

        fn address(&self) -> Address {
            Address::ZERO
        }

        fn sign_digest(&self, _digest: &Digest) -> Result<EcdsaSignature, &'static str> {
            Err("device locked")
        }
    }

    #[test]
    fn signer_sees_the_block_bound_hash() {
        let attestor = OracleAttestor::new(recording_signer());
        let signing_hash = Digest::keccak(b"order");
        let sig = attestor.attest(&signing_hash, 23).unwrap();

        let expected = block_bound_hash(&signing_hash, 23);
        assert_eq!(attestor.signer().seen.borrow().as_slice(), &[expected]);
        assert_eq!(sig.block_bound_hash(&signing_hash), expected);
        assert_eq!(sig.block_height, 23);
        assert_eq!(sig.attester, Address::repeat_byte(0x42));
    }

    #[test]
    fn signer_failure_is_propagated() {
        let err = OracleAttestor::new(FailingSigner)
            .attest(&Digest::keccak(b"order"), 1)
            .unwrap_err();
        assert_eq!(err, OracleError::Signer("device locked".into()));
    }

    #[test]
    fn document_is_hashed_before_signing() {
        let document = TypedDataDocument::from_json(PING).unwrap();
        let attestor = OracleAttestor::new(recording_signer());
        let sig = attestor.attest_document(&document, 7).unwrap();

        let signing_hash = document.signing_hash().unwrap();
        let expected = block_bound_hash(&signing_hash, 7);
        assert_eq!(attestor.signer().seen.borrow().as_slice(), &[expected]);
        assert_eq!(sig.block_bound_hash(&signing_hash), expected);
    }

    #[test]
    fn invalid_document_never_reaches_the_signer() {
        let document = TypedDataDocument::from_json(DANGLING).unwrap();
        let attestor = OracleAttestor::new(recording_signer());
        let err = attestor.attest_document(&document, 7).unwrap_err();

        assert_eq!(
            err,
            OracleError::TypedData(TypedDataError::UnknownFieldType {
                type_name: "Ping".into(),
                field: "fee".into(),
                referenced: "FeeRate".into()
            })
        );
        assert!(attestor.signer().seen.borrow().is_empty());
    }
}
