use alloy_primitives::{Address, B256};
use proptest::prelude::*;

use wen_oracle::{
    pack, unpack, DigestSigner, EcdsaSignature, OracleAttestor, OracleError, OracleSignature,
    ORACLE_SIGNATURE_LEN,
};
use wen_typed_data::{Digest, TypedDataDocument};

const ORDER_JSON: &str = include_str!("../../wen-typed-data/tests/fixtures/order.json");

/// Deterministic stand-in for a wallet: `r` is the digest, `s` its keccak.
struct FixtureSigner(Address);

impl DigestSigner for FixtureSigner {
    type Error = std::convert::Infallible;

    fn address(&self) -> Address {
        self.0
    }

    fn sign_digest(&self, digest: &Digest) -> Result<EcdsaSignature, Self::Error> {
        let s = Digest::keccak(digest.as_bytes());
        Ok(EcdsaSignature::new(
            B256::from(*digest.as_bytes()),
            B256::from(*s.as_bytes()),
            28,
        ))
    }
}

fn cow() -> Address {
    "0xcd2a3d9f938e13cd947ec05abc7fe734df8dd826".parse().unwrap()
}

#[test]
fn block_height_23_survives_pack_and_unpack() {
    let r = B256::repeat_byte(0x01);
    let s = B256::repeat_byte(0x02);
    let bytes = pack(r, s, 27, 23, cow());
    assert_eq!(bytes.len(), ORACLE_SIGNATURE_LEN);

    let sig = unpack(&bytes).unwrap();
    assert_eq!(sig.block_height, 23);
    assert_eq!(sig.attester, cow());
    assert_eq!(sig.signature, EcdsaSignature::new(r, s, 27));
}

#[test]
fn attested_order_binds_the_reference_block_bound_hash() {
    let signing_hash = TypedDataDocument::from_json(ORDER_JSON)
        .unwrap()
        .signing_hash()
        .unwrap();
    let attestor = OracleAttestor::new(FixtureSigner(cow()));
    let sig = attestor.attest(&signing_hash, 23).unwrap();

    let bound = sig.block_bound_hash(&signing_hash);
    assert_eq!(
        bound.to_hex(),
        "0xd909add520114b406b22b3a2a26190b811fbbd9289aa63a27a2829c8f73d25b5"
    );
    assert_eq!(sig.signature.r, B256::from(*bound.as_bytes()));

    let restored: OracleSignature = sig.to_hex().parse().unwrap();
    assert_eq!(restored, sig);
    assert_eq!(&restored.signature.to_bytes()[..], &sig.to_bytes()[..65]);
}

#[test]
fn attesting_a_document_signs_its_block_bound_hash() {
    let document = TypedDataDocument::from_json(ORDER_JSON).unwrap();
    let attestor = OracleAttestor::new(FixtureSigner(cow()));
    let sig = attestor.attest_document(&document, 23).unwrap();

    assert_eq!(
        Digest::from(sig.signature.r).to_hex(),
        "0xd909add520114b406b22b3a2a26190b811fbbd9289aa63a27a2829c8f73d25b5"
    );
    let signing_hash = document.signing_hash().unwrap();
    assert_eq!(sig, attestor.attest(&signing_hash, 23).unwrap());
}

#[test]
fn ecdsa_prefix_is_the_original_signature() {
    let sig = OracleSignature::new(
        EcdsaSignature::new(B256::repeat_byte(7), B256::repeat_byte(8), 27),
        99,
        cow(),
    );
    let wire = sig.to_bytes();
    let ecdsa = EcdsaSignature::from_bytes(&wire[..65]).unwrap();
    assert_eq!(ecdsa, sig.signature);
}

#[test]
fn truncated_wire_form_is_malformed() {
    let bytes = pack(B256::ZERO, B256::ZERO, 27, 1, cow());
    assert_eq!(
        unpack(&bytes[..88]),
        Err(OracleError::MalformedSignature {
            expected: 89,
            actual: 88
        })
    );
}

proptest! {
    /// `unpack(pack(x)) == x` for every field combination.
    #[test]
    fn unpack_inverts_pack(
        r in any::<[u8; 32]>(),
        s in any::<[u8; 32]>(),
        v in any::<u8>(),
        block_height in any::<u32>(),
        attester in any::<[u8; 20]>(),
    ) {
        let (r, s, attester) = (B256::from(r), B256::from(s), Address::from(attester));
        let sig = unpack(&pack(r, s, v, block_height, attester)).unwrap();
        prop_assert_eq!(sig.signature, EcdsaSignature::new(r, s, v));
        prop_assert_eq!(sig.block_height, block_height);
        prop_assert_eq!(sig.attester, attester);
    }

    /// Any length other than 89 is rejected, never truncated or padded.
    #[test]
    fn other_lengths_are_rejected(bytes in prop::collection::vec(any::<u8>(), 0..200)) {
        prop_assume!(bytes.len() != ORACLE_SIGNATURE_LEN);
        let is_malformed = matches!(
            unpack(&bytes),
            Err(OracleError::MalformedSignature { .. })
        );
        prop_assert!(is_malformed);
    }
}
