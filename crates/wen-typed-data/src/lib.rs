//! Typed structured-data hashing for Wen signing requests.
//!
//! This crate provides:
//! - A registry of named record types with eagerly computed type hashes
//! - Canonical type strings (`encodeType`) and struct hashing (`hashStruct`)
//! - Domain separators, signing hashes and block-bound hashes
//! - A loader for JSON documents in the `eth_signTypedData_v4` layout
//!
//! ## Quick Start
//!
//! ```rust
//! use alloy_primitives::Address;
//! use wen_typed_data::{Domain, Field, TypeRegistry, TypedValue, Value};
//!
//! let mut registry = TypeRegistry::new();
//! Domain::register(&mut registry)?;
//! registry.define_all([
//!     ("Person", vec![Field::parse("name", "string")?, Field::parse("wallet", "address")?]),
//!     ("Mail", vec![
//!         Field::parse("from", "Person")?,
//!         Field::parse("to", "Person")?,
//!         Field::parse("contents", "string")?,
//!     ]),
//! ])?;
//! assert_eq!(
//!     registry.encode_type("Mail")?,
//!     "Mail(Person from,Person to,string contents)Person(string name,address wallet)"
//! );
//!
//! let person = |name: &str| {
//!     Value::from(TypedValue::new().with("name", name).with("wallet", Address::ZERO))
//! };
//! let mail = TypedValue::new()
//!     .with("from", person("Cow"))
//!     .with("to", person("Bob"))
//!     .with("contents", "Hello, Bob!");
//! let domain = Domain::new("Ether Mail", "1", 1, Address::ZERO);
//! let digest = registry.signing_hash(&domain, "Mail", &mail)?;
//! assert_eq!(digest.to_hex().len(), 66);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`TypeRegistry`] - Record definitions and hashing entry points
//! - [`TypedValue`] / [`Value`] - Concrete field values
//! - [`Domain`] - Signing context hashed into the domain separator
//! - [`TypedDataDocument`] - JSON signing requests
//!
#![deny(missing_docs)]

/// 32-byte keccak digests.
pub mod digest;
/// JSON typed-data documents.
pub mod document;
/// Domain record and domain separator.
pub mod domain;
/// Struct encoding and hashing.
pub mod encoder;
/// Error types.
pub mod errors;
/// Field type expressions.
pub mod field_type;
/// Record type registry.
pub mod registry;
mod resolver;
/// Signing hash and block-bound hash.
pub mod signing;
/// Field values.
pub mod value;

pub use digest::{Digest, DIGEST_LEN};
pub use document::{
    typed_value_from_json, value_from_json, DocumentHashes, JsonField, TypedDataDocument,
};
pub use domain::{Domain, DEFAULT_DOMAIN_TYPE};
pub use encoder::Word;
pub use errors::TypedDataError;
pub use field_type::{FieldType, ScalarType, MAX_ARRAY_DEPTH};
pub use registry::{Field, RecordType, TypeRegistry};
pub use signing::{block_bound_hash, signing_hash, SIGNING_PREFIX};
pub use value::{TypedValue, Value};
