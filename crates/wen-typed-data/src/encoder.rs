//! `encodeData` and `hashStruct`.
//!
//! A record encodes to its type hash followed by one 32-byte word per
//! declared field. Dynamic values (`string`, `bytes`), nested structs and
//! arrays contribute the Keccak-256 of their own encoding, never inline bytes.

use alloy_primitives::U256;
use std::fmt;
use tracing::trace;

use crate::digest::Digest;
use crate::errors::TypedDataError;
use crate::field_type::{FieldType, ScalarType};
use crate::registry::TypeRegistry;
use crate::value::{TypedValue, Value};

/// One 32-byte slot of an encoded record.
pub type Word = [u8; 32];

/// Location of a value inside the record being encoded, for error messages.
#[derive(Debug, Clone)]
pub(crate) struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub(crate) fn root(type_name: &str) -> Self {
        Self {
            segments: vec![type_name.to_string()],
        }
    }

    pub(crate) fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    pub(crate) fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.push_str(&format!("[{index}]"));
        }
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl TypeRegistry {
    /// Encodes `value` as `typeHash || word(field_1) || … || word(field_n)`.
    pub fn encode_data(
        &self,
        type_name: &str,
        value: &TypedValue,
    ) -> Result<Vec<Word>, TypedDataError> {
        encode_record(self, type_name, value, &FieldPath::root(type_name))
    }

    /// Keccak-256 of the concatenated [`TypeRegistry::encode_data`] words.
    pub fn hash_struct(
        &self,
        type_name: &str,
        value: &TypedValue,
    ) -> Result<Digest, TypedDataError> {
        hash_record(self, type_name, value, &FieldPath::root(type_name))
    }
}

fn encode_record(
    registry: &TypeRegistry,
    type_name: &str,
    value: &TypedValue,
    path: &FieldPath,
) -> Result<Vec<Word>, TypedDataError> {
    let record = registry.record(type_name)?;
    let mut words = Vec::with_capacity(record.fields().len() + 1);
    words.push(*record.type_hash().as_bytes());
    for field in record.fields() {
        let field_path = path.push_field(&field.name);
        let field_value = value
            .get(&field.name)
            .ok_or_else(|| TypedDataError::MissingField {
                path: field_path.to_string(),
            })?;
        let word = encode_field(registry, &field.field_type, field_value, &field_path)?;
        words.push(word);
    }
    Ok(words)
}

fn hash_record(
    registry: &TypeRegistry,
    type_name: &str,
    value: &TypedValue,
    path: &FieldPath,
) -> Result<Digest, TypedDataError> {
    let words = encode_record(registry, type_name, value, path)?;
    let digest = Digest::keccak_concat(words.iter().map(|word| word.as_slice()));
    trace!(type_name, struct_hash = %digest, "hashed struct");
    Ok(digest)
}

fn encode_field(
    registry: &TypeRegistry,
    field_type: &FieldType,
    value: &Value,
    path: &FieldPath,
) -> Result<Word, TypedDataError> {
    match (field_type, value) {
        (FieldType::String, Value::String(s)) => Ok(*Digest::keccak(s.as_bytes()).as_bytes()),
        (FieldType::Bytes, Value::Bytes(bytes)) => Ok(*Digest::keccak(bytes).as_bytes()),
        (FieldType::Struct(name), Value::Struct(nested)) => {
            Ok(*hash_record(registry, name, nested, path)?.as_bytes())
        }
        (FieldType::Array(element), Value::Array(items)) => {
            encode_array(registry, element, items, path)
        }
        (FieldType::FixedArray(element, len), Value::Array(items)) => {
            if items.len() != *len {
                let found = format!("array of length {}", items.len());
                return Err(mismatch(path, field_type, found));
            }
            encode_array(registry, element, items, path)
        }
        (FieldType::Scalar(scalar), value) => encode_scalar(*scalar, value, path),
        (expected, found) => Err(mismatch(path, expected, found.kind().to_string())),
    }
}

fn encode_array(
    registry: &TypeRegistry,
    element: &FieldType,
    items: &[Value],
    path: &FieldPath,
) -> Result<Word, TypedDataError> {
    let mut words = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        words.push(encode_field(registry, element, item, &path.push_index(idx))?);
    }
    let digest = Digest::keccak_concat(words.iter().map(|word| word.as_slice()));
    Ok(*digest.as_bytes())
}

/// ABI word for an atomic value.
///
/// Integers and addresses are right-aligned big-endian; `bytesN` is
/// left-aligned and zero-padded.
fn encode_scalar(
    scalar: ScalarType,
    value: &Value,
    path: &FieldPath,
) -> Result<Word, TypedDataError> {
    let expected = FieldType::Scalar(scalar);
    match (scalar, value) {
        (ScalarType::Address, Value::Address(address)) => Ok(address.into_word().0),
        (ScalarType::Bool, Value::Bool(flag)) => {
            let mut word = [0u8; 32];
            word[31] = u8::from(*flag);
            Ok(word)
        }
        (ScalarType::Uint(bits), Value::Uint(n)) => {
            if n.bit_len() > usize::from(bits) {
                return Err(mismatch(path, &expected, format!("{n} (out of range)")));
            }
            Ok(n.to_be_bytes::<32>())
        }
        (ScalarType::Int(bits), Value::Int(n)) => {
            if bits < 256 {
                let limit = U256::from(1u8) << usize::from(bits - 1);
                let magnitude = n.unsigned_abs();
                let in_range = if n.is_negative() {
                    magnitude <= limit
                } else {
                    magnitude < limit
                };
                if !in_range {
                    return Err(mismatch(path, &expected, format!("{n} (out of range)")));
                }
            }
            Ok(n.into_raw().to_be_bytes::<32>())
        }
        (ScalarType::Int(bits), Value::Uint(n)) => {
            if n.bit_len() >= usize::from(bits) {
                return Err(mismatch(path, &expected, format!("{n} (out of range)")));
            }
            Ok(n.to_be_bytes::<32>())
        }
        (ScalarType::FixedBytes(len), Value::FixedBytes(bytes)) => {
            if bytes.len() != usize::from(len) {
                let found = format!("{} bytes", bytes.len());
                return Err(mismatch(path, &expected, found));
            }
            let mut word = [0u8; 32];
            word[..bytes.len()].copy_from_slice(bytes);
            Ok(word)
        }
        (_, found) => Err(mismatch(path, &expected, found.kind().to_string())),
    }
}

fn mismatch(path: &FieldPath, expected: &FieldType, found: String) -> TypedDataError {
    TypedDataError::TypeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        found,
    }
}
