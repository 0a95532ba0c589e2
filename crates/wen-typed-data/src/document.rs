//! JSON typed-data documents (`{ types, primaryType, domain, message }`).

use alloy_primitives::{Address, B256, I256, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;

use crate::digest::Digest;
use crate::domain::DEFAULT_DOMAIN_TYPE;
use crate::encoder::FieldPath;
use crate::errors::TypedDataError;
use crate::field_type::{FieldType, ScalarType};
use crate::registry::{Field, TypeRegistry};
use crate::signing::signing_hash;
use crate::value::{TypedValue, Value};

/// Field entry of a JSON schema: `{ "name": ..., "type": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonField {
    /// Field name.
    pub name: String,
    /// Type expression.
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A complete signing request in the `eth_signTypedData_v4` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedDataDocument {
    /// Record type definitions, including the domain type.
    pub types: BTreeMap<String, Vec<JsonField>>,
    /// Record type of `message`.
    #[serde(rename = "primaryType")]
    pub primary_type: String,
    /// Domain values, shaped like the domain type.
    pub domain: Json,
    /// Message values, shaped like `primary_type`.
    pub message: Json,
    /// Record type of `domain`. Absent in most documents.
    #[serde(rename = "domainType", default = "default_domain_type")]
    pub domain_type: String,
}

fn default_domain_type() -> String {
    DEFAULT_DOMAIN_TYPE.to_string()
}

/// Every digest derived from one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHashes {
    /// Type hash of the primary type.
    pub type_hash: Digest,
    /// Struct hash of the domain.
    pub domain_separator: Digest,
    /// Struct hash of the message.
    pub message_hash: Digest,
    /// `keccak256(0x1901 || domain_separator || message_hash)`.
    pub signing_hash: Digest,
}

impl TypedDataDocument {
    /// Parses a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, TypedDataError> {
        serde_json::from_str(json).map_err(|e| TypedDataError::InvalidDocument(e.to_string()))
    }

    /// Registers every type of the document in one batch.
    pub fn registry(&self) -> Result<TypeRegistry, TypedDataError> {
        let mut definitions = Vec::with_capacity(self.types.len());
        for (name, fields) in &self.types {
            let fields = fields
                .iter()
                .map(|field| Field::parse(field.name.as_str(), &field.type_name))
                .collect::<Result<Vec<_>, _>>()?;
            definitions.push((name.as_str(), fields));
        }
        let mut registry = TypeRegistry::new();
        registry.define_all(definitions)?;
        Ok(registry)
    }

    /// Domain values checked against the domain type.
    pub fn domain_value(&self, registry: &TypeRegistry) -> Result<TypedValue, TypedDataError> {
        typed_value_from_json(registry, &self.domain_type, &self.domain)
    }

    /// Message values checked against the primary type.
    pub fn message_value(&self, registry: &TypeRegistry) -> Result<TypedValue, TypedDataError> {
        typed_value_from_json(registry, &self.primary_type, &self.message)
    }

    /// Type hash, domain separator, message hash and signing hash.
    pub fn hashes(&self) -> Result<DocumentHashes, TypedDataError> {
        let registry = self.registry()?;
        let domain = self.domain_value(&registry)?;
        let message = self.message_value(&registry)?;
        let domain_separator = registry.hash_struct(&self.domain_type, &domain)?;
        let message_hash = registry.hash_struct(&self.primary_type, &message)?;
        Ok(DocumentHashes {
            type_hash: registry.type_hash(&self.primary_type)?,
            domain_separator,
            message_hash,
            signing_hash: signing_hash(&domain_separator, &message_hash),
        })
    }

    /// Signing hash of the document.
    pub fn signing_hash(&self) -> Result<Digest, TypedDataError> {
        Ok(self.hashes()?.signing_hash)
    }
}

/// Converts a JSON object into a record value of `type_name`.
pub fn typed_value_from_json(
    registry: &TypeRegistry,
    type_name: &str,
    json: &Json,
) -> Result<TypedValue, TypedDataError> {
    record_from_json(registry, type_name, json, &FieldPath::root(type_name))
}

/// Converts a JSON value into a [`Value`] for `field_type`.
///
/// Integers accept JSON numbers, decimal strings and `0x` hex strings.
/// Addresses accept `0x` + 40 hex digits or a decimal number. `bytes`
/// accepts `0x` hex; any other string is taken as its UTF-8 bytes.
pub fn value_from_json(
    registry: &TypeRegistry,
    field_type: &FieldType,
    json: &Json,
) -> Result<Value, TypedDataError> {
    convert(registry, field_type, json, &FieldPath::root("value"))
}

fn record_from_json(
    registry: &TypeRegistry,
    type_name: &str,
    json: &Json,
    path: &FieldPath,
) -> Result<TypedValue, TypedDataError> {
    let record = registry.record(type_name)?;
    let object = json
        .as_object()
        .ok_or_else(|| TypedDataError::TypeMismatch {
            path: path.to_string(),
            expected: type_name.to_string(),
            found: json_kind(json).to_string(),
        })?;
    let mut value = TypedValue::new();
    for field in record.fields() {
        let field_path = path.push_field(&field.name);
        let item = object
            .get(&field.name)
            .ok_or_else(|| TypedDataError::MissingField {
                path: field_path.to_string(),
            })?;
        value.insert(
            field.name.as_str(),
            convert(registry, &field.field_type, item, &field_path)?,
        );
    }
    Ok(value)
}

fn convert(
    registry: &TypeRegistry,
    field_type: &FieldType,
    json: &Json,
    path: &FieldPath,
) -> Result<Value, TypedDataError> {
    let mismatch = || TypedDataError::TypeMismatch {
        path: path.to_string(),
        expected: field_type.to_string(),
        found: json_kind(json).to_string(),
    };
    match field_type {
        FieldType::String => json
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(mismatch),
        FieldType::Bytes => {
            let s = json.as_str().ok_or_else(mismatch)?;
            match s.strip_prefix("0x") {
                Some(digits) => Ok(Value::Bytes(decode_hex(digits, "bytes", s)?)),
                None => Ok(Value::Bytes(s.as_bytes().to_vec())),
            }
        }
        FieldType::Struct(name) => Ok(Value::Struct(record_from_json(registry, name, json, path)?)),
        FieldType::Array(element) | FieldType::FixedArray(element, _) => {
            let items = json.as_array().ok_or_else(mismatch)?;
            let converted = items
                .iter()
                .enumerate()
                .map(|(idx, item)| convert(registry, element, item, &path.push_index(idx)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(converted))
        }
        FieldType::Scalar(scalar) => convert_scalar(*scalar, json, path).ok_or_else(mismatch)?,
    }
}

/// `None` means the JSON shape cannot express the scalar at all.
fn convert_scalar(
    scalar: ScalarType,
    json: &Json,
    path: &FieldPath,
) -> Option<Result<Value, TypedDataError>> {
    match scalar {
        ScalarType::Bool => json.as_bool().map(|flag| Ok(Value::Bool(flag))),
        ScalarType::Uint(_) => parse_unsigned(json).map(|n| n.map(Value::Uint)),
        ScalarType::Int(_) => parse_signed(json).map(|n| n.map(Value::Int)),
        ScalarType::Address => Some(parse_address(json, path)),
        ScalarType::FixedBytes(_) => {
            let s = json.as_str()?;
            let digits = s.strip_prefix("0x")?;
            Some(decode_hex(digits, "fixed bytes", s).map(Value::FixedBytes))
        }
    }
}

fn parse_unsigned(json: &Json) -> Option<Result<U256, TypedDataError>> {
    if let Some(n) = json.as_u64() {
        return Some(Ok(U256::from(n)));
    }
    let s = json.as_str()?.trim();
    let parsed = match s.strip_prefix("0x") {
        Some("") => None,
        Some(digits) => U256::from_str_radix(digits, 16).ok(),
        None if s.is_empty() => None,
        None => U256::from_str_radix(s, 10).ok(),
    };
    Some(parsed.ok_or_else(|| invalid_integer(s)))
}

fn parse_signed(json: &Json) -> Option<Result<I256, TypedDataError>> {
    if let Some(n) = json.as_i64() {
        let s = n.to_string();
        return Some(I256::from_dec_str(&s).map_err(|_| invalid_integer(&s)));
    }
    let s = json.as_str()?.trim();
    let parsed = match s.strip_prefix("0x") {
        Some("") => None,
        Some(digits) => U256::from_str_radix(digits, 16).ok().map(I256::from_raw),
        None if s.trim_start_matches(['-', '+']).is_empty() => None,
        None => I256::from_dec_str(s).ok(),
    };
    Some(parsed.ok_or_else(|| invalid_integer(s)))
}

fn invalid_integer(s: &str) -> TypedDataError {
    TypedDataError::InvalidDocument(format!("invalid integer '{s}'"))
}

fn parse_address(json: &Json, path: &FieldPath) -> Result<Value, TypedDataError> {
    if let Some(s) = json.as_str() {
        let s = s.trim();
        if let Some(digits) = s.strip_prefix("0x") {
            let bytes = decode_hex(digits, "address", s)?;
            if bytes.len() != 20 {
                return Err(TypedDataError::InvalidHex {
                    context: "address",
                    value: s.to_string(),
                });
            }
            return Ok(Value::Address(Address::from_slice(&bytes)));
        }
    }
    // Decimal form: the address is the low 160 bits of the number.
    let n = parse_unsigned(json).ok_or_else(|| TypedDataError::TypeMismatch {
        path: path.to_string(),
        expected: "address".to_string(),
        found: json_kind(json).to_string(),
    })??;
    if n.bit_len() > 160 {
        return Err(TypedDataError::TypeMismatch {
            path: path.to_string(),
            expected: "address".to_string(),
            found: format!("{n} (out of range)"),
        });
    }
    Ok(Value::Address(Address::from_word(B256::from(n.to_be_bytes::<32>()))))
}

fn decode_hex(
    digits: &str,
    context: &'static str,
    original: &str,
) -> Result<Vec<u8>, TypedDataError> {
    hex::decode(digits).map_err(|_| TypedDataError::InvalidHex {
        context,
        value: original.to_string(),
    })
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .define_all([
                (
                    "FeeRate",
                    vec![
                        Field::parse("recipient", "address").unwrap(),
                        Field::parse("rate", "uint16").unwrap(),
                    ],
                ),
                (
                    "Quote",
                    vec![
                        Field::parse("fee", "FeeRate").unwrap(),
                        Field::parse("skew", "int32").unwrap(),
                        Field::parse("memo", "bytes").unwrap(),
                        Field::parse("ids", "uint256[]").unwrap(),
                    ],
                ),
            ])
            .unwrap();
        registry
    }

    #[test]
    fn integers_accept_numbers_decimal_and_hex_strings() {
        let registry = registry();
        let ty = FieldType::parse("uint256").unwrap();
        for json in [json!(255), json!("255"), json!("0xff")] {
            assert_eq!(
                value_from_json(&registry, &ty, &json).unwrap(),
                Value::Uint(U256::from(255u64))
            );
        }
    }

    #[test]
    fn signed_integers_accept_negative_values() {
        let registry = registry();
        let ty = FieldType::parse("int32").unwrap();
        let expected = Value::Int(I256::from_dec_str("-7").unwrap());
        for json in [json!(-7), json!("-7")] {
            assert_eq!(value_from_json(&registry, &ty, &json).unwrap(), expected);
        }
    }

    #[test]
    fn decimal_address_is_right_aligned() {
        let registry = registry();
        let ty = FieldType::parse("address").unwrap();
        let value = value_from_json(&registry, &ty, &json!("1708018751")).unwrap();
        let Value::Address(address) = value else {
            panic!("expected address");
        };
        let mut expected = [0u8; 20];
        expected[16..].copy_from_slice(&1_708_018_751u32.to_be_bytes());
        assert_eq!(address, Address::from(expected));
    }

    #[test]
    fn short_hex_address_is_rejected() {
        let registry = registry();
        let ty = FieldType::parse("address").unwrap();
        let err = value_from_json(&registry, &ty, &json!("0x1234")).unwrap_err();
        assert!(matches!(
            err,
            TypedDataError::InvalidHex {
                context: "address",
                ..
            }
        ));
    }

    #[test]
    fn blank_integer_strings_are_rejected() {
        let registry = registry();
        for name in ["uint256", "int32"] {
            let ty = FieldType::parse(name).unwrap();
            for json in [json!(""), json!("   "), json!("0x"), json!(" 0x ")] {
                let err = value_from_json(&registry, &ty, &json).unwrap_err();
                assert!(
                    matches!(err, TypedDataError::InvalidDocument(_)),
                    "{name} accepted {json}"
                );
            }
        }
        let ty = FieldType::parse("int32").unwrap();
        let err = value_from_json(&registry, &ty, &json!("-")).unwrap_err();
        assert!(matches!(err, TypedDataError::InvalidDocument(_)));
    }

    #[test]
    fn blank_address_is_rejected() {
        let registry = registry();
        let ty = FieldType::parse("address").unwrap();
        let err = value_from_json(&registry, &ty, &json!("")).unwrap_err();
        assert!(matches!(err, TypedDataError::InvalidDocument(_)));

        let err = typed_value_from_json(
            &registry,
            "FeeRate",
            &json!({ "recipient": "  ", "rate": 5 }),
        )
        .unwrap_err();
        assert!(matches!(err, TypedDataError::InvalidDocument(_)));
    }

    #[test]
    fn nested_record_conversion_reports_missing_fields() {
        let registry = registry();
        let err = typed_value_from_json(
            &registry,
            "Quote",
            &json!({
                "fee": { "recipient": "0x0000000000000000000000000000000000000001" },
                "skew": 0,
                "memo": "0x",
                "ids": []
            }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TypedDataError::MissingField {
                path: "Quote.fee.rate".into()
            }
        );
    }

    #[test]
    fn scalar_given_for_struct_is_a_mismatch() {
        let registry = registry();
        let err = typed_value_from_json(
            &registry,
            "Quote",
            &json!({ "fee": 5, "skew": 0, "memo": "0x", "ids": [] }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TypedDataError::TypeMismatch {
                path: "Quote.fee".into(),
                expected: "FeeRate".into(),
                found: "number".into()
            }
        );
    }

    #[test]
    fn bytes_accept_hex_and_plain_text() {
        let registry = registry();
        assert_eq!(
            value_from_json(&registry, &FieldType::Bytes, &json!("0xcafe")).unwrap(),
            Value::Bytes(vec![0xca, 0xfe])
        );
        assert_eq!(
            value_from_json(&registry, &FieldType::Bytes, &json!("wen")).unwrap(),
            Value::Bytes(b"wen".to_vec())
        );
    }

    #[test]
    fn malformed_document_is_reported() {
        let err = TypedDataDocument::from_json(r#"{"types": {}}"#).unwrap_err();
        assert!(matches!(err, TypedDataError::InvalidDocument(_)));
    }
}
