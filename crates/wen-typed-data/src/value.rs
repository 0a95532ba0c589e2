use alloy_primitives::{Address, I256, U256};
use std::collections::BTreeMap;

/// A concrete value for one field.
///
/// The variant must match the declared [`crate::FieldType`]; mismatches are
/// reported as [`crate::TypedDataError::TypeMismatch`] at encode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `address`.
    Address(Address),
    /// `bool`.
    Bool(bool),
    /// `uintN`. Also accepted for `intN` when non-negative and in range.
    Uint(U256),
    /// `intN`.
    Int(I256),
    /// `bytesN`; the length must equal N.
    FixedBytes(Vec<u8>),
    /// `bytes`.
    Bytes(Vec<u8>),
    /// `string`.
    String(String),
    /// Nested record.
    Struct(TypedValue),
    /// `T[]` or `T[n]`.
    Array(Vec<Value>),
}

impl Value {
    /// Short description of the variant, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Bool(_) => "bool",
            Self::Uint(_) => "unsigned integer",
            Self::Int(_) => "signed integer",
            Self::FixedBytes(_) => "fixed bytes",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
        }
    }

    /// Builds a `bytesN` value from a fixed-size array.
    pub fn fixed_bytes<const N: usize>(bytes: [u8; N]) -> Self {
        Self::FixedBytes(bytes.to_vec())
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<I256> for Value {
    fn from(value: I256) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<TypedValue> for Value {
    fn from(value: TypedValue) -> Self {
        Self::Struct(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

/// Field values of one record instance, keyed by field name.
///
/// Every declared field must be present. Extra fields are ignored by the
/// encoder, which only walks declared fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedValue {
    fields: BTreeMap<String, Value>,
}

impl TypedValue {
    /// Creates an empty record value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Number of fields present.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no field is present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<N: Into<String>> FromIterator<(N, Value)> for TypedValue {
    fn from_iter<T: IntoIterator<Item = (N, Value)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}
