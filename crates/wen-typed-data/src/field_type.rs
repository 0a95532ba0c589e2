use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::errors::TypedDataError;

/// Deepest array nesting accepted in a type expression (`T[][]...`).
pub const MAX_ARRAY_DEPTH: usize = 16;

/// Fixed-width atomic types, each encoded as a single 32-byte word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// 20-byte account address, right-aligned.
    Address,
    /// Boolean, encoded as 0 or 1.
    Bool,
    /// Unsigned integer of the given bit width (8..=256, multiple of 8).
    Uint(u16),
    /// Signed integer of the given bit width (8..=256, multiple of 8).
    Int(u16),
    /// Fixed-size byte array of the given length (1..=32), left-aligned.
    FixedBytes(u8),
}

impl ScalarType {
    /// Parses an atomic type name such as `uint16` or `bytes32`.
    ///
    /// Returns `Ok(None)` when the name is not atomic at all, and an error when
    /// it looks atomic but carries an impossible width (`uint7`, `bytes33`).
    pub fn parse(name: &str) -> Result<Option<Self>, TypedDataError> {
        match name {
            "address" => return Ok(Some(Self::Address)),
            "bool" => return Ok(Some(Self::Bool)),
            _ => {}
        }
        let invalid = || TypedDataError::InvalidTypeName {
            value: name.to_string(),
        };
        if let Some(caps) = integer_pattern().captures(name) {
            let bits: u16 = caps[2].parse().map_err(|_| invalid())?;
            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(invalid());
            }
            return Ok(Some(if &caps[1] == "uint" {
                Self::Uint(bits)
            } else {
                Self::Int(bits)
            }));
        }
        if let Some(caps) = fixed_bytes_pattern().captures(name) {
            let len: u8 = caps[1].parse().map_err(|_| invalid())?;
            if len == 0 || len > 32 {
                return Err(invalid());
            }
            return Ok(Some(Self::FixedBytes(len)));
        }
        Ok(None)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Bool => f.write_str("bool"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Int(bits) => write!(f, "int{bits}"),
            Self::FixedBytes(len) => write!(f, "bytes{len}"),
        }
    }
}

/// Declared type of a record field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Atomic fixed-width value.
    Scalar(ScalarType),
    /// Dynamic byte string; hashed before encoding.
    Bytes,
    /// Dynamic UTF-8 string; hashed before encoding.
    String,
    /// Reference to another registered record type.
    Struct(String),
    /// Dynamic-length homogeneous list (`T[]`).
    Array(Box<FieldType>),
    /// Fixed-length homogeneous list (`T[n]`).
    FixedArray(Box<FieldType>, usize),
}

impl FieldType {
    /// Parses a type expression as written in a schema.
    ///
    /// Anything that is not atomic, `bytes`, `string` or an array is taken to be
    /// a struct reference; whether it resolves is checked at registration.
    pub fn parse(type_name: &str) -> Result<Self, TypedDataError> {
        let invalid = || TypedDataError::InvalidTypeName {
            value: type_name.to_string(),
        };
        // Suffixes are peeled right to left, so `dims` lists the outermost first.
        let mut base = type_name;
        let mut dims = Vec::new();
        while let Some(open) = base.strip_suffix(']') {
            if dims.len() == MAX_ARRAY_DEPTH {
                return Err(invalid());
            }
            let idx = open.rfind('[').ok_or_else(invalid)?;
            let dim = match &open[idx + 1..] {
                "" => None,
                len => match len.parse::<usize>() {
                    Ok(0) | Err(_) => return Err(invalid()),
                    Ok(n) => Some(n),
                },
            };
            dims.push(dim);
            base = &open[..idx];
        }
        let mut field_type = Self::parse_element(base)?.ok_or_else(invalid)?;
        for dim in dims.into_iter().rev() {
            field_type = match dim {
                None => Self::Array(Box::new(field_type)),
                Some(len) => Self::FixedArray(Box::new(field_type), len),
            };
        }
        Ok(field_type)
    }

    /// Parses an expression without array suffixes. `Ok(None)` means it is
    /// not a usable element name.
    fn parse_element(name: &str) -> Result<Option<Self>, TypedDataError> {
        match name {
            "bytes" => return Ok(Some(Self::Bytes)),
            "string" => return Ok(Some(Self::String)),
            _ => {}
        }
        if let Some(scalar) = ScalarType::parse(name)? {
            return Ok(Some(Self::Scalar(scalar)));
        }
        Ok(is_identifier(name).then(|| Self::Struct(name.to_string())))
    }

    /// Struct referenced by this type, looking through any array layers.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Self::Struct(name) => Some(name),
            Self::Array(element) | Self::FixedArray(element, _) => element.struct_name(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => fmt::Display::fmt(scalar, f),
            Self::Bytes => f.write_str("bytes"),
            Self::String => f.write_str("string"),
            Self::Struct(name) => f.write_str(name),
            Self::Array(element) => write!(f, "{element}[]"),
            Self::FixedArray(element, len) => write!(f, "{element}[{len}]"),
        }
    }
}

impl FromStr for FieldType {
    type Err = TypedDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns true for names usable as record type or field names.
pub(crate) fn is_identifier(value: &str) -> bool {
    identifier_pattern().is_match(value)
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("invalid regex"))
}

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(uint|int)([0-9]{1,3})$").expect("invalid regex"))
}

fn fixed_bytes_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^bytes([0-9]{1,2})$").expect("invalid regex"))
}
