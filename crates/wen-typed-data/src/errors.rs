use thiserror::Error;

/// Errors raised while defining schemas or hashing typed data.
///
/// Every variant describes a schema or programming error. None of them are
/// transient, so callers should surface them rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypedDataError {
    /// A type name was registered again with a different field list.
    #[error("type {name} is already defined with a different field list")]
    DuplicateType {
        /// Name of the conflicting type.
        name: String,
    },
    /// A field references a struct type that is not registered.
    #[error("field {type_name}.{field} references unknown type {referenced}")]
    UnknownFieldType {
        /// Type declaring the field.
        type_name: String,
        /// Field whose type could not be resolved.
        field: String,
        /// Struct name that is missing from the registry.
        referenced: String,
    },
    /// A type or field name is not a valid identifier or type expression.
    #[error("invalid type name '{value}'")]
    InvalidTypeName {
        /// Offending text.
        value: String,
    },
    /// The same field name appears twice in one record type.
    #[error("field {field} is declared more than once in {type_name}")]
    DuplicateField {
        /// Type declaring the field.
        type_name: String,
        /// Repeated field name.
        field: String,
    },
    /// A hash or encoding was requested for a type that was never registered.
    #[error("type {name} is not registered")]
    UnknownType {
        /// Requested type name.
        name: String,
    },
    /// A declared field has no value.
    #[error("missing value for {path}")]
    MissingField {
        /// Path of the missing field (e.g. `Order.makerFee.rate`).
        path: String,
    },
    /// A value does not have the shape its declared type requires.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Path of the offending value.
        path: String,
        /// Declared field type.
        expected: String,
        /// Description of the supplied value.
        found: String,
    },
    /// A hex string could not be decoded.
    #[error("invalid hex for {context}: '{value}'")]
    InvalidHex {
        /// What was being decoded.
        context: &'static str,
        /// Offending text.
        value: String,
    },
    /// A JSON typed-data document could not be read.
    #[error("invalid typed-data document: {0}")]
    InvalidDocument(String),
}
