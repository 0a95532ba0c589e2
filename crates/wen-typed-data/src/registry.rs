use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::digest::Digest;
use crate::errors::TypedDataError;
use crate::field_type::{is_identifier, FieldType};
use crate::resolver::{self, SchemaView};

/// One named, typed member of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// Field name as it appears in the canonical type string.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
}

impl Field {
    /// Creates a field from an already-parsed type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// Creates a field from a type expression such as `FeeRate` or `uint256[]`.
    pub fn parse(name: impl Into<String>, type_name: &str) -> Result<Self, TypedDataError> {
        Ok(Self::new(name, FieldType::parse(type_name)?))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field_type, self.name)
    }
}

/// A registered record type.
///
/// Immutable once registered. The canonical type string and type hash are
/// computed at registration time, since nothing registered later can change
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    name: String,
    fields: Vec<Field>,
    encoded_type: String,
    type_hash: Digest,
}

impl RecordType {
    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Canonical type string (primary type first, dependencies sorted).
    pub fn encoded_type(&self) -> &str {
        &self.encoded_type
    }

    /// Keccak-256 of [`RecordType::encoded_type`].
    pub fn type_hash(&self) -> Digest {
        self.type_hash
    }
}

/// Registry of named record types.
///
/// Populate it once, then share it (e.g. behind an `Arc`) across signing
/// requests. Every read path takes `&self`; only registration needs `&mut`.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, RecordType>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a single record type.
    ///
    /// Every struct it references must already be registered, or be the type
    /// itself. Use [`TypeRegistry::define_all`] for mutually referencing types.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<&RecordType, TypedDataError> {
        let name = name.into();
        self.define_all([(name.clone(), fields)])?;
        self.record(&name)
    }

    /// Registers a batch of record types together.
    ///
    /// Types in the batch may reference each other in any order. The batch is
    /// atomic: on error nothing from it is registered. Re-registering an
    /// identical definition is a no-op.
    pub fn define_all<I, N>(&mut self, definitions: I) -> Result<(), TypedDataError>
    where
        I: IntoIterator<Item = (N, Vec<Field>)>,
        N: Into<String>,
    {
        let mut pending: BTreeMap<String, Vec<Field>> = BTreeMap::new();
        for (name, fields) in definitions {
            let name = name.into();
            validate_definition(&name, &fields)?;
            let identical = self
                .types
                .get(&name)
                .map(|record| record.fields.as_slice())
                .or_else(|| pending.get(&name).map(Vec::as_slice))
                .map(|previous| previous == fields.as_slice());
            match identical {
                Some(true) => continue,
                Some(false) => return Err(TypedDataError::DuplicateType { name }),
                None => {
                    pending.insert(name, fields);
                }
            }
        }

        let staged = Staged {
            registry: self,
            pending: &pending,
        };
        for (name, fields) in &pending {
            for field in fields {
                if let Some(referenced) = field.field_type.struct_name() {
                    if staged.fields(referenced).is_none() {
                        return Err(TypedDataError::UnknownFieldType {
                            type_name: name.clone(),
                            field: field.name.clone(),
                            referenced: referenced.to_string(),
                        });
                    }
                }
            }
        }
        let encoded = pending
            .keys()
            .map(|name| resolver::encode_type(&staged, name))
            .collect::<Result<Vec<_>, _>>()?;

        for ((name, fields), encoded_type) in pending.into_iter().zip(encoded) {
            let type_hash = Digest::keccak(encoded_type.as_bytes());
            debug!(type_name = %name, %type_hash, "registered record type");
            self.types.insert(
                name.clone(),
                RecordType {
                    name,
                    fields,
                    encoded_type,
                    type_hash,
                },
            );
        }
        Ok(())
    }

    /// Looks up a registered type.
    pub fn lookup(&self, name: &str) -> Option<&RecordType> {
        self.types.get(name)
    }

    /// Returns true when `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Every struct type reachable from `primary`, `primary` first, then in
    /// depth-first discovery order.
    pub fn dependencies(&self, primary: &str) -> Result<Vec<String>, TypedDataError> {
        resolver::dependencies(self, primary)
    }

    /// Canonical type string of `primary`.
    pub fn encode_type(&self, primary: &str) -> Result<&str, TypedDataError> {
        Ok(self.record(primary)?.encoded_type())
    }

    /// Type hash of `primary`.
    pub fn type_hash(&self, primary: &str) -> Result<Digest, TypedDataError> {
        Ok(self.record(primary)?.type_hash())
    }

    pub(crate) fn record(&self, name: &str) -> Result<&RecordType, TypedDataError> {
        self.types
            .get(name)
            .ok_or_else(|| TypedDataError::UnknownType {
                name: name.to_string(),
            })
    }
}

impl SchemaView for TypeRegistry {
    fn fields(&self, name: &str) -> Option<&[Field]> {
        self.types.get(name).map(|record| record.fields.as_slice())
    }
}

/// Registry plus a batch that has not been committed yet.
struct Staged<'a> {
    registry: &'a TypeRegistry,
    pending: &'a BTreeMap<String, Vec<Field>>,
}

impl SchemaView for Staged<'_> {
    fn fields(&self, name: &str) -> Option<&[Field]> {
        self.pending
            .get(name)
            .map(Vec::as_slice)
            .or_else(|| self.registry.fields(name))
    }
}

fn validate_definition(name: &str, fields: &[Field]) -> Result<(), TypedDataError> {
    if !is_identifier(name) {
        return Err(TypedDataError::InvalidTypeName {
            value: name.to_string(),
        });
    }
    let mut seen = BTreeSet::new();
    for field in fields {
        if !is_identifier(&field.name) {
            return Err(TypedDataError::InvalidTypeName {
                value: field.name.clone(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(TypedDataError::DuplicateField {
                type_name: name.to_string(),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}
