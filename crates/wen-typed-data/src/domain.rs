use alloy_primitives::{Address, U256};

use crate::digest::Digest;
use crate::errors::TypedDataError;
use crate::field_type::{FieldType, ScalarType};
use crate::registry::{Field, TypeRegistry};
use crate::value::TypedValue;

/// Conventional name of the domain record type.
pub const DEFAULT_DOMAIN_TYPE: &str = "EIP712Domain";

/// Signing context: the application, its version, the chain and the
/// contract that will verify the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Human-readable application name.
    pub name: String,
    /// Current major version of the signing scheme.
    pub version: String,
    /// EIP-155 chain id.
    pub chain_id: U256,
    /// Contract that verifies the signature.
    pub verifying_contract: Address,
}

impl Domain {
    /// Creates a domain.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id: U256::from(chain_id),
            verifying_contract,
        }
    }

    /// Field list of the domain record: name, version, chainId,
    /// verifyingContract, in that order.
    pub fn fields() -> Vec<Field> {
        vec![
            Field::new("name", FieldType::String),
            Field::new("version", FieldType::String),
            Field::new("chainId", FieldType::Scalar(ScalarType::Uint(256))),
            Field::new("verifyingContract", FieldType::Scalar(ScalarType::Address)),
        ]
    }

    /// Registers the domain record under [`DEFAULT_DOMAIN_TYPE`].
    pub fn register(registry: &mut TypeRegistry) -> Result<(), TypedDataError> {
        registry.define(DEFAULT_DOMAIN_TYPE, Self::fields())?;
        Ok(())
    }

    /// The domain as a record value.
    pub fn to_typed_value(&self) -> TypedValue {
        TypedValue::new()
            .with("name", self.name.as_str())
            .with("version", self.version.as_str())
            .with("chainId", self.chain_id)
            .with("verifyingContract", self.verifying_contract)
    }

    /// Domain separator, hashed as [`DEFAULT_DOMAIN_TYPE`].
    pub fn separator(&self, registry: &TypeRegistry) -> Result<Digest, TypedDataError> {
        self.separator_as(registry, DEFAULT_DOMAIN_TYPE)
    }

    /// Domain separator, hashed under a caller-chosen type name that must be
    /// registered with the [`Domain::fields`] layout.
    pub fn separator_as(
        &self,
        registry: &TypeRegistry,
        type_name: &str,
    ) -> Result<Digest, TypedDataError> {
        registry.hash_struct(type_name, &self.to_typed_value())
    }
}
