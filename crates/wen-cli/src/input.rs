//! Argument and document parsing shared by the commands.

use alloy_primitives::{Address, B256};
use std::io::{self, Read};
use thiserror::Error;
use wen_typed_data::TypedDataDocument;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid {field}: {value}")]
    InvalidArgument { field: &'static str, value: String },
}

/// Loads a typed-data document from `path`, or stdin when absent.
pub fn read_document(
    path: Option<String>,
) -> Result<TypedDataDocument, Box<dyn std::error::Error>> {
    let json_str = if let Some(path) = path {
        std::fs::read_to_string(&path).map_err(|source| InputError::Read { path, source })?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| InputError::Read {
                path: "stdin".to_string(),
                source,
            })?;
        buffer
    };

    Ok(TypedDataDocument::from_json(&json_str)?)
}

pub fn parse_word(field: &'static str, value: &str) -> Result<B256, InputError> {
    value.parse().map_err(|_| InputError::InvalidArgument {
        field,
        value: value.to_string(),
    })
}

pub fn parse_address(field: &'static str, value: &str) -> Result<Address, InputError> {
    value.parse().map_err(|_| InputError::InvalidArgument {
        field,
        value: value.to_string(),
    })
}
