//! Encode-type command implementation.

use crate::input::read_document;

pub fn run(
    document: Option<String>,
    type_name: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_document(document)?;
    let registry = document.registry()?;
    let type_name = type_name.unwrap_or_else(|| document.primary_type.clone());

    println!("{}", registry.encode_type(&type_name)?);
    Ok(())
}
