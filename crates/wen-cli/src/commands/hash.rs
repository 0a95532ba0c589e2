//! Hash command implementation.

use serde_json::json;
use tracing::debug;
use wen_typed_data::block_bound_hash;

use crate::input::read_document;
use crate::output::{format_json, format_rows};

pub fn run(
    document: Option<String>,
    block_height: Option<u32>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_document(document)?;
    let hashes = document.hashes()?;
    debug!(
        primary_type = %document.primary_type,
        signing_hash = %hashes.signing_hash,
        "hashed document"
    );

    let signing_hash = hashes.signing_hash;
    let bound = block_height.map(|height| (height, block_bound_hash(&signing_hash, height)));

    if json_output {
        let mut output = json!({
            "primary_type": document.primary_type,
            "type_hash": hashes.type_hash,
            "domain_separator": hashes.domain_separator,
            "message_hash": hashes.message_hash,
            "signing_hash": hashes.signing_hash,
        });
        if let Some((height, hash)) = bound {
            output["block_height"] = json!(height);
            output["block_bound_hash"] = json!(hash);
        }
        println!("{}", format_json(&output));
    } else {
        let mut rows = vec![
            ("TYPE_HASH", hashes.type_hash.to_hex()),
            ("DOMAIN_SEPARATOR", hashes.domain_separator.to_hex()),
            ("MESSAGE_HASH", hashes.message_hash.to_hex()),
            ("SIGNING_HASH", hashes.signing_hash.to_hex()),
        ];
        if let Some((height, hash)) = bound {
            rows.push(("BLOCK_HEIGHT", height.to_string()));
            rows.push(("BLOCK_BOUND_HASH", hash.to_hex()));
        }
        println!("{}", format_rows(&rows));
    }

    Ok(())
}
