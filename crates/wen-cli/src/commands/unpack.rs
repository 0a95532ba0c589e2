//! Unpack command implementation.

use serde_json::json;
use wen_oracle::OracleSignature;
use wen_typed_data::Digest;

use crate::output::{format_json, format_rows};

pub fn run(signature: &str, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sig = OracleSignature::from_hex(signature)?;
    let r = Digest::from(sig.signature.r).to_hex();
    let s = Digest::from(sig.signature.s).to_hex();
    let attester = sig.attester.to_checksum(None);

    if json_output {
        let output = json!({
            "r": r,
            "s": s,
            "v": sig.signature.v,
            "block_height": sig.block_height,
            "attester": attester,
        });
        println!("{}", format_json(&output));
    } else {
        let rows = [
            ("R", r),
            ("S", s),
            ("V", sig.signature.v.to_string()),
            ("BLOCK_HEIGHT", sig.block_height.to_string()),
            ("ATTESTER", attester),
        ];
        println!("{}", format_rows(&rows));
    }

    Ok(())
}
