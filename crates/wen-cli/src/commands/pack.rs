//! Pack command implementation.

use wen_oracle::{EcdsaSignature, OracleSignature};

use crate::input::{parse_address, parse_word};

pub fn run(
    r: &str,
    s: &str,
    v: u8,
    block_height: u32,
    attester: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let signature = EcdsaSignature::new(parse_word("r", r)?, parse_word("s", s)?, v);
    let attester = parse_address("attester", attester)?;

    let packed = OracleSignature::new(signature, block_height, attester);
    println!("{}", packed.to_hex());
    Ok(())
}
