//! Wen CLI - typed-data hashing and oracle signature tooling.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{encode_type, hash, pack, unpack};

#[derive(Parser)]
#[command(name = "wen")]
#[command(about = "Wen typed-data hashing and oracle signature CLI")]
struct Cli {
    /// Log at debug level unless WEN_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical type string of a record type
    EncodeType {
        /// Typed-data JSON document (or stdin if not provided)
        document: Option<String>,
        /// Record type to encode (default: the document's primaryType)
        #[arg(long = "type")]
        type_name: Option<String>,
    },
    /// Print the type hash, domain separator, message hash and signing hash
    Hash {
        /// Typed-data JSON document (or stdin if not provided)
        document: Option<String>,
        /// Also print the hash an oracle signs at this block height
        #[arg(long)]
        block_height: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pack r, s, v, block height and attester into an oracle signature
    Pack {
        /// 32-byte r value as hex
        #[arg(long)]
        r: String,
        /// 32-byte s value as hex
        #[arg(long)]
        s: String,
        /// Recovery id
        #[arg(long)]
        v: u8,
        /// Block height the signature is bound to
        #[arg(long)]
        block_height: u32,
        /// 20-byte attester address
        #[arg(long)]
        attester: String,
    },
    /// Decode an 89-byte oracle signature
    Unpack {
        /// Oracle signature as hex
        signature: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("WEN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::EncodeType {
            document,
            type_name,
        } => encode_type::run(document, type_name),
        Commands::Hash {
            document,
            block_height,
            json,
        } => hash::run(document, block_height, json),
        Commands::Pack {
            r,
            s,
            v,
            block_height,
            attester,
        } => pack::run(&r, &s, v, block_height, &attester),
        Commands::Unpack { signature, json } => unpack::run(&signature, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
