//! Decode command implementation.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use plume_lexicon::decoder::DEFAULT_MAX_DEPTH;
use plume_lexicon::{DecodeOptions, Decoder, Slot, envelope};

use crate::output;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File to decode ('-' or omitted reads stdin)
    pub file: Option<PathBuf>,

    /// Input is DAG-CBOR instead of JSON
    #[arg(long)]
    pub cbor: bool,

    /// Decode as if the payload appeared in this position (e.g. embed, media)
    #[arg(long, value_parser = parse_slot)]
    pub slot: Option<Slot>,

    /// Maximum envelope nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,

    /// Fail when the top-level payload is not recognized
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: DecodeArgs) -> Result<()> {
    let bytes = read_input(args.file.as_ref())?;
    let decoder = Decoder::standard().with_options(DecodeOptions {
        max_depth: args.max_depth,
    });

    let parsed = if args.cbor {
        envelope::from_cbor(&bytes)
    } else {
        envelope::from_json(&bytes)
    };
    let variant = match (parsed, args.slot) {
        (Ok(value), slot) => decoder.decode_in(&value, slot.unwrap_or(Slot::Any)),
        // Let the decoder wrap the raw bytes.
        (Err(_), _) if args.cbor => decoder.decode_cbor(&bytes),
        (Err(_), _) => decoder.decode_json(&bytes),
    };

    match variant.as_unrecognized() {
        Some(unrecognized) => output::error(&format!(
            "Unrecognized ({}): {}",
            unrecognized.tag().unwrap_or("no $type"),
            unrecognized.reason()
        )),
        None => output::note(&format!("$type: {}", variant.tag().unwrap_or_default())),
    }

    if args.compact {
        output::json(&variant)?;
    } else {
        output::json_pretty(&variant)?;
    }

    if args.strict && variant.is_unrecognized() {
        bail!("Payload was not recognized");
    }
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<Vec<u8>> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read stdin")?;
            Ok(bytes)
        }
    }
}

fn parse_slot(s: &str) -> Result<Slot, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|_| {
        let names: Vec<_> = Slot::NESTED.iter().map(Slot::as_str).collect();
        format!("expected one of: any, {}", names.join(", "))
    })
}
