//! Types command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use plume_lexicon::{Registry, Slot};

use crate::output;

#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Print one JSON object per type
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct TypeInfo {
    #[serde(rename = "$type")]
    tag: &'static str,
    slots: Vec<Slot>,
}

pub fn run(args: TypesArgs) -> Result<()> {
    let registry = Registry::standard();

    for tag in registry.tags() {
        let info = TypeInfo {
            tag,
            slots: Slot::NESTED
                .iter()
                .copied()
                .filter(|&slot| registry.allows(tag, slot))
                .collect(),
        };

        if args.json {
            output::json(&info)?;
        } else {
            let slots: Vec<_> = info.slots.iter().map(Slot::as_str).collect();
            output::field(tag, &slots.join(", "));
        }
    }

    Ok(())
}
