//! Check command implementation.

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;

use plume_core::{AtUri, Cid, Did, Handle, Nsid};

use crate::output;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Values to validate
    #[arg(required = true)]
    pub values: Vec<String>,

    /// Print one JSON object per value
    #[arg(long)]
    pub json: bool,
}

/// What a value parsed as. A dotted name can be both a handle and an NSID.
#[derive(Debug, Serialize)]
struct Checked<'a> {
    value: &'a str,
    kinds: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let mut invalid = 0;

    for value in &args.values {
        let checked = check(value);
        if checked.error.is_some() {
            invalid += 1;
        }

        if args.json {
            output::json(&checked)?;
        } else if let Some(error) = &checked.error {
            output::error(&format!("{}: {}", value, error));
        } else {
            output::success(&format!("{}: {}", value, checked.kinds.join(", ")));
        }
    }

    if invalid > 0 {
        bail!("{} of {} values invalid", invalid, args.values.len());
    }
    Ok(())
}

fn check(value: &str) -> Checked<'_> {
    let (kinds, error) = if value.starts_with("at://") {
        match AtUri::new(value) {
            Ok(uri) if uri.is_record() => (vec!["at-uri", "record"], None),
            Ok(_) => (vec!["at-uri"], None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        }
    } else if value.starts_with("did:") {
        match Did::new(value) {
            Ok(_) => (vec!["did"], None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        }
    } else {
        let mut kinds = Vec::new();
        if Handle::new(value).is_ok() {
            kinds.push("handle");
        }
        if Nsid::new(value).is_ok() {
            kinds.push("nsid");
        }
        if Cid::new(value).is_ok() {
            kinds.push("cid");
        }
        let error = kinds
            .is_empty()
            .then(|| "not a DID, handle, NSID, CID or AT URI".to_string());
        (kinds, error)
    };

    Checked { value, kinds, error }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_identifiers() {
        assert_eq!(check("did:plc:abc123").kinds, ["did"]);
        assert_eq!(check("alice.bsky.social").kinds, ["handle", "nsid"]);
        assert_eq!(
            check("bafyreiao6dcjaspidyacksbr66qomo2wqpweituindrdqp3n3tb2t66wti").kinds,
            ["cid"]
        );
        assert_eq!(
            check("at://did:plc:abc123/app.bsky.feed.post/3kabc").kinds,
            ["at-uri", "record"]
        );
        assert_eq!(check("at://alice.bsky.social").kinds, ["at-uri"]);
    }

    #[test]
    fn reports_errors() {
        assert!(check("did:").error.is_some());
        assert!(check("at://").error.is_some());
        assert!(check("not an identifier").error.is_some());
    }
}
