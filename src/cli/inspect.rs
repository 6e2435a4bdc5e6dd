//! Inspect command implementation.
//!
//! Prints everything the generator derives from one hash as JSON.

use anyhow::{Context, Result};

use crate::cli::args::InspectArgs;
use crate::config::AppConfig;
use crate::identicon::IdenticonGenerator;
use crate::utils::hash::digest_text;

pub fn inspect_hash(args: &InspectArgs, config: &AppConfig) -> Result<()> {
    let generator = IdenticonGenerator::new(config.identicon.clone());
    println!("{}", inspect_json(&generator, args)?);
    Ok(())
}

fn inspect_json(generator: &IdenticonGenerator, args: &InspectArgs) -> Result<String> {
    let hash = if args.text {
        digest_text(&args.hash)
    } else {
        args.hash.to_ascii_lowercase()
    };

    let inspection = generator
        .inspect(&hash, args.all)
        .with_context(|| format!("Failed to inspect `{}`", args.hash))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&inspection)?
    } else {
        serde_json::to_string(&inspection)?
    };
    Ok(json)
}
