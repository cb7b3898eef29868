//! Merge command handler.
//!
//! One-shot merge of a scan file into a template file, bypassing template
//! lookup and the store. Useful for previewing what ingestion would produce.

use std::fs;

use anyhow::{Context, Result};

use crate::config::MergeConfig;
use crate::merge::MergeEngine;
use crate::parsers::parse_scan;
use crate::pipeline::exit_codes;

/// Run the merge command
pub fn run_merge(config: MergeConfig) -> Result<i32> {
    let scan = fs::read_to_string(&config.scan)
        .with_context(|| format!("reading {}", config.scan.display()))?;
    let template = fs::read_to_string(&config.template)
        .with_context(|| format!("reading {}", config.template.display()))?;

    let results =
        parse_scan(&scan).with_context(|| format!("parsing scan {}", config.scan.display()))?;
    let engine = MergeEngine::new().with_new_checklist(!config.existing);
    let merged = engine
        .merge(&results, &template)
        .with_context(|| format!("merging into {}", config.template.display()))?;

    match &config.output_file {
        Some(path) => {
            fs::write(path, &merged)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{merged}"),
    }
    Ok(exit_codes::SUCCESS)
}
