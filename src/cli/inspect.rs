//! Inspect command handler.
//!
//! Prints what the parsers see in a single file without touching any store:
//! extracted metadata for a checklist, the title/host/result tally for a
//! scan.

use std::fs;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::config::InspectConfig;
use crate::model::ScapResultSet;
use crate::parsers::{extract_metadata, parse_scan};
use crate::pipeline::{exit_codes, sanitize_upload};

/// Run the inspect command
pub fn run_inspect(config: InspectConfig) -> Result<i32> {
    let content = fs::read_to_string(&config.file)
        .with_context(|| format!("reading {}", config.file.display()))?;

    let name = config.file.to_string_lossy().to_lowercase();
    if name.ends_with(".ckl") {
        inspect_checklist(&config, &content)?;
    } else if name.ends_with(".xml") {
        inspect_scan(&config, &content)?;
    } else {
        bail!(
            "Unsupported file type: {} (expected .ckl or .xml)",
            config.file.display()
        );
    }
    Ok(exit_codes::SUCCESS)
}

#[derive(Serialize)]
struct ChecklistSummary {
    host_name: String,
    stig_type: String,
    stig_release: String,
    version: String,
    title: String,
}

fn inspect_checklist(config: &InspectConfig, content: &str) -> Result<()> {
    let metadata = extract_metadata(&sanitize_upload(content))
        .with_context(|| format!("parsing checklist {}", config.file.display()))?;

    let summary = ChecklistSummary {
        title: metadata.title(),
        host_name: metadata.host_name,
        stig_type: metadata.stig_type,
        stig_release: metadata.stig_release,
        version: metadata.version,
    };

    if config.output.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Host:    {}", summary.host_name);
        println!("Type:    {}", summary.stig_type);
        println!("Release: {}", summary.stig_release);
        println!("Version: {}", summary.version);
        println!("Title:   {}", summary.title);
    }
    Ok(())
}

#[derive(Serialize)]
struct ScanSummary {
    title: String,
    hostname: Option<String>,
    rules: usize,
    passed: usize,
    failed: usize,
    other: usize,
}

impl ScanSummary {
    fn tally(results: &ScapResultSet) -> Self {
        let passed = results.rule_results.iter().filter(|r| r.is_pass()).count();
        let failed = results.rule_results.iter().filter(|r| r.is_fail()).count();
        Self {
            title: results.title.clone(),
            hostname: results.hostname.clone(),
            rules: results.rule_results.len(),
            passed,
            failed,
            other: results.rule_results.len() - passed - failed,
        }
    }
}

fn inspect_scan(config: &InspectConfig, content: &str) -> Result<()> {
    let results =
        parse_scan(content).with_context(|| format!("parsing scan {}", config.file.display()))?;
    let summary = ScanSummary::tally(&results);

    if config.output.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Title:    {}", summary.title);
        println!(
            "Hostname: {}",
            summary.hostname.as_deref().unwrap_or("(not recorded)")
        );
        println!(
            "Rules:    {} ({} pass, {} fail, {} other)",
            summary.rules, summary.passed, summary.failed, summary.other
        );
    }
    Ok(())
}
