//! Ingest command handler.
//!
//! Reads the uploaded files, wires the configured template source and store
//! into an [`Ingestor`] and reports the batch outcome. Unreadable files are
//! tallied as failures alongside files the pipeline rejects.

use std::fs;

use anyhow::{Context, Result};
use tracing::warn;

use crate::config::{IngestConfig, TemplatesConfig};
use crate::model::BatchOutcome;
use crate::pipeline::{exit_codes, Ingestor, LogEvents, TemplateSource, UploadFile};
use crate::store::{DirTemplates, FsStore, StaticTemplates};

use super::file_name;

/// Run the ingest command
pub fn run_ingest(config: IngestConfig) -> Result<i32> {
    let templates = build_template_source(&config.templates)?;
    let store = FsStore::open(&config.store_dir)
        .with_context(|| format!("opening artifact store at {}", config.store_dir.display()))?;
    let ingestor = Ingestor::new(templates, Box::new(store), Box::new(LogEvents::new()));

    let mut outcome = BatchOutcome::default();
    let mut uploads = Vec::new();
    for path in &config.files {
        match fs::read_to_string(path) {
            Ok(content) => uploads.push(UploadFile::new(file_name(path), content)),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "unreadable upload");
                outcome.record_failure(file_name(path));
            }
        }
    }

    let batch = ingestor.ingest_batch(&uploads, &config.system_group);
    outcome.successful += batch.successful;
    outcome.failed += batch.failed;
    outcome.failed_uploads.extend(batch.failed_uploads);

    if config.output.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if !config.output.quiet {
        print_outcome(&outcome);
    }

    Ok(if outcome.all_succeeded() {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILED_FILES
    })
}

/// Pick the template source the config asks for: a template directory, the
/// remote service, or the empty source that always misses.
fn build_template_source(config: &TemplatesConfig) -> Result<Box<dyn TemplateSource>> {
    if let Some(dir) = &config.dir {
        let templates = DirTemplates::open(dir)
            .with_context(|| format!("indexing templates in {}", dir.display()))?;
        if templates.is_empty() {
            warn!(dir = %dir.display(), "template directory holds no usable templates");
        }
        return Ok(Box::new(templates));
    }
    if let Some(url) = &config.url {
        #[cfg(feature = "remote")]
        {
            let http = crate::store::HttpTemplates::new(crate::store::HttpTemplatesConfig {
                base_url: url.clone(),
                timeout: std::time::Duration::from_secs(config.timeout_secs),
            })
            .context("building template service client")?;
            return Ok(Box::new(http));
        }
        #[cfg(not(feature = "remote"))]
        {
            let _ = url;
            anyhow::bail!(
                "remote template lookup requires the 'remote' feature; \
                 rebuild with: cargo build --features remote"
            );
        }
    }
    Ok(Box::new(StaticTemplates::new()))
}

fn print_outcome(outcome: &BatchOutcome) {
    println!(
        "Ingested {} of {} files",
        outcome.successful,
        outcome.total()
    );
    if !outcome.failed_uploads.is_empty() {
        println!("Failed:");
        for name in &outcome.failed_uploads {
            println!("  - {name}");
        }
    }
}
