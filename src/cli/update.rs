//! Update command handler.
//!
//! Replaces one stored artifact with a re-uploaded checklist or a re-scan.
//! Updates merge against the stored checklist, so no template source is
//! consulted.

use std::fs;

use anyhow::{Context, Result};

use crate::config::UpdateConfig;
use crate::model::ArtifactId;
use crate::pipeline::{exit_codes, Ingestor, LogEvents, UploadFile};
use crate::store::{FsStore, StaticTemplates};

use super::file_name;

/// Run the update command
pub fn run_update(config: UpdateConfig) -> Result<i32> {
    let content = fs::read_to_string(&config.file)
        .with_context(|| format!("reading {}", config.file.display()))?;
    let store = FsStore::open(&config.store_dir)
        .with_context(|| format!("opening artifact store at {}", config.store_dir.display()))?;
    let ingestor = Ingestor::new(
        Box::new(StaticTemplates::new()),
        Box::new(store),
        Box::new(LogEvents::new()),
    );

    let id = ArtifactId::new(config.id.clone());
    let updated = ingestor
        .update_artifact(&id, &UploadFile::new(file_name(&config.file), content))
        .with_context(|| format!("updating artifact {}", config.id))?;

    if config.output.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "id": updated.value() }))?
        );
    } else if !config.output.quiet {
        println!("Updated artifact {updated}");
    }
    Ok(exit_codes::SUCCESS)
}
