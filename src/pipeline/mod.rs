//! Ingestion orchestration.
//!
//! [`Ingestor`] drives the upload workflow: dispatch each file on its
//! extension (scan vs. ready-made checklist), merge scans against a looked-up
//! template, sanitize, extract metadata and persist. Files in a batch are
//! processed sequentially and independently; one file's failure is recorded
//! and the rest of the batch continues.

mod traits;

pub use traits::{
    ArtifactStore, EventSink, LogEvents, NoOpEvents, SaveKind, StoreError, TemplateSource,
};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::error::{IngestError, Result};
use crate::merge::MergeEngine;
use crate::model::{ArtifactId, BatchOutcome, ChecklistArtifact};
use crate::parsers::{extract_metadata, parse_scan};

/// One uploaded file: a declared name and its text content. Only the name's
/// extension is inspected to pick a processing path.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Declared file name, extension included
    pub name: String,
    /// File text as uploaded
    pub content: String,
}

impl UploadFile {
    /// Create an upload from a name and its content.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Optional system group ownership applied to every artifact in a batch.
#[derive(Debug, Clone, Default)]
pub struct SystemGroupRef {
    /// Group identifier, when the upload targets a group
    pub id: Option<String>,
    /// Group display title
    pub title: Option<String>,
}

/// Strip tab characters and collapse `">\n<"` sequences left between tags,
/// yielding the text form artifacts are stored and compared in.
#[must_use]
pub fn sanitize_upload(raw: &str) -> String {
    raw.replace('\t', "").replace(">\n<", "><")
}

/// Exit codes for CI integration
pub mod exit_codes {
    /// Every file in the batch succeeded
    pub const SUCCESS: i32 = 0;
    /// One or more files failed
    pub const FAILED_FILES: i32 = 1;
}

/// Upload orchestrator wiring the parsers and merge engine to the
/// collaborator traits.
pub struct Ingestor {
    templates: Box<dyn TemplateSource>,
    store: Box<dyn ArtifactStore>,
    events: Box<dyn EventSink>,
}

impl Ingestor {
    /// Build an ingestor from its three collaborators.
    pub fn new(
        templates: Box<dyn TemplateSource>,
        store: Box<dyn ArtifactStore>,
        events: Box<dyn EventSink>,
    ) -> Self {
        Self {
            templates,
            store,
            events,
        }
    }

    /// Ingest a batch of uploads, which may mix `.ckl` and `.xml` files.
    ///
    /// Files are processed in order. A failed file is tallied with its name
    /// and never aborts the batch. A notification failure after a completed
    /// save counts the file as failed but the saved record stays.
    pub fn ingest_batch(&self, files: &[UploadFile], system_group: &SystemGroupRef) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for file in files {
            match self.ingest_file(file, system_group) {
                Ok(id) => {
                    info!(file = %file.name, id = %id, "ingested checklist");
                    outcome.record_success();
                }
                Err(err) => {
                    error!(file = %file.name, error = %err, "upload failed");
                    outcome.record_failure(file.name.clone());
                }
            }
        }
        outcome
    }

    /// Replace a stored artifact with a re-uploaded checklist or a re-scan.
    ///
    /// A `.xml` upload is merged against the stored checklist itself rather
    /// than a fetched template, with the existing-checklist grading policy.
    /// Creation time, system group and tags carry over from the stored
    /// artifact.
    pub fn update_artifact(&self, id: &ArtifactId, file: &UploadFile) -> Result<ArtifactId> {
        let stored = self
            .store
            .get(id)
            .map_err(|source| IngestError::store("loading artifact", source))?
            .ok_or_else(|| IngestError::NotFound(id.to_string()))?;

        let checklist = self.checklist_from_upload(file, Some(&stored.metadata.raw_checklist))?;
        let sanitized = sanitize_upload(&checklist);
        let metadata = extract_metadata(&sanitized)
            .map_err(|source| IngestError::parse(&file.name, source))?;

        let mut artifact = ChecklistArtifact::new(metadata);
        artifact.created = stored.created;
        artifact.updated_on = Some(Utc::now());
        artifact.system_group_id = stored.system_group_id.clone();
        artifact.system_title = stored.system_title.clone();
        artifact.tags = stored.tags.clone();

        self.store
            .replace(id, &artifact)
            .map_err(|source| IngestError::store("replacing artifact", source))?;
        self.events
            .artifact_saved(id, SaveKind::Updated)
            .map_err(|source| IngestError::store("notifying artifact update", source))?;
        Ok(id.clone())
    }

    fn ingest_file(&self, file: &UploadFile, system_group: &SystemGroupRef) -> Result<ArtifactId> {
        let checklist = self.checklist_from_upload(file, None)?;
        let sanitized = sanitize_upload(&checklist);
        let metadata = extract_metadata(&sanitized)
            .map_err(|source| IngestError::parse(&file.name, source))?;

        let mut artifact = ChecklistArtifact::new(metadata);
        artifact.system_group_id = system_group.id.clone();
        artifact.system_title = system_group.title.clone();

        let id = self
            .store
            .add(&artifact)
            .map_err(|source| IngestError::store("adding artifact", source))?;
        self.events
            .artifact_saved(&id, SaveKind::Created)
            .map_err(|source| IngestError::store("notifying artifact save", source))?;
        if let Some(system_group_id) = system_group.id.as_deref() {
            self.events
                .system_count_changed(system_group_id)
                .map_err(|source| IngestError::store("notifying system count change", source))?;
        }
        Ok(id)
    }

    /// Produce checklist text from one upload.
    ///
    /// `.xml` files parse as SCAP scans and merge into a template: the
    /// stored checklist when updating (`merge_base`), otherwise whatever the
    /// template source returns for the scan's benchmark title. An empty
    /// template is passed through unmerged and fails downstream at metadata
    /// extraction, rejecting the file. `.ckl` files pass through as-is.
    fn checklist_from_upload(
        &self,
        file: &UploadFile,
        merge_base: Option<&str>,
    ) -> Result<String> {
        let name = file.name.to_lowercase();
        if name.ends_with(".xml") {
            let results = parse_scan(&file.content)
                .map_err(|source| IngestError::parse(&file.name, source))?;
            let template = match merge_base {
                Some(stored) => stored.to_string(),
                None => self
                    .templates
                    .template_by_title(&results.title)
                    .map_err(|source| IngestError::store("fetching template", source))?,
            };
            if template.is_empty() {
                warn!(
                    file = %file.name,
                    title = %results.title,
                    "no checklist template for benchmark title"
                );
                return Ok(template);
            }
            let engine = MergeEngine::new().with_new_checklist(merge_base.is_none());
            return engine
                .merge(&results, &template)
                .map_err(|source| IngestError::merge(&file.name, source));
        }
        if name.ends_with(".ckl") {
            return Ok(file.content.clone());
        }
        Err(IngestError::UnsupportedFile(file.name.clone()))
    }
}
