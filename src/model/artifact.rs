//! Checklist artifact types and batch ingestion accounting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Sentinel host name used when a checklist carries no `HOST_NAME`.
pub const UNKNOWN_HOST: &str = "Unknown-Host";

/// Metadata extracted from a checklist, plus the checklist text itself.
///
/// `stig_type` and `stig_release` hold the shortened forms produced by
/// [`crate::normalize`]; `raw_checklist` holds the text exactly as uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Host the checklist was generated for
    pub host_name: String,
    /// Shortened benchmark title (e.g. "WIN SVR 2016 STIG")
    pub stig_type: String,
    /// Shortened release info (e.g. "R3 dated 23 Oct 2020")
    pub stig_release: String,
    /// Benchmark version number as it appears in the checklist
    pub version: String,
    /// Full checklist XML
    pub raw_checklist: String,
}

impl ArtifactMetadata {
    /// Display title, `{host}-{type}-V{version}-{release}` with the text
    /// fields trimmed.
    #[must_use]
    pub fn title(&self) -> String {
        format!(
            "{}-{}-V{}-{}",
            self.host_name.trim(),
            self.stig_type.trim(),
            self.version,
            self.stig_release.trim()
        )
    }
}

/// A stored checklist with its ownership and versioning bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistArtifact {
    /// Extracted metadata and raw checklist text
    pub metadata: ArtifactMetadata,
    /// When the artifact was first ingested
    pub created: DateTime<Utc>,
    /// When the artifact was last replaced, if ever
    pub updated_on: Option<DateTime<Utc>>,
    /// Owning system group, if the upload named one
    pub system_group_id: Option<String>,
    /// Owning system group's display title
    pub system_title: Option<String>,
    /// Free-form labels
    pub tags: Vec<String>,
    /// xxh3 hash of the raw checklist text
    pub content_hash: u64,
}

impl ChecklistArtifact {
    /// Wrap freshly extracted metadata into a new artifact.
    #[must_use]
    pub fn new(metadata: ArtifactMetadata) -> Self {
        let content_hash = xxh3_64(metadata.raw_checklist.as_bytes());
        Self {
            metadata,
            created: Utc::now(),
            updated_on: None,
            system_group_id: None,
            system_title: None,
            tags: Vec::new(),
            content_hash,
        }
    }

    /// Display title of the underlying metadata.
    #[must_use]
    pub fn title(&self) -> String {
        self.metadata.title()
    }
}

/// Opaque identifier a store hands back for a persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Wrap a store-issued identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier string.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-batch ingestion tally. One entry per uploaded file; a failed file
/// never blocks the rest of its batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    /// Files ingested successfully
    pub successful: usize,
    /// Files rejected or failed
    pub failed: usize,
    /// Names of the failed files, in upload order
    pub failed_uploads: Vec<String>,
}

impl BatchOutcome {
    /// Count a successfully ingested file.
    pub fn record_success(&mut self) {
        self.successful += 1;
    }

    /// Count a failed file and remember its name.
    pub fn record_failure(&mut self, file_name: impl Into<String>) {
        self.failed += 1;
        self.failed_uploads.push(file_name.into());
    }

    /// Total files processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.successful + self.failed
    }

    /// True when no file in the batch failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ArtifactMetadata {
        ArtifactMetadata {
            host_name: "DC01".to_string(),
            stig_type: "WIN SVR 2016 STIG".to_string(),
            stig_release: "R3 dated 23 Oct 2020".to_string(),
            version: "1".to_string(),
            raw_checklist: "<CHECKLIST/>".to_string(),
        }
    }

    #[test]
    fn test_title_format() {
        assert_eq!(metadata().title(), "DC01-WIN SVR 2016 STIG-V1-R3 dated 23 Oct 2020");
    }

    #[test]
    fn test_title_trims_text_fields() {
        let mut meta = metadata();
        meta.host_name = " DC01 ".to_string();
        meta.stig_release = "R3 ".to_string();
        assert_eq!(meta.title(), "DC01-WIN SVR 2016 STIG-V1-R3");
    }

    #[test]
    fn test_artifact_hashes_raw_checklist() {
        let artifact = ChecklistArtifact::new(metadata());
        assert_eq!(
            artifact.content_hash,
            xxh3_64("<CHECKLIST/>".as_bytes())
        );
        assert!(artifact.updated_on.is_none());
        assert!(artifact.tags.is_empty());
    }

    #[test]
    fn test_batch_outcome_tally() {
        let mut outcome = BatchOutcome::default();
        outcome.record_success();
        outcome.record_success();
        outcome.record_failure("bad.txt");

        assert_eq!(outcome.successful, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.total(), 3);
        assert!(!outcome.all_succeeded());
        assert_eq!(outcome.failed_uploads, vec!["bad.txt".to_string()]);
    }
}
