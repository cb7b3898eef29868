//! Configuration for stig-tools commands.
//!
//! Command handlers in [`crate::cli`] each take one of these config structs;
//! `main` builds them from parsed CLI arguments. Keeping the structs free of
//! `clap` lets library callers drive the same code paths directly.

use std::path::PathBuf;

use crate::pipeline::SystemGroupRef;

/// Default template service URL for the `remote` feature
pub const DEFAULT_TEMPLATE_URL: &str = "http://localhost:8080";

/// Default template service request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Platform data directory for the artifact store, falling back to the
/// working directory when the platform reports none.
#[must_use]
pub fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stig-tools")
        .join("artifacts")
}

/// Where checklist templates come from on the SCAP ingestion path.
#[derive(Debug, Clone)]
pub struct TemplatesConfig {
    /// Directory of `.ckl` templates indexed by benchmark title
    pub dir: Option<PathBuf>,
    /// Base URL of a remote template service
    pub url: Option<String>,
    /// Remote request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: None,
            url: None,
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Output shaping shared by the commands.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON instead of text
    pub json: bool,
    /// Suppress the non-essential text output
    pub quiet: bool,
}

/// Configuration for `stig-tools ingest`.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Files to ingest, in order
    pub files: Vec<PathBuf>,
    /// System group every artifact in the batch belongs to
    pub system_group: SystemGroupRef,
    /// Template lookup configuration
    pub templates: TemplatesConfig,
    /// Artifact store directory
    pub store_dir: PathBuf,
    /// Output shaping
    pub output: OutputConfig,
}

/// Configuration for `stig-tools update`.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Identifier of the stored artifact to replace
    pub id: String,
    /// Replacement upload (`.ckl` or `.xml`)
    pub file: PathBuf,
    /// Artifact store directory
    pub store_dir: PathBuf,
    /// Output shaping
    pub output: OutputConfig,
}

/// Configuration for `stig-tools inspect`.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Checklist or scan file to inspect
    pub file: PathBuf,
    /// Output shaping
    pub output: OutputConfig,
}

/// Configuration for `stig-tools merge`.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// SCAP scan results file
    pub scan: PathBuf,
    /// Checklist template file
    pub template: PathBuf,
    /// Where to write the merged checklist; stdout when unset
    pub output_file: Option<PathBuf>,
    /// Grade with the existing-checklist policy instead of the new-checklist
    /// policy
    pub existing: bool,
}
