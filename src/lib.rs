//! **Checklist ingestion and SCAP merge tooling for DISA STIG workflows.**
//!
//! `stig-tools` ingests DISA STIG Viewer checklists (`.ckl`) and SCAP/XCCDF
//! scan result documents (`.xml`). Scan results are merged into checklist
//! templates, and the graded checklists are stored as artifacts with
//! normalized metadata. It powers both a command-line interface for direct
//! use and a Rust library for programmatic integration.
//!
//! ## Key Features
//!
//! - **Checklist Parsing**: Extracts host and STIG metadata from `.ckl`
//!   uploads, tolerating the layout whitespace STIG Viewer introduces.
//! - **SCAP Result Parsing**: Reads rule results and the scanned hostname
//!   from XCCDF result documents.
//! - **Scan-to-Checklist Merge**: Grades checklist items from XCCDF rule
//!   results, respecting statuses already recorded on existing checklists.
//! - **Metadata Normalization**: Shortens verbose STIG titles and release
//!   strings into compact display forms.
//! - **Pluggable Storage**: Artifact stores and template sources are traits,
//!   with filesystem, in-memory, and HTTP-backed implementations included.
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: A small XML DOM ([`XmlElement`]) plus the checklist and
//!   scan readers built on it. [`parsers::canonicalize`] re-serializes any
//!   document into the single-line form the rest of the crate expects.
//! - **[`merge`]**: Home of the [`MergeEngine`], which applies a
//!   [`ScapResultSet`] to a checklist template.
//! - **[`pipeline`]**: The [`Ingestor`] orchestrates uploads end to end, from
//!   file-type dispatch through merge and storage.
//! - **[`store`]**: Concrete [`ArtifactStore`] and [`TemplateSource`]
//!   implementations.
//! - **[`normalize`]**: STIG type and release shortening tables.
//!
//! ## Getting Started: Ingesting an Upload
//!
//! ```no_run
//! use stig_tools::pipeline::NoOpEvents;
//! use stig_tools::store::{MemoryStore, StaticTemplates};
//! use stig_tools::{Ingestor, SystemGroupRef, UploadFile};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ingestor = Ingestor::new(
//!         Box::new(StaticTemplates::new()),
//!         Box::new(MemoryStore::new()),
//!         Box::new(NoOpEvents),
//!     );
//!
//!     let checklist = std::fs::read_to_string("path/to/host.ckl")?;
//!     let outcome = ingestor.ingest_batch(
//!         &[UploadFile::new("host.ckl", checklist)],
//!         &SystemGroupRef::default(),
//!     );
//!
//!     println!("Ingested {} of {} uploads.", outcome.successful, outcome.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `remote` (default): Enables the HTTP template source backed by
//!   `reqwest`. Disable it for fully offline builds.
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `stig-tools` library crate. The binary of
//! the same name wraps it with `ingest`, `update`, `inspect`, and `merge`
//! subcommands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Doc completeness: # Errors / # Panics sections are not written per fn
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Types like merge::MergeEngine read better with the module prefix kept
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod store;

// Re-export main types for convenience
pub use error::{IngestError, Result};
pub use merge::{MergeEngine, MergeError};
pub use model::{
    ArtifactId, ArtifactMetadata, BatchOutcome, ChecklistArtifact, ScapResultSet, ScapRuleResult,
};
pub use normalize::{shorten_stig_release, shorten_stig_type};
pub use parsers::{
    ParseError, XmlElement, canonicalize, extract_metadata, parse_document, parse_scan,
};
pub use pipeline::{
    ArtifactStore, EventSink, Ingestor, LogEvents, NoOpEvents, SaveKind, StoreError,
    SystemGroupRef, TemplateSource, UploadFile, sanitize_upload,
};
pub use store::{DirTemplates, FsStore, MemoryStore, StaticTemplates};
#[cfg(feature = "remote")]
pub use store::{HttpTemplates, HttpTemplatesConfig};
