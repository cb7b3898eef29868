//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by
//! main.rs. Each handler implements the business logic for a specific CLI
//! subcommand and returns its exit code.

mod ingest;
mod inspect;
mod merge;
mod update;

pub use ingest::run_ingest;
pub use inspect::run_inspect;
pub use merge::run_merge;
pub use update::run_update;

// Re-export config types used by handlers
pub use crate::config::{IngestConfig, InspectConfig, MergeConfig, UpdateConfig};

use std::path::Path;

/// Bare file name for upload reporting, falling back to the full path when
/// the path has no final component.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
