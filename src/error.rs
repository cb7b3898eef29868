//! Unified error types for stig-tools.
//!
//! Every variant here is scoped to a single uploaded file. Batch ingestion
//! catches them per file, records the failure and moves on; nothing in this
//! module aborts a batch.

use thiserror::Error;

use crate::merge::MergeError;
use crate::parsers::ParseError;
use crate::pipeline::StoreError;

/// Main error type for ingestion operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestError {
    /// The file's XML was malformed or structurally incomplete
    #[error("Failed to parse {file}")]
    Parse {
        file: String,
        #[source]
        source: ParseError,
    },

    /// A template was found for the file's scan but could not be merged
    #[error("Failed to merge scan results from {file}")]
    Merge {
        file: String,
        #[source]
        source: MergeError,
    },

    /// The file extension is neither `.ckl` nor `.xml`
    #[error("Unsupported file type: {0} (expected .ckl or .xml)")]
    UnsupportedFile(String),

    /// A collaborator (template source, store, event sink) failed
    #[error("Storage operation failed: {context}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },

    /// An update referenced an artifact the store does not hold
    #[error("Artifact {0} not found")]
    NotFound(String),
}

/// Convenient Result type for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    /// Create a parse error for a named file
    pub fn parse(file: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            file: file.into(),
            source,
        }
    }

    /// Create a merge error for a named file
    pub fn merge(file: impl Into<String>, source: MergeError) -> Self {
        Self::Merge {
            file: file.into(),
            source,
        }
    }

    /// Create a store error with context
    pub fn store(context: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }
}
