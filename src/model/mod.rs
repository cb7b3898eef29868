//! Core data structures for checklist artifacts and scan results.
//!
//! [`ArtifactMetadata`] is what the extractor pulls out of a checklist;
//! [`ChecklistArtifact`] wraps it with storage bookkeeping. SCAP scans parse
//! into [`ScapResultSet`], the merge engine's input.

mod artifact;
mod scap;

pub use artifact::*;
pub use scap::*;
