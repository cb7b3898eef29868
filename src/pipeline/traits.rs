//! Collaborator traits for ingestion.
//!
//! The ingestion pipeline talks to three external concerns through traits:
//! template lookup ([`TemplateSource`]), artifact persistence
//! ([`ArtifactStore`]) and post-save notification ([`EventSink`]). The
//! pipeline never retries a collaborator; failures surface as that file's
//! failure and the batch moves on.

use thiserror::Error;
use tracing::info;

use crate::model::{ArtifactId, ChecklistArtifact};

/// Errors surfaced by collaborator implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem-level failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A remote collaborator could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered but refused the operation
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Looks up checklist templates by benchmark title.
///
/// An empty returned string means "no template for that title"; it is not an
/// error. Callers surface scan results unmerged in that case.
pub trait TemplateSource: Send + Sync {
    /// Fetch the template whose benchmark title equals `title`, or an empty
    /// string when none is known.
    fn template_by_title(&self, title: &str) -> Result<String, StoreError>;
}

/// Persists checklist artifacts.
pub trait ArtifactStore: Send + Sync {
    /// Persist a new artifact and return its identifier.
    fn add(&self, artifact: &ChecklistArtifact) -> Result<ArtifactId, StoreError>;

    /// Fetch a stored artifact, or `None` when the id is unknown.
    fn get(&self, id: &ArtifactId) -> Result<Option<ChecklistArtifact>, StoreError>;

    /// Replace a stored artifact in place.
    fn replace(&self, id: &ArtifactId, artifact: &ChecklistArtifact) -> Result<(), StoreError>;
}

/// What a save notification is announcing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// First ingestion of the artifact
    Created,
    /// Replacement of a stored artifact
    Updated,
}

/// Receives fire-and-forget notifications after successful saves.
///
/// Payloads are plain identifier strings. A sink failure counts against the
/// file that triggered it, but the save it follows is not rolled back.
pub trait EventSink: Send + Sync {
    /// An artifact was created or updated.
    fn artifact_saved(&self, id: &ArtifactId, kind: SaveKind) -> Result<(), StoreError>;

    /// A system group's checklist count changed.
    fn system_count_changed(&self, system_group_id: &str) -> Result<(), StoreError>;
}

/// An event sink that swallows every notification.
///
/// Use this when no downstream consumer is wired up, so pipeline code can
/// notify unconditionally.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEvents;

impl NoOpEvents {
    /// Create a new no-op sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for NoOpEvents {
    fn artifact_saved(&self, _id: &ArtifactId, _kind: SaveKind) -> Result<(), StoreError> {
        Ok(())
    }

    fn system_count_changed(&self, _system_group_id: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// An event sink that logs each notification at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEvents;

impl LogEvents {
    /// Create a new logging sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEvents {
    fn artifact_saved(&self, id: &ArtifactId, kind: SaveKind) -> Result<(), StoreError> {
        match kind {
            SaveKind::Created => info!(id = %id, "artifact created"),
            SaveKind::Updated => info!(id = %id, "artifact updated"),
        }
        Ok(())
    }

    fn system_count_changed(&self, system_group_id: &str) -> Result<(), StoreError> {
        info!(system_group_id, "system checklist count changed");
        Ok(())
    }
}
