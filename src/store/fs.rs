//! Filesystem-backed collaborator implementations.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use xxhash_rust::xxh3::xxh3_64;

use crate::model::{ArtifactId, ArtifactMetadata, ChecklistArtifact};
use crate::parsers::raw_stig_title;
use crate::pipeline::{ArtifactStore, StoreError, TemplateSource};

/// Artifact store writing each artifact as a `.ckl`/`.json` file pair under
/// one directory.
///
/// The `.ckl` file holds the raw checklist text; the `.json` sidecar holds
/// everything else. Identifiers are derived from the artifact title, so
/// re-ingesting the same host and benchmark gets a fresh suffixed id rather
/// than silently overwriting.
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
}

/// Sidecar record persisted next to the checklist text.
#[derive(Debug, Serialize, Deserialize)]
struct ArtifactRecord {
    host_name: String,
    stig_type: String,
    stig_release: String,
    version: String,
    created: DateTime<Utc>,
    updated_on: Option<DateTime<Utc>>,
    system_group_id: Option<String>,
    system_title: Option<String>,
    tags: Vec<String>,
    content_hash: u64,
}

impl ArtifactRecord {
    fn from_artifact(artifact: &ChecklistArtifact) -> Self {
        Self {
            host_name: artifact.metadata.host_name.clone(),
            stig_type: artifact.metadata.stig_type.clone(),
            stig_release: artifact.metadata.stig_release.clone(),
            version: artifact.metadata.version.clone(),
            created: artifact.created,
            updated_on: artifact.updated_on,
            system_group_id: artifact.system_group_id.clone(),
            system_title: artifact.system_title.clone(),
            tags: artifact.tags.clone(),
            content_hash: artifact.content_hash,
        }
    }

    fn into_artifact(self, raw_checklist: String) -> ChecklistArtifact {
        ChecklistArtifact {
            metadata: ArtifactMetadata {
                host_name: self.host_name,
                stig_type: self.stig_type,
                stig_release: self.stig_release,
                version: self.version,
                raw_checklist,
            },
            created: self.created,
            updated_on: self.updated_on,
            system_group_id: self.system_group_id,
            system_title: self.system_title,
            tags: self.tags,
            content_hash: self.content_hash,
        }
    }
}

impl FsStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn checklist_path(&self, id: &ArtifactId) -> PathBuf {
        self.root.join(format!("{id}.ckl"))
    }

    fn record_path(&self, id: &ArtifactId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn write_pair(&self, id: &ArtifactId, artifact: &ChecklistArtifact) -> Result<(), StoreError> {
        let record = serde_json::to_string_pretty(&ArtifactRecord::from_artifact(artifact))
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(self.checklist_path(id), &artifact.metadata.raw_checklist)?;
        fs::write(self.record_path(id), record)?;
        Ok(())
    }
}

impl ArtifactStore for FsStore {
    fn add(&self, artifact: &ChecklistArtifact) -> Result<ArtifactId, StoreError> {
        let base = format!("{:016x}", xxh3_64(artifact.title().as_bytes()));
        let mut id = ArtifactId::new(base.clone());
        let mut n = 1u32;
        while self.record_path(&id).exists() {
            n += 1;
            id = ArtifactId::new(format!("{base}-{n}"));
        }
        self.write_pair(&id, artifact)?;
        Ok(id)
    }

    fn get(&self, id: &ArtifactId) -> Result<Option<ChecklistArtifact>, StoreError> {
        let record_path = self.record_path(id);
        if !record_path.exists() {
            return Ok(None);
        }
        let record: ArtifactRecord = serde_json::from_str(&fs::read_to_string(record_path)?)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let raw_checklist = fs::read_to_string(self.checklist_path(id))?;
        Ok(Some(record.into_artifact(raw_checklist)))
    }

    fn replace(&self, id: &ArtifactId, artifact: &ChecklistArtifact) -> Result<(), StoreError> {
        self.write_pair(id, artifact)
    }
}

/// Template source serving `.ckl` files out of a directory, indexed by each
/// file's unshortened benchmark title.
///
/// The directory is scanned once at open time; template text is read
/// per lookup. Files that fail to parse or carry no title are skipped with
/// a warning.
#[derive(Debug)]
pub struct DirTemplates {
    by_title: HashMap<String, PathBuf>,
}

impl DirTemplates {
    /// Index every `.ckl` file under `dir` by its benchmark title. The
    /// first file seen for a title wins.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut by_title = HashMap::new();
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            let is_ckl = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ckl"));
            if !is_ckl {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            match raw_stig_title(&content) {
                Ok(Some(title)) => {
                    by_title.entry(title).or_insert(path);
                }
                Ok(None) => {
                    warn!(path = %path.display(), "template has no benchmark title, skipping");
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "unreadable template, skipping");
                }
            }
        }
        Ok(Self { by_title })
    }

    /// Number of indexed templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    /// True when the directory held no usable templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

impl TemplateSource for DirTemplates {
    fn template_by_title(&self, title: &str) -> Result<String, StoreError> {
        match self.by_title.get(title) {
            Some(path) => Ok(fs::read_to_string(path)?),
            None => Ok(String::new()),
        }
    }
}
