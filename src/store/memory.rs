//! In-memory collaborator implementations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;

use crate::model::{ArtifactId, ChecklistArtifact};
use crate::pipeline::{ArtifactStore, StoreError, TemplateSource};

/// Artifact store holding everything in memory, in insertion order.
///
/// Useful for tests and for one-shot runs where nothing should be written
/// to disk. Identifiers are issued sequentially as `mem-0001`, `mem-0002`...
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<IndexMap<ArtifactId, ChecklistArtifact>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, IndexMap<ArtifactId, ChecklistArtifact>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Backend("memory store mutex poisoned".to_string()))
    }
}

impl ArtifactStore for MemoryStore {
    fn add(&self, artifact: &ChecklistArtifact) -> Result<ArtifactId, StoreError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = ArtifactId::new(format!("mem-{n:04}"));
        self.lock()?.insert(id.clone(), artifact.clone());
        Ok(id)
    }

    fn get(&self, id: &ArtifactId) -> Result<Option<ChecklistArtifact>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn replace(&self, id: &ArtifactId, artifact: &ChecklistArtifact) -> Result<(), StoreError> {
        self.lock()?.insert(id.clone(), artifact.clone());
        Ok(())
    }
}

/// Template source backed by a fixed title-to-template map.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplates {
    templates: HashMap<String, String>,
}

impl StaticTemplates {
    /// Create a source with no templates; every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under a benchmark title.
    #[must_use]
    pub fn with_template(mut self, title: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(title.into(), template.into());
        self
    }
}

impl TemplateSource for StaticTemplates {
    fn template_by_title(&self, title: &str) -> Result<String, StoreError> {
        Ok(self.templates.get(title).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtifactMetadata;

    fn artifact(host: &str) -> ChecklistArtifact {
        ChecklistArtifact::new(ArtifactMetadata {
            host_name: host.to_string(),
            stig_type: "WIN SVR 2016 STIG".to_string(),
            stig_release: "R3".to_string(),
            version: "1".to_string(),
            raw_checklist: "<CHECKLIST/>".to_string(),
        })
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let id = store.add(&artifact("DC01")).unwrap();
        assert_eq!(id.value(), "mem-0001");

        let loaded = store.get(&id).unwrap().unwrap();
        assert_eq!(loaded.metadata.host_name, "DC01");
        assert!(store.get(&ArtifactId::new("mem-9999")).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_sequential_ids() {
        let store = MemoryStore::new();
        let first = store.add(&artifact("A")).unwrap();
        let second = store.add(&artifact("B")).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_memory_store_replace() {
        let store = MemoryStore::new();
        let id = store.add(&artifact("DC01")).unwrap();
        store.replace(&id, &artifact("DC02")).unwrap();

        let loaded = store.get(&id).unwrap().unwrap();
        assert_eq!(loaded.metadata.host_name, "DC02");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_static_templates_lookup() {
        let templates = StaticTemplates::new().with_template("Some Guide", "<CHECKLIST/>");
        assert_eq!(
            templates.template_by_title("Some Guide").unwrap(),
            "<CHECKLIST/>"
        );
        assert_eq!(templates.template_by_title("Other Guide").unwrap(), "");
    }
}
