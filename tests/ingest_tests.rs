//! End-to-end ingestion pipeline tests.
//!
//! These tests wire the [`Ingestor`] to in-memory collaborators and feed it
//! the fixture checklist and scan files, covering batch isolation, system
//! group attachment, updates and collaborator failure handling.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stig_tools::pipeline::{
    ArtifactStore, EventSink, Ingestor, NoOpEvents, SaveKind, StoreError, SystemGroupRef,
    UploadFile, sanitize_upload,
};
use stig_tools::store::{MemoryStore, StaticTemplates};
use stig_tools::{ArtifactId, ChecklistArtifact};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

const RAW_TITLE: &str = "Windows Server 2016 Security Technical Implementation Guide";

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("read fixture")
}

fn templates_with_fixture() -> StaticTemplates {
    StaticTemplates::new().with_template(RAW_TITLE, fixture("ckl/win2016.ckl"))
}

fn first_id() -> ArtifactId {
    ArtifactId::new("mem-0001")
}

// ============================================================================
// Test Doubles
// ============================================================================

/// Store handle that both the ingestor and the test can hold.
#[derive(Clone)]
struct SharedStore(Arc<MemoryStore>);

impl ArtifactStore for SharedStore {
    fn add(&self, artifact: &ChecklistArtifact) -> Result<ArtifactId, StoreError> {
        self.0.add(artifact)
    }

    fn get(&self, id: &ArtifactId) -> Result<Option<ChecklistArtifact>, StoreError> {
        self.0.get(id)
    }

    fn replace(&self, id: &ArtifactId, artifact: &ChecklistArtifact) -> Result<(), StoreError> {
        self.0.replace(id, artifact)
    }
}

fn shared_store() -> (SharedStore, Arc<MemoryStore>) {
    let inner = Arc::new(MemoryStore::new());
    (SharedStore(Arc::clone(&inner)), inner)
}

/// Event sink that records every notification it receives.
#[derive(Clone, Default)]
struct RecordingEvents {
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingEvents {
    fn events(&self) -> Vec<String> {
        self.log.lock().expect("events lock").clone()
    }

    fn push(&self, entry: String) {
        self.log.lock().expect("events lock").push(entry);
    }
}

impl EventSink for RecordingEvents {
    fn artifact_saved(&self, id: &ArtifactId, kind: SaveKind) -> Result<(), StoreError> {
        let verb = match kind {
            SaveKind::Created => "created",
            SaveKind::Updated => "updated",
        };
        self.push(format!("{verb} {id}"));
        Ok(())
    }

    fn system_count_changed(&self, system_group_id: &str) -> Result<(), StoreError> {
        self.push(format!("count {system_group_id}"));
        Ok(())
    }
}

/// Store whose writes always fail.
struct FailingStore;

impl ArtifactStore for FailingStore {
    fn add(&self, _artifact: &ChecklistArtifact) -> Result<ArtifactId, StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    fn get(&self, _id: &ArtifactId) -> Result<Option<ChecklistArtifact>, StoreError> {
        Ok(None)
    }

    fn replace(&self, _id: &ArtifactId, _artifact: &ChecklistArtifact) -> Result<(), StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }
}

/// Store that rejects the second add and accepts every other call.
struct FailSecondAddStore {
    inner: Arc<MemoryStore>,
    adds: AtomicUsize,
}

impl FailSecondAddStore {
    fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            adds: AtomicUsize::new(0),
        }
    }
}

impl ArtifactStore for FailSecondAddStore {
    fn add(&self, artifact: &ChecklistArtifact) -> Result<ArtifactId, StoreError> {
        if self.adds.fetch_add(1, Ordering::SeqCst) == 1 {
            return Err(StoreError::Backend("store offline".to_string()));
        }
        self.inner.add(artifact)
    }

    fn get(&self, id: &ArtifactId) -> Result<Option<ChecklistArtifact>, StoreError> {
        self.inner.get(id)
    }

    fn replace(&self, id: &ArtifactId, artifact: &ChecklistArtifact) -> Result<(), StoreError> {
        self.inner.replace(id, artifact)
    }
}

/// Sink whose save notifications always fail.
struct FailingSink;

impl EventSink for FailingSink {
    fn artifact_saved(&self, _id: &ArtifactId, _kind: SaveKind) -> Result<(), StoreError> {
        Err(StoreError::Backend("webhook down".to_string()))
    }

    fn system_count_changed(&self, _system_group_id: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// Checklist Ingestion
// ============================================================================

mod checklist_ingest {
    use super::*;

    #[test]
    fn ckl_upload_stores_sanitized_checklist() {
        let (handle, store) = shared_store();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(NoOpEvents),
        );

        let raw = fixture("ckl/win2016.ckl");
        let outcome = ingestor.ingest_batch(
            &[UploadFile::new("win2016.ckl", raw.clone())],
            &SystemGroupRef::default(),
        );

        assert!(outcome.all_succeeded());
        assert_eq!(outcome.successful, 1);
        assert_eq!(outcome.total(), 1);

        let stored = store.get(&first_id()).expect("get").expect("stored");
        assert_eq!(stored.metadata.host_name, "DC01");
        assert_eq!(stored.metadata.stig_type, "WIN SVR 2016 STIG");
        assert_eq!(stored.metadata.raw_checklist, sanitize_upload(&raw));
        assert!(stored.updated_on.is_none());
    }
}

// ============================================================================
// Scan Ingestion
// ============================================================================

mod scan_ingest {
    use super::*;

    #[test]
    fn scan_with_template_merges_and_stores() {
        let (handle, store) = shared_store();
        let ingestor = Ingestor::new(
            Box::new(templates_with_fixture()),
            Box::new(handle),
            Box::new(NoOpEvents),
        );

        let outcome = ingestor.ingest_batch(
            &[UploadFile::new(
                "win2016-scan.xml",
                fixture("scap/win2016-scan.xml"),
            )],
            &SystemGroupRef::default(),
        );

        assert!(outcome.all_succeeded());
        let stored = store.get(&first_id()).expect("get").expect("stored");
        assert_eq!(stored.metadata.host_name, "SCANNED-DC01");
        assert_eq!(stored.metadata.stig_type, "WIN SVR 2016 STIG");
        assert!(stored.metadata.raw_checklist.contains("<STATUS>Open</STATUS>"));
        assert!(
            stored
                .metadata
                .raw_checklist
                .contains("<STATUS>NotAFinding</STATUS>")
        );
    }

    #[test]
    fn scan_without_template_fails_that_file() {
        let (handle, store) = shared_store();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(NoOpEvents),
        );

        let outcome = ingestor.ingest_batch(
            &[UploadFile::new(
                "win2016-scan.xml",
                fixture("scap/win2016-scan.xml"),
            )],
            &SystemGroupRef::default(),
        );

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failed_uploads, vec!["win2016-scan.xml".to_string()]);
        assert_eq!(store.len().expect("len"), 0);
    }

    #[test]
    fn unsupported_extension_fails_that_file() {
        let (handle, _store) = shared_store();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(NoOpEvents),
        );

        let outcome = ingestor.ingest_batch(
            &[UploadFile::new("notes.txt", "not a checklist")],
            &SystemGroupRef::default(),
        );

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failed_uploads, vec!["notes.txt".to_string()]);
    }

    #[test]
    fn mixed_batch_processes_files_independently() {
        let (handle, store) = shared_store();
        let ingestor = Ingestor::new(
            Box::new(templates_with_fixture()),
            Box::new(handle),
            Box::new(NoOpEvents),
        );

        let outcome = ingestor.ingest_batch(
            &[
                UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl")),
                UploadFile::new("notes.txt", "not a checklist"),
                UploadFile::new("win2016-scan.xml", fixture("scap/win2016-scan.xml")),
            ],
            &SystemGroupRef::default(),
        );

        assert_eq!(outcome.successful, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.total(), 3);
        assert!(!outcome.all_succeeded());
        assert_eq!(outcome.failed_uploads, vec!["notes.txt".to_string()]);
        assert_eq!(store.len().expect("len"), 2);
    }
}

// ============================================================================
// System Groups
// ============================================================================

mod system_groups {
    use super::*;

    #[test]
    fn group_fields_attach_and_count_event_fires() {
        let (handle, store) = shared_store();
        let events = RecordingEvents::default();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(events.clone()),
        );

        let group = SystemGroupRef {
            id: Some("sg-42".to_string()),
            title: Some("Lab enclave".to_string()),
        };
        let outcome = ingestor.ingest_batch(
            &[UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl"))],
            &group,
        );

        assert!(outcome.all_succeeded());
        let stored = store.get(&first_id()).expect("get").expect("stored");
        assert_eq!(stored.system_group_id.as_deref(), Some("sg-42"));
        assert_eq!(stored.system_title.as_deref(), Some("Lab enclave"));
        assert_eq!(
            events.events(),
            vec!["created mem-0001".to_string(), "count sg-42".to_string()]
        );
    }

    #[test]
    fn no_group_means_no_count_event() {
        let (handle, _store) = shared_store();
        let events = RecordingEvents::default();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(events.clone()),
        );

        ingestor.ingest_batch(
            &[UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl"))],
            &SystemGroupRef::default(),
        );

        assert_eq!(events.events(), vec!["created mem-0001".to_string()]);
    }
}

// ============================================================================
// Updates
// ============================================================================

mod updates {
    use super::*;

    #[test]
    fn rescan_update_regrades_against_stored_checklist() {
        let (handle, store) = shared_store();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(NoOpEvents),
        );

        ingestor.ingest_batch(
            &[UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl"))],
            &SystemGroupRef::default(),
        );
        let before = store.get(&first_id()).expect("get").expect("stored");

        // Tag the stored artifact so the update has something to preserve.
        let mut tagged = before.clone();
        tagged.tags.push("quarterly".to_string());
        store.replace(&first_id(), &tagged).expect("replace");

        let updated = ingestor
            .update_artifact(
                &first_id(),
                &UploadFile::new("rescan.xml", fixture("scap/win2016-scan.xml")),
            )
            .expect("update");
        assert_eq!(updated, first_id());

        let after = store.get(&first_id()).expect("get").expect("stored");
        assert_eq!(after.metadata.host_name, "SCANNED-DC01");
        assert!(
            after
                .metadata
                .raw_checklist
                .contains("<STATUS>NotAFinding</STATUS>"),
            "passing rule closes on update"
        );
        assert!(
            !after.metadata.raw_checklist.contains("<STATUS>Open</STATUS>"),
            "failing rule must not open a finding when re-grading a stored checklist"
        );
        assert_eq!(after.created, before.created, "creation time carries over");
        assert!(after.updated_on.is_some());
        assert_eq!(after.tags, vec!["quarterly".to_string()]);
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn ckl_update_replaces_content() {
        let (handle, store) = shared_store();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(NoOpEvents),
        );

        ingestor.ingest_batch(
            &[UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl"))],
            &SystemGroupRef::default(),
        );

        let replacement = fixture("ckl/win2016.ckl").replace("DC01", "DC07");
        ingestor
            .update_artifact(&first_id(), &UploadFile::new("win2016.ckl", replacement))
            .expect("update");

        let after = store.get(&first_id()).expect("get").expect("stored");
        assert_eq!(after.metadata.host_name, "DC07");
        assert!(after.updated_on.is_some());
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (handle, _store) = shared_store();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(NoOpEvents),
        );

        let err = ingestor
            .update_artifact(
                &ArtifactId::new("mem-9999"),
                &UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl")),
            )
            .expect_err("missing id should fail");
        assert!(err.to_string().contains("not found"), "got: {err}");
    }

    #[test]
    fn update_emits_update_event_but_no_count_change() {
        let (handle, _store) = shared_store();
        let events = RecordingEvents::default();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(events.clone()),
        );

        let group = SystemGroupRef {
            id: Some("sg-42".to_string()),
            title: None,
        };
        ingestor.ingest_batch(
            &[UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl"))],
            &group,
        );
        ingestor
            .update_artifact(
                &first_id(),
                &UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl")),
            )
            .expect("update");

        let log = events.events();
        assert_eq!(log.last().map(String::as_str), Some("updated mem-0001"));
        assert_eq!(
            log.iter().filter(|entry| entry.starts_with("count")).count(),
            1,
            "only the initial ingestion changes the group count"
        );
    }
}

// ============================================================================
// Collaborator Failures
// ============================================================================

mod failure_handling {
    use super::*;

    #[test]
    fn store_failure_counts_the_file_as_failed() {
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(FailingStore),
            Box::new(NoOpEvents),
        );

        let outcome = ingestor.ingest_batch(
            &[UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl"))],
            &SystemGroupRef::default(),
        );

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failed_uploads, vec!["win2016.ckl".to_string()]);
    }

    #[test]
    fn mid_batch_store_failure_fails_only_that_file() {
        let inner = Arc::new(MemoryStore::new());
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(FailSecondAddStore::new(Arc::clone(&inner))),
            Box::new(NoOpEvents),
        );

        let checklist = fixture("ckl/win2016.ckl");
        let outcome = ingestor.ingest_batch(
            &[
                UploadFile::new("dc01.ckl", checklist.clone()),
                UploadFile::new("dc02.ckl", checklist.replace("DC01", "DC02")),
                UploadFile::new("dc03.ckl", checklist.replace("DC01", "DC03")),
            ],
            &SystemGroupRef::default(),
        );

        assert_eq!(outcome.successful, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.failed_uploads, vec!["dc02.ckl".to_string()]);
        assert_eq!(inner.len().expect("len"), 2, "the other saves land");
    }

    #[test]
    fn notify_failure_counts_the_file_but_keeps_the_record() {
        let (handle, store) = shared_store();
        let ingestor = Ingestor::new(
            Box::new(StaticTemplates::new()),
            Box::new(handle),
            Box::new(FailingSink),
        );

        let outcome = ingestor.ingest_batch(
            &[UploadFile::new("win2016.ckl", fixture("ckl/win2016.ckl"))],
            &SystemGroupRef::default(),
        );

        assert_eq!(outcome.failed, 1, "notification failure fails the file");
        assert_eq!(store.len().expect("len"), 1, "the save is not rolled back");
    }
}
