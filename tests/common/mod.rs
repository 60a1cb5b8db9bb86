//! Recording collaborator doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use content_aggregator::{
    ContributorProfileService, Entity, EntityStore, Error, IndexError, ProfileError, SearchIndex,
    StoreError, StoreErrorKind,
};

/// Installs a test-writer subscriber once so `RUST_LOG`-style output shows up under `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Profile service answering from a fixed table keyed by `force_create`.
#[derive(Default)]
pub struct FakeProfiles {
    pub id_without_create: Option<String>,
    pub id_with_create: Option<String>,
    pub fail_lookup: bool,
    pub fail_update: bool,
    pub lookups: Mutex<Vec<(String, String, bool)>>,
    pub updates: Mutex<Vec<(String, String)>>,
}

impl FakeProfiles {
    pub fn returning(id: Option<&str>) -> Self {
        Self {
            id_without_create: id.map(str::to_string),
            id_with_create: id.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }

    pub fn update_calls(&self) -> Vec<(String, String)> {
        self.updates.lock().unwrap().clone()
    }
}

impl ContributorProfileService for FakeProfiles {
    fn contributor_id(
        &self,
        auth_scheme: &str,
        principal: &str,
        force_create: bool,
    ) -> Result<Option<String>, ProfileError> {
        self.lookups.lock().unwrap().push((
            auth_scheme.to_string(),
            principal.to_string(),
            force_create,
        ));
        if self.fail_lookup {
            return Err(ProfileError::new("directory unavailable"));
        }
        Ok(if force_create {
            self.id_with_create.clone()
        } else {
            self.id_without_create.clone()
        })
    }

    fn create_or_update_profile(&self, auth_scheme: &str, principal: &str) -> Result<(), ProfileError> {
        self.updates
            .lock()
            .unwrap()
            .push((auth_scheme.to_string(), principal.to_string()));
        if self.fail_update {
            return Err(ProfileError::new("Test exception from profile update"));
        }
        Ok(())
    }
}

/// One call observed by a recording collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetAll(Option<usize>, Option<usize>, Vec<String>),
    Get(String),
    Create(Entity),
    CreateWithId(String, Entity),
    Update(String, Entity),
    Delete(String),
    Upsert(String, String, String, Entity),
    Unindex(String, String, String),
}

/// Shared, ordered call log across store and index.
pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Entity store that records calls and can be told to fail.
pub struct RecordingStore {
    pub log: CallLog,
    pub assigned_id: String,
    pub existing: Option<Entity>,
    pub fail: Option<StoreErrorKind>,
}

impl RecordingStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            assigned_id: "generated-1".to_string(),
            existing: None,
            fail: None,
        }
    }

    fn check(&self) -> Result<(), Error> {
        match self.fail {
            Some(kind) => Err(StoreError::new(kind, "store refused").into()),
            None => Ok(()),
        }
    }
}

impl EntityStore for RecordingStore {
    fn get_all(
        &self,
        from: Option<usize>,
        size: Option<usize>,
        fields_to_remove: &[String],
    ) -> Result<Vec<Entity>, Error> {
        self.log
            .lock()
            .unwrap()
            .push(Call::GetAll(from, size, fields_to_remove.to_vec()));
        self.check()?;
        Ok(self.existing.clone().into_iter().collect())
    }

    fn get(&self, id: &str) -> Result<Option<Entity>, Error> {
        self.log.lock().unwrap().push(Call::Get(id.to_string()));
        self.check()?;
        Ok(self.existing.clone())
    }

    fn create(&self, entity: Entity) -> Result<String, Error> {
        self.log.lock().unwrap().push(Call::Create(entity));
        self.check()?;
        Ok(self.assigned_id.clone())
    }

    fn create_with_id(&self, id: &str, entity: Entity) -> Result<(), Error> {
        self.log
            .lock()
            .unwrap()
            .push(Call::CreateWithId(id.to_string(), entity));
        self.check()
    }

    fn update(&self, id: &str, entity: Entity) -> Result<(), Error> {
        self.log
            .lock()
            .unwrap()
            .push(Call::Update(id.to_string(), entity));
        self.check()
    }

    fn delete(&self, id: &str) -> Result<(), Error> {
        self.log.lock().unwrap().push(Call::Delete(id.to_string()));
        self.check()
    }
}

/// Search index that records calls and can be told to fail.
pub struct RecordingIndex {
    pub log: CallLog,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl RecordingIndex {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SearchIndex for RecordingIndex {
    fn upsert(
        &self,
        index_name: &str,
        index_type: &str,
        id: &str,
        document: &Entity,
    ) -> Result<(), IndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(Call::Upsert(
            index_name.to_string(),
            index_type.to_string(),
            id.to_string(),
            document.clone(),
        ));
        if self.fail {
            return Err(IndexError::new(index_name, index_type, id, "index refused"));
        }
        Ok(())
    }

    fn delete(&self, index_name: &str, index_type: &str, id: &str) -> Result<(), IndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(Call::Unindex(
            index_name.to_string(),
            index_type.to_string(),
            id.to_string(),
        ));
        if self.fail {
            return Err(IndexError::new(index_name, index_type, id, "index refused"));
        }
        Ok(())
    }
}
