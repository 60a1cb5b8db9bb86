//! Project REST endpoints: permissions, payload validation and delegation.

mod common;

use std::sync::{Arc, Mutex};

use common::{init_tracing, Call, CallLog, FakeProfiles, RecordingIndex, RecordingStore};
use content_aggregator::rest::{ApiResponse, ProjectRestService};
use content_aggregator::{
    AuthenticationResolver, ContributorSecurityContext, Entity, Error, IndexConfig,
    MemoryEntityStore, MemorySearchIndex, Principal, ProjectService, ProviderSecurityContext,
    ResolutionContext, RestConfig, StoreErrorKind, CODE,
};
use serde_json::json;

struct Fixture {
    rest: ProjectRestService,
    log: CallLog,
}

fn fixture(configure_store: impl FnOnce(&mut RecordingStore)) -> Fixture {
    init_tracing();
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let mut store = RecordingStore::new(log.clone());
    configure_store(&mut store);
    let service = ProjectService::new(
        Arc::new(store),
        Arc::new(RecordingIndex::new(log.clone())),
        IndexConfig::default(),
    );
    let rest = ProjectRestService::new(
        Arc::new(service),
        AuthenticationResolver::new(Arc::new(FakeProfiles::default())),
        RestConfig::default(),
    );
    Fixture { rest, log }
}

impl Fixture {
    fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }
}

fn super_provider() -> ResolutionContext {
    ResolutionContext::new(
        "req-admin",
        Arc::new(ProviderSecurityContext::new(
            Some(Principal::new("admin")),
            true,
            "provider",
        )),
    )
}

fn code(value: serde_json::Value) -> Entity {
    let mut e = Entity::new();
    e.insert(CODE.to_string(), value);
    e
}

fn upsert(id: &str, doc: Entity) -> Call {
    Call::Upsert(
        "projects".to_string(),
        "project".to_string(),
        id.to_string(),
        doc,
    )
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn get_all_ok_for_guest() {
    let f = fixture(|s| s.existing = Some(code(json!("a"))));
    let mut guest = ResolutionContext::anonymous("req-guest");

    let all = f.rest.get_all(&mut guest, Some(10), Some(12)).unwrap();

    assert_eq!(all, vec![code(json!("a"))]);
    assert_eq!(f.calls(), vec![Call::GetAll(Some(10), Some(12), vec![])]);
}

#[test]
fn get_all_error_from_service() {
    let f = fixture(|s| s.fail = Some(StoreErrorKind::Backend));
    let mut guest = ResolutionContext::anonymous("req-guest");

    let err = f.rest.get_all(&mut guest, Some(10), Some(12)).unwrap_err();
    assert_eq!(err.status_code(), 500);
}

#[test]
fn get_ok() {
    let f = fixture(|s| s.existing = Some(code(json!("10"))));
    let mut guest = ResolutionContext::anonymous("req-guest");

    assert_eq!(f.rest.get(&mut guest, "10").unwrap(), code(json!("10")));
}

#[test]
fn get_missing_is_not_found() {
    let f = fixture(|_| {});
    let mut guest = ResolutionContext::anonymous("req-guest");

    let err = f.rest.get(&mut guest, "10").unwrap_err();
    assert!(matches!(err, Error::NotFound { ref id } if id == "10"));
    assert_eq!(ApiResponse::error(&err).status, 404);
}

#[test]
fn get_error_from_service() {
    let f = fixture(|s| s.fail = Some(StoreErrorKind::Backend));
    let mut guest = ResolutionContext::anonymous("req-guest");

    assert!(matches!(f.rest.get(&mut guest, "10"), Err(Error::Store(_))));
}

// ============================================================================
// Create with explicit id
// ============================================================================

#[test]
fn create_with_id_requires_id() {
    let f = fixture(|_| {});

    for id in ["", "  "] {
        let err = f
            .rest
            .create_with_id(&mut super_provider(), id, code(json!("myname")))
            .unwrap_err();
        assert!(matches!(err, Error::RequiredFieldMissing { ref field } if field == "id"));
    }
    assert!(f.calls().is_empty());
}

#[test]
fn create_with_id_rejects_mismatching_code() {
    let f = fixture(|_| {});

    for bad in [json!("myanothername"), json!("")] {
        let err = f
            .rest
            .create_with_id(&mut super_provider(), "myname", code(bad))
            .unwrap_err();
        assert!(matches!(err, Error::FieldMismatch { .. }));
        assert_eq!(ApiResponse::error(&err).status, 400);
    }
    assert!(f.calls().is_empty());
}

#[test]
fn create_with_id_ok() {
    let f = fixture(|_| {});

    let ret = f
        .rest
        .create_with_id(&mut super_provider(), "myname", code(json!("myname")))
        .unwrap();

    assert_eq!(ret.id, "myname");
    assert_eq!(
        f.calls(),
        vec![
            Call::CreateWithId("myname".to_string(), code(json!("myname"))),
            upsert("myname", code(json!("myname"))),
        ]
    );
}

#[test]
fn create_with_id_fills_missing_code() {
    let f = fixture(|_| {});

    let mut payload = Entity::new();
    payload.insert("name".to_string(), json!("Infinispan"));
    f.rest
        .create_with_id(&mut super_provider(), "infinispan", payload)
        .unwrap();

    let mut expected = Entity::new();
    expected.insert("name".to_string(), json!("Infinispan"));
    expected.insert(CODE.to_string(), json!("infinispan"));
    assert_eq!(
        f.calls()[0],
        Call::CreateWithId("infinispan".to_string(), expected)
    );
}

#[test]
fn create_with_id_error_from_service() {
    let f = fixture(|s| s.fail = Some(StoreErrorKind::Backend));

    let err = f
        .rest
        .create_with_id(&mut super_provider(), "myname", code(json!("myname")))
        .unwrap_err();
    assert!(matches!(err, Error::Store(_)));
}

// ============================================================================
// Create without id
// ============================================================================

#[test]
fn create_rejects_empty_code() {
    let f = fixture(|_| {});

    let err = f
        .rest
        .create(&mut super_provider(), code(json!("")))
        .unwrap_err();
    assert!(matches!(err, Error::RequiredFieldMissing { ref field } if field == CODE));
    assert!(f.calls().is_empty());
}

#[test]
fn create_uses_code_as_id() {
    let f = fixture(|_| {});

    let ret = f
        .rest
        .create(&mut super_provider(), code(json!("myname")))
        .unwrap();

    assert_eq!(ret.id, "myname");
    assert_eq!(
        f.calls(),
        vec![
            Call::CreateWithId("myname".to_string(), code(json!("myname"))),
            upsert("myname", code(json!("myname"))),
        ]
    );
}

#[test]
fn create_without_code_uses_store_assigned_id() {
    let f = fixture(|_| {});

    let mut payload = Entity::new();
    payload.insert("name".to_string(), json!("Unnamed"));
    let ret = f.rest.create(&mut super_provider(), payload.clone()).unwrap();

    assert_eq!(ret.id, "generated-1");
    let mut stamped = payload.clone();
    stamped.insert(CODE.to_string(), json!("generated-1"));
    assert_eq!(
        f.calls(),
        vec![
            Call::Create(payload),
            Call::CreateWithId("generated-1".to_string(), stamped.clone()),
            upsert("generated-1", stamped),
        ]
    );
}

#[test]
fn create_trims_code_before_storing() {
    let f = fixture(|_| {});

    let ret = f
        .rest
        .create(&mut super_provider(), code(json!(" myname ")))
        .unwrap();

    assert_eq!(ret.id, "myname");
    assert_eq!(
        f.calls()[0],
        Call::CreateWithId("myname".to_string(), code(json!("myname")))
    );
}

#[test]
fn create_error_from_service() {
    let f = fixture(|s| s.fail = Some(StoreErrorKind::Backend));

    let result = f.rest.create(&mut super_provider(), code(json!("myname")));
    assert_eq!(ApiResponse::from_result(result).status, 500);
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn delete_ok() {
    let f = fixture(|_| {});

    f.rest.delete(&mut super_provider(), "x").unwrap();

    assert_eq!(
        f.calls(),
        vec![
            Call::Delete("x".to_string()),
            Call::Unindex("projects".to_string(), "project".to_string(), "x".to_string()),
        ]
    );
}

// ============================================================================
// Permissions
// ============================================================================

#[test]
fn writes_require_authentication() {
    let f = fixture(|_| {});
    let mut guest = ResolutionContext::anonymous("req-guest");

    let err = f
        .rest
        .create(&mut guest, code(json!("myname")))
        .unwrap_err();
    assert_eq!(err.status_code(), 401);

    let err = f.rest.delete(&mut guest, "x").unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert!(f.calls().is_empty());
}

#[test]
fn writes_require_super_provider() {
    let f = fixture(|_| {});
    let mut provider = ResolutionContext::new(
        "req-provider",
        Arc::new(ProviderSecurityContext::new(
            Some(Principal::new("jbossorg")),
            false,
            "provider",
        )),
    );

    let err = f
        .rest
        .create_with_id(&mut provider, "myname", code(json!("myname")))
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let mut contributor = ResolutionContext::new(
        "req-contributor",
        Arc::new(ContributorSecurityContext::new(
            Some(Principal::new("alice")),
            "sso",
        )),
    );
    let err = f.rest.delete(&mut contributor, "x").unwrap_err();
    assert_eq!(err.status_code(), 401);
    assert!(f.calls().is_empty());
}

#[test]
fn permission_is_checked_before_validation() {
    let f = fixture(|_| {});
    let mut guest = ResolutionContext::anonymous("req-guest");

    let err = f.rest.create_with_id(&mut guest, "", Entity::new()).unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated(_)));
}

// ============================================================================
// End to end over in-memory collaborators
// ============================================================================

#[test]
fn created_project_is_readable_and_indexed() {
    init_tracing();
    let store = Arc::new(MemoryEntityStore::new());
    let index = Arc::new(MemorySearchIndex::new());
    let service = ProjectService::new(store, index.clone(), IndexConfig::default());
    let rest = ProjectRestService::new(
        Arc::new(service),
        AuthenticationResolver::new(Arc::new(FakeProfiles::default())),
        RestConfig::default(),
    );

    let mut admin = super_provider();
    assert!(rest.get(&mut admin, "myname").is_err());

    let mut payload = code(json!("myname"));
    payload.insert("name".to_string(), json!("My Name"));
    let ret = rest.create(&mut admin, payload.clone()).unwrap();
    assert_eq!(ret.id, "myname");

    let mut guest = ResolutionContext::anonymous("req-guest");
    assert_eq!(rest.get(&mut guest, "myname").unwrap(), payload);
    assert_eq!(
        index.document("projects", "project", "myname").unwrap(),
        payload
    );

    rest.delete(&mut admin, "myname").unwrap();
    assert!(index.is_empty());
    assert!(rest.get_all(&mut guest, None, None).unwrap().is_empty());
}
