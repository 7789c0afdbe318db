//! End-to-end flows across submitter, store and router.

use khel_client::{
    descriptor, AuthPhase, CredentialSubmitter, FileBackend, KhelClient, MemoryBackend, Profile,
    RedirectReason, Resolution, Role, RoleRouter, Session, SessionStore, SubRoute, SubmitError,
    ValidationError,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_coach_login(server: &MockServer, email: &str, name: &str, org: &str, delay_ms: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/coach/login"))
        .and(body_partial_json(json!({ "email": email })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "statusCode": 200,
                    "data": {"coach": {"_id": format!("c-{name}"), "name": name, "organization": org}},
                    "message": "Coach logged in Successfully"
                }))
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

fn sample_profile(role: Role) -> Profile {
    match role {
        Role::Sponsor => Profile {
            name: Some("Acme Sports Ltd.".into()),
            ..Profile::default()
        },
        _ => Profile::member("Jane Doe", "org1"),
    }
}

#[tokio::test]
async fn coach_login_routes_to_team_management() {
    let server = MockServer::start().await;
    mock_coach_login(&server, "jane@club.in", "Jane Doe", "org1", 0).await;

    let store = Arc::new(SessionStore::in_memory());
    let client = KhelClient::new(server.uri()).unwrap();
    let submitter = CredentialSubmitter::new(client, Arc::clone(&store));
    let router = RoleRouter::new(Arc::clone(&store));

    let session = assert_ok!(submitter.submit(Role::Coach, "jane@club.in", "pw").await);
    assert_eq!(store.phase(), AuthPhase::Authenticated(Role::Coach));

    match router.resolve(Some(&session)) {
        Resolution::Mount(tree) => {
            assert_eq!(tree.default_path, "/coach-dashboard/org1/jane-doe/teammanagement");
        }
        other => panic!("expected mount, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_password_sends_nothing_and_keeps_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::in_memory());
    store.write(Role::Athlete, Profile::member("Sam", "org2")).unwrap();
    let before = store.read();

    let submitter = CredentialSubmitter::new(KhelClient::new(server.uri()).unwrap(), Arc::clone(&store));
    let err = assert_err!(submitter.submit(Role::Coach, "a@b.com", "   ").await);
    assert!(matches!(err, SubmitError::Validation(ValidationError::EmptyPassword)));
    assert_eq!(store.read(), before);
}

#[tokio::test]
async fn empty_state_redirects_to_sign_in() {
    let store = Arc::new(SessionStore::new(Arc::new(MemoryBackend::new())));
    let router = RoleRouter::new(Arc::clone(&store));

    match router.resolve(store.read().as_ref()) {
        Resolution::Redirect(redirect) => {
            assert_eq!(redirect.to, "/");
            assert_eq!(redirect.reason, RedirectReason::SessionMissing);
        }
        other => panic!("expected redirect, got {other:?}"),
    }
    assert_eq!(store.phase(), AuthPhase::Unauthenticated);
}

#[tokio::test]
async fn later_login_wins_over_slower_earlier_one() {
    let server = MockServer::start().await;
    mock_coach_login(&server, "a@club.in", "Anna Slow", "org1", 300).await;
    mock_coach_login(&server, "b@club.in", "Ben Fast", "org2", 20).await;

    let store = Arc::new(SessionStore::in_memory());
    let client = KhelClient::new(server.uri()).unwrap();
    let first = CredentialSubmitter::new(client.clone(), Arc::clone(&store));
    let second = CredentialSubmitter::new(client, Arc::clone(&store));

    let (a, b) = tokio::join!(first.submit(Role::Coach, "a@club.in", "pw"), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        second.submit(Role::Coach, "b@club.in", "pw").await
    });

    assert!(matches!(a, Err(SubmitError::Superseded)));
    let b = assert_ok!(b);
    assert_eq!(store.read(), Some(b));
    assert_eq!(
        store.read().unwrap().base_path(),
        "/coach-dashboard/org2/ben-fast"
    );
    assert_eq!(store.phase(), AuthPhase::Authenticated(Role::Coach));
}

#[tokio::test]
async fn response_after_sign_out_is_discarded() {
    let server = MockServer::start().await;
    mock_coach_login(&server, "a@club.in", "Anna Slow", "org1", 200).await;

    let store = Arc::new(SessionStore::in_memory());
    let submitter = CredentialSubmitter::new(KhelClient::new(server.uri()).unwrap(), Arc::clone(&store));

    let (result, ()) = tokio::join!(submitter.submit(Role::Coach, "a@club.in", "pw"), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        store.clear().unwrap();
    });

    assert!(matches!(result, Err(SubmitError::Superseded)));
    assert!(store.read().is_none());
    assert_eq!(store.phase(), AuthPhase::Unauthenticated);
}

#[tokio::test]
async fn phase_is_observable_through_subscription() {
    let server = MockServer::start().await;
    mock_coach_login(&server, "jane@club.in", "Jane Doe", "org1", 50).await;

    let store = Arc::new(SessionStore::in_memory());
    let mut phases = store.subscribe();
    let submitter = CredentialSubmitter::new(KhelClient::new(server.uri()).unwrap(), Arc::clone(&store));

    let (result, seen) = tokio::join!(submitter.submit(Role::Coach, "jane@club.in", "pw"), async {
        assert_ok!(phases.changed().await);
        *phases.borrow_and_update()
    });

    assert_ok!(result);
    assert_eq!(seen, AuthPhase::Authenticating);
    assert_eq!(*phases.borrow(), AuthPhase::Authenticated(Role::Coach));
}

#[test]
fn recovery_is_idempotent_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let first = SessionStore::new(Arc::new(FileBackend::new(&file)));
    first
        .write(Role::MedicalStaff, Profile::member("Dr. Priya Nair", "org5"))
        .unwrap();
    drop(first);

    let store = Arc::new(SessionStore::new(Arc::new(FileBackend::new(&file))));
    let router = RoleRouter::new(Arc::clone(&store));

    let once = router.resolve(None);
    let twice = router.resolve(None);
    assert_eq!(once, twice);
    assert_eq!(
        once.target_path().as_deref(),
        Some("/medicalstaff-dashboard/org5/dr-priya-nair/viewplayers")
    );
    assert_eq!(store.recover().unwrap(), store.recover().unwrap());
}

#[test]
fn every_nav_link_resolves_back_to_its_item() {
    let router = RoleRouter::new(Arc::new(SessionStore::in_memory()));

    for role in Role::ALL {
        let session = Session::new(role, sample_profile(role)).unwrap();
        for item in descriptor::descriptor(role).nav {
            let href = session.path_for(item.path);
            match router.resolve_location(Some(&session), &href) {
                Resolution::Mount(tree) => {
                    assert_eq!(tree.sub_route, SubRoute::Item(item), "{href}");
                    assert_eq!(tree.current_path(), href);
                    assert_eq!(tree.links.iter().filter(|l| l.active).count(), 1);
                }
                other => panic!("{href} did not mount: {other:?}"),
            }
        }

        match router.resolve_location(Some(&session), &session.base_path()) {
            Resolution::Mount(tree) => {
                assert_eq!(tree.sub_route, SubRoute::Index);
                assert_eq!(tree.current_path(), session.default_path());
            }
            other => panic!("base path did not mount: {other:?}"),
        }
    }
}

#[test]
fn deep_link_into_another_role_is_redirected_home() {
    let store = Arc::new(SessionStore::in_memory());
    let router = RoleRouter::new(Arc::clone(&store));
    let athlete = store
        .write(Role::Athlete, Profile::member("Jane Doe", "org1"))
        .unwrap();

    match router.resolve_location(Some(&athlete), "/coach-dashboard/org1/jane-doe/reports") {
        Resolution::Redirect(redirect) => {
            assert_eq!(redirect.reason, RedirectReason::IdentityMismatch);
            assert_eq!(redirect.to, "/athlete-dashboard/org1/jane-doe/home");
        }
        other => panic!("expected redirect, got {other:?}"),
    }
}
