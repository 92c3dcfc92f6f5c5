// tests/auth_test.rs — Integration test: login, signup, logout, restore

use std::sync::Arc;

use pretty_assertions::assert_eq;
use reqanalyzer::auth::{AuthGate, User, DEMO_EMAIL, DEMO_NAME, DEMO_PASSWORD};
use reqanalyzer::infra::errors::AuthError;
use reqanalyzer::store::{FileStore, KeyValueStore, MemoryStore, CURRENT_USER_KEY};

fn gate() -> (Arc<MemoryStore>, AuthGate) {
    let store = Arc::new(MemoryStore::new());
    let gate = AuthGate::new(store.clone());
    (store, gate)
}

#[test]
fn test_demo_login_persists_user() {
    let (store, gate) = gate();

    let user = gate.login(DEMO_EMAIL, DEMO_PASSWORD).unwrap();
    assert_eq!(user, User::new(DEMO_EMAIL, DEMO_NAME));
    assert!(store.get(CURRENT_USER_KEY).unwrap().is_some());
    assert_eq!(gate.restore_session(), Some(user));
}

#[test]
fn test_wrong_password_is_rejected() {
    let (store, gate) = gate();

    let err = gate.login(DEMO_EMAIL, "hunter2").unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(
        err.to_string(),
        "Invalid email or password. Use demo@example.com / password"
    );
    assert!(store.is_empty());
}

#[test]
fn test_signup_requires_every_field() {
    let (_store, gate) = gate();

    for (email, password, name) in [
        ("", "pw", "Ana"),
        ("ana@x.io", "", "Ana"),
        ("ana@x.io", "pw", ""),
    ] {
        let err = gate.signup(email, password, name).unwrap_err();
        assert!(matches!(err, AuthError::MissingFields));
    }
    assert_eq!(gate.restore_session(), None);
}

#[test]
fn test_signup_logs_in_new_user() {
    let (_store, gate) = gate();

    let user = gate.signup("ana@x.io", "pw", "Ana").unwrap();
    assert_eq!(user.name, "Ana");
    assert_eq!(gate.restore_session(), Some(user));
}

#[test]
fn test_logout_clears_user() {
    let (store, gate) = gate();

    gate.login(DEMO_EMAIL, DEMO_PASSWORD).unwrap();
    gate.logout().unwrap();

    assert_eq!(gate.restore_session(), None);
    assert_eq!(store.get(CURRENT_USER_KEY).unwrap(), None);
}

#[test]
fn test_malformed_user_is_logged_out() {
    let (store, gate) = gate();
    store.set(CURRENT_USER_KEY, "not json").unwrap();

    assert_eq!(gate.restore_session(), None);
}

#[test]
fn test_reset_always_acknowledges() {
    let (store, gate) = gate();

    let ack = gate.request_password_reset("nobody@nowhere.dev");
    assert_eq!(
        ack.message(),
        "If an account exists for nobody@nowhere.dev, a reset link has been sent."
    );
    assert!(store.is_empty());
}

#[test]
fn test_login_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let gate = AuthGate::new(Arc::new(FileStore::new(dir.path())));
        gate.login(DEMO_EMAIL, DEMO_PASSWORD).unwrap();
    }

    let gate = AuthGate::new(Arc::new(FileStore::new(dir.path())));
    assert_eq!(gate.restore_session().map(|u| u.name), Some(DEMO_NAME.to_string()));
}
