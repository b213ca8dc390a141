//! Integration tests for the session lifecycle
//!
//! Tests the full lifecycle of a console session including:
//! - Startup restore from file-backed storage
//! - Login / logout
//! - Reload within the same session directory
//! - Access checks following each transition

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hrpay_core::config::SessionSettings;
use hrpay_core::modal::{ModalId, ModalPresenter, ModalView, NoScrollLock};
use hrpay_core::rbac::{PermissionTable, Role, RouteDecision};
use hrpay_core::{AccessControl, AppConfig, Console, FileStorage, Session, SessionStore, TokenStorage};
use std::sync::Arc;
use tempfile::TempDir;

fn token_with(payload: &str) -> String {
    format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload))
}

struct SilentPresenter;

impl ModalPresenter for SilentPresenter {
    fn present(&self, _view: &ModalView) {}
    fn close(&self, _id: ModalId) {}
}

#[test]
fn test_complete_session_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(temp_dir.path().join("session")));

    // 1. Fresh start: nothing stored
    let store = SessionStore::new(storage.clone(), SessionSettings::default());
    assert_eq!(store.session(), Session::initial());
    let initial = store.init();
    assert_eq!(initial, Session::anonymous());

    // 2. Login persists the token
    let token = token_with(r#"{"role":"HR","sub":"alice","email":"alice@example.com"}"#);
    store.login(&token).unwrap();
    assert_eq!(storage.load("token").unwrap().as_deref(), Some(token.as_str()));

    let access = AccessControl::for_store(&store, PermissionTable::builtin());
    assert!(access.check_role(Role::Hr));
    assert_eq!(access.dashboard_path().unwrap(), "/hr/dashboard");

    // 3. Reload: a new store over the same storage restores the session
    let reloaded = SessionStore::new(storage.clone(), SessionSettings::default());
    let restored = reloaded.init();
    assert!(restored.is_authenticated);
    assert_eq!(restored.claims.unwrap().username.as_deref(), Some("alice"));

    // 4. Logout returns to the initial unauthenticated state and clears storage
    reloaded.logout().unwrap();
    assert_eq!(reloaded.session(), initial);
    assert_eq!(storage.load("token").unwrap(), None);

    // 5. The first store notices the token is gone
    assert_eq!(store.session(), Session::anonymous());
    assert_eq!(store.token(), None);
}

#[test]
fn test_custom_storage_key() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(temp_dir.path()));
    let settings = SessionSettings { storage_key: "hr_token".to_string(), ..Default::default() };

    let store = SessionStore::new(storage.clone(), settings);
    store.init();
    store.login(&token_with(r#"{"role":"ADMIN"}"#)).unwrap();

    assert!(temp_dir.path().join("hr_token").exists());
    assert!(!temp_dir.path().join("token").exists());
}

#[tokio::test]
async fn test_console_startup_restores_and_gates_routes() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(temp_dir.path()));
    storage.store("token", &token_with(r#"{"role":"MANAGER","sub":"mgr"}"#)).unwrap();

    let console = Console::start(
        AppConfig::default(),
        storage,
        Arc::new(SilentPresenter),
        Arc::new(NoScrollLock),
    )
    .unwrap();

    let access = console.access();
    assert!(access.session().is_authenticated);
    assert_eq!(access.guard_route("/payslips"), RouteDecision::Allow);
    assert_eq!(
        access.guard_route("/ctc"),
        RouteDecision::Forbidden { fallback: "/manager/dashboard" }
    );

    let labels: Vec<&str> = access.visible_menu().iter().map(|m| m.label).collect();
    assert!(!labels.contains(&"Create User"));
    assert!(labels.contains(&"Employees"));
}

#[tokio::test]
async fn test_console_permission_override_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(".hrpay.yaml");
    std::fs::write(
        &config_path,
        "apiVersion: hrpay/v1\nkind: Console\npermissions:\n  MANAGER: [\"payslips.*\"]\n",
    )
    .unwrap();

    let storage = Arc::new(FileStorage::new(temp_dir.path().join("session")));
    storage.store("token", &token_with(r#"{"role":"MANAGER"}"#)).unwrap();

    let console = Console::start(
        AppConfig::load(&config_path).unwrap(),
        storage,
        Arc::new(SilentPresenter),
        Arc::new(NoScrollLock),
    )
    .unwrap();

    assert!(console.require_permission("payslips.generate").is_ok());
    assert!(console.require_permission("employees.view").is_err());
}
