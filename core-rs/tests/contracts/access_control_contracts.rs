// Access Control Contract Tests
//
// These tests verify INVARIANTS that MUST NEVER BREAK regardless of implementation.
//
// **Problem**: role gating drifts silently when the backend adds or renames a role
// **Solution**: contracts that pin exact role matching and the explicit unknown-role failure

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hrpay_core::config::SessionSettings;
use hrpay_core::rbac::{dashboard_path, AccessControl, PermissionTable, Role};
use hrpay_core::{ConsoleError, MemoryStorage, SessionStore};
use std::sync::Arc;

fn store_logged_in_as(payload: &str) -> SessionStore {
    let store = SessionStore::new(Arc::new(MemoryStorage::new()), SessionSettings::default());
    store.init();
    store
        .login(&format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload)))
        .unwrap();
    store
}

/// WHY: checkRole(ADMIN) is true only when the role claim is exactly "ADMIN"
/// REASON: Admin-only sections must not leak to HR or MANAGER, or to a
/// differently spelled role the backend never meant as ADMIN
#[test]
fn single_role_check_is_exact() {
    let table = PermissionTable::builtin();
    for (raw, expected) in [
        ("ADMIN", true),
        ("HR", false),
        ("MANAGER", false),
        ("admin", false),
        ("Admin", false),
        (" ADMIN ", false),
    ] {
        let store = store_logged_in_as(&format!(r#"{{"role":"{}"}}"#, raw));
        let access = AccessControl::for_store(&store, table);
        assert_eq!(access.check_role(Role::Admin), expected, "role {}", raw);
    }
}

/// WHY: checkRole([HR, MANAGER]) is true for either member
#[test]
fn role_set_check_is_membership() {
    let table = PermissionTable::builtin();
    for (raw, expected) in [("ADMIN", false), ("HR", true), ("MANAGER", true)] {
        let store = store_logged_in_as(&format!(r#"{{"role":"{}"}}"#, raw));
        let access = AccessControl::for_store(&store, table);
        assert_eq!(access.check_role([Role::Hr, Role::Manager]), expected, "role {}", raw);
    }
}

/// WHY: MANAGER token routes to the manager dashboard
#[test]
fn manager_token_routes_to_manager_dashboard() {
    let store = store_logged_in_as(r#"{"role":"MANAGER"}"#);
    let access = AccessControl::for_store(&store, PermissionTable::builtin());
    assert_eq!(access.dashboard_path().unwrap(), "/manager/dashboard");
}

/// WHY: An unknown role fails loudly instead of defaulting to some dashboard
/// REASON: Backend/frontend role enums drifting apart must surface at once
/// BREAKS: A silent fallback would route unknown users into someone else's dashboard
#[test]
fn unknown_role_is_an_explicit_error() {
    let store = store_logged_in_as(r#"{"role":"UNKNOWN"}"#);
    let access = AccessControl::for_store(&store, PermissionTable::builtin());

    match access.dashboard_path() {
        Err(ConsoleError::UnknownRole(raw)) => assert_eq!(raw, "UNKNOWN"),
        other => panic!("Expected UnknownRole, got {:?}", other),
    }
    assert!(matches!(dashboard_path("UNKNOWN"), Err(ConsoleError::UnknownRole(_))));

    let lowercase = store_logged_in_as(r#"{"role":"manager"}"#);
    let access = AccessControl::for_store(&lowercase, PermissionTable::builtin());
    assert!(matches!(access.dashboard_path(), Err(ConsoleError::UnknownRole(raw)) if raw == "manager"));
}

/// WHY: Dashboard mapping is total over the role set
#[test]
fn every_role_has_a_dashboard() {
    for role in Role::ALL {
        assert_eq!(dashboard_path(role.as_str()).unwrap(), role.dashboard_path());
    }
}

/// WHY: Permission answers follow the session, never a cached grant
/// REASON: After logout every permission must disappear immediately
#[test]
fn permissions_are_recomputed_on_every_read() {
    let store = store_logged_in_as(r#"{"role":"HR"}"#);
    let table = PermissionTable::builtin();
    assert!(AccessControl::for_store(&store, table).check_permission("ctc.manage"));

    store.logout().unwrap();
    assert!(!AccessControl::for_store(&store, table).check_permission("ctc.manage"));
}
