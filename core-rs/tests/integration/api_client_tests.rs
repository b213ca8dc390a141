//! Integration tests for the backend API client
//!
//! Runs the client against a one-shot HTTP stub on a local socket and checks:
//! - login stores the issued token
//! - bearer header on protected calls
//! - status → error mapping
//! - validation happens before any request

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hrpay_core::config::{ApiSettings, SessionSettings};
use hrpay_core::rbac::Role;
use hrpay_core::{
    ApiClient, ConsoleError, LoginForm, MemoryStorage, NewUser, Session, SessionStore, UserStat,
    ViewScope,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

fn token_with(payload: &str) -> String {
    format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload))
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|l| {
                    let lower = l.to_ascii_lowercase();
                    lower.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Serve one canned response; the handle yields the raw request.
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{}", addr), handle)
}

fn client(base_url: &str) -> (ApiClient, Arc<SessionStore>) {
    let session = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new()), SessionSettings::default()));
    session.init();
    let settings = ApiSettings { base_url: base_url.to_string(), timeout_secs: 5 };
    (ApiClient::new(&settings, session.clone()).unwrap(), session)
}

#[tokio::test]
async fn test_login_starts_session() {
    let body: &'static str = Box::leak(
        format!(r#"{{"token":"{}"}}"#, token_with(r#"{"role":"HR","sub":"alice"}"#)).into_boxed_str(),
    );
    let (url, server) = serve_once(200, body).await;
    let (api, session) = client(&url);

    let form = LoginForm { username: "alice".to_string(), password: "pw".to_string() };
    let started = api.login(&form).await.unwrap();
    assert!(started.is_authenticated);
    assert_eq!(started.claims.unwrap().role.as_deref(), Some("HR"));
    assert!(session.token().is_some());

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /admin/login "));
    assert!(request.contains(r#""username":"alice""#));
}

#[tokio::test]
async fn test_rejected_login_stays_anonymous() {
    let (url, server) = serve_once(401, r#"{"message":"Invalid credentials"}"#).await;
    let (api, session) = client(&url);

    let form = LoginForm { username: "alice".to_string(), password: "wrong".to_string() };
    match api.login(&form).await {
        Err(err @ ConsoleError::Auth(_)) => {
            assert!(err.to_string().contains("Invalid credentials"));
            assert!(err.user_message().contains("Invalid credentials"));
        }
        other => panic!("Expected Auth error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(session.session(), Session::anonymous());
    server.await.unwrap();
}

#[tokio::test]
async fn test_protected_call_sends_bearer_token() {
    let (url, server) = serve_once(200, r#"{"data":[{"id":1},{"id":2}]}"#).await;
    let (api, session) = client(&url);
    let token = token_with(r#"{"role":"MANAGER"}"#);
    session.login(&token).unwrap();

    let employees = api.list_employees().await.unwrap();
    assert_eq!(employees.len(), 2);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /onboard-employee/employees "));
    assert!(request
        .to_ascii_lowercase()
        .contains(&format!("authorization: bearer {}", token.to_ascii_lowercase())));
}

#[tokio::test]
async fn test_protected_call_without_session_sends_nothing() {
    // Nothing listens here; an attempted request would be a Network error
    let (api, _) = client("http://127.0.0.1:9");
    assert!(matches!(api.list_users().await, Err(ConsoleError::Auth(_))));
}

#[tokio::test]
async fn test_unauthorized_response_ends_session() {
    let (url, server) = serve_once(401, r#"{"message":"jwt expired"}"#).await;
    let (api, session) = client(&url);
    session.login(&token_with(r#"{"role":"ADMIN"}"#)).unwrap();

    let err = api.user_stat(UserStat::Total).await.unwrap_err();
    assert!(err.requires_login());
    assert_eq!(session.session(), Session::anonymous());
    server.await.unwrap();
}

#[tokio::test]
async fn test_forbidden_response_keeps_session() {
    let (url, server) = serve_once(403, r#"{"message":"Managers cannot list users"}"#).await;
    let (api, session) = client(&url);
    session.login(&token_with(r#"{"role":"MANAGER"}"#)).unwrap();

    let err = api.list_users().await.unwrap_err();
    match &err {
        ConsoleError::Forbidden(msg) => assert!(msg.contains("Managers cannot list users")),
        other => panic!("Expected Forbidden, got {:?}", other),
    }
    assert!(!err.requires_login());
    assert!(session.session().is_authenticated);
    server.await.unwrap();
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let (url, server) = serve_once(500, r#"{"error":"database unavailable"}"#).await;
    let (api, session) = client(&url);
    session.login(&token_with(r#"{"role":"ADMIN"}"#)).unwrap();

    match api.payroll_stats().await {
        Err(ConsoleError::Network(msg)) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("database unavailable"));
        }
        other => panic!("Expected Network error, got {:?}", other),
    }
    assert!(session.session().is_authenticated);
    server.await.unwrap();
}

#[tokio::test]
async fn test_stat_count_is_parsed() {
    let (url, server) = serve_once(200, r#"{"count":42}"#).await;
    let (api, session) = client(&url);
    session.login(&token_with(r#"{"role":"HR"}"#)).unwrap();

    assert_eq!(api.user_stat(UserStat::Hr).await.unwrap(), 42);
    assert!(server.await.unwrap().starts_with("GET /stats/users/hr "));
}

#[tokio::test]
async fn test_password_mismatch_is_caught_before_sending() {
    let (api, session) = client("http://127.0.0.1:9");
    session.login(&token_with(r#"{"role":"ADMIN"}"#)).unwrap();

    let user = NewUser {
        username: "jane".to_string(),
        email: "jane@example.com".to_string(),
        password: "secret1".to_string(),
        confirm_password: "secret2".to_string(),
        role: Role::Hr,
    };
    assert!(matches!(api.create_user(&user).await, Err(ConsoleError::Validation(_))));
}

#[tokio::test]
async fn test_closed_view_abandons_request() {
    let (api, session) = client("http://127.0.0.1:9");
    session.login(&token_with(r#"{"role":"ADMIN"}"#)).unwrap();

    let scope = ViewScope::new();
    scope.close();
    assert!(scope.run(api.list_users()).await.is_none());
}
