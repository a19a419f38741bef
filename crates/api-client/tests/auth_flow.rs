//! Session lifecycle against a loopback server: login, restore, logout.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use rewarddesk_api_client::session::{IDENTITY_KEY, TOKEN_KEY};
use rewarddesk_api_client::{ApiGateway, SessionStore, UsersClient};

const TOKEN: &str = "tok-57a1";

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "op@example.com" && body["password"] == "hunter2" {
        (
            StatusCode::OK,
            Json(json!({
                "token": TOKEN,
                "user": {"email": "op@example.com", "name": "Op", "role": "admin"}
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "invalid credentials"})),
        )
    }
}

async fn list_users(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"));
    if authorized {
        (StatusCode::OK, Json(json!([])))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "missing or invalid token"})),
        )
    }
}

async fn serve() -> String {
    let app = Router::new()
        .route("/admin-auth/login", post(login))
        .route("/admin/users", get(list_users));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn gateway(base: &str) -> Arc<ApiGateway> {
    Arc::new(ApiGateway::new(base, Duration::from_secs(5)).expect("gateway"))
}

#[tokio::test]
async fn login_installs_credential_and_persists_both_keys() {
    let base = serve().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let gw = gateway(&base);
    let session = SessionStore::new(gw.clone(), dir.path());

    let identity = session
        .login("op@example.com", "hunter2")
        .await
        .expect("login");
    assert_eq!(identity.name, "Op");
    assert!(session.is_authenticated());
    assert!(gw.has_credential());
    assert!(dir.path().join(TOKEN_KEY).exists());
    assert!(dir.path().join(IDENTITY_KEY).exists());

    let users = UsersClient::new(gw).list().await.expect("authorized list");
    assert!(users.is_empty());
}

#[tokio::test]
async fn login_failure_propagates_error_and_leaves_state_untouched() {
    let base = serve().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let gw = gateway(&base);
    let session = SessionStore::new(gw.clone(), dir.path());

    let err = session
        .login("op@example.com", "wrong")
        .await
        .expect_err("login must fail");
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "invalid credentials");
    assert!(!session.is_authenticated());
    assert!(!gw.has_credential());
    assert!(!dir.path().join(TOKEN_KEY).exists());
    assert!(!dir.path().join(IDENTITY_KEY).exists());
}

#[tokio::test]
async fn restore_picks_up_persisted_session() {
    let base = serve().await;
    let dir = tempfile::tempdir().expect("tempdir");

    let first = SessionStore::new(gateway(&base), dir.path());
    first
        .login("op@example.com", "hunter2")
        .await
        .expect("login");

    // Fresh process: new gateway, same storage directory.
    let gw = gateway(&base);
    let session = SessionStore::new(gw.clone(), dir.path());
    assert!(session.restore());
    assert!(session.is_authenticated());
    assert_eq!(
        session.identity().expect("identity").email,
        "op@example.com"
    );

    UsersClient::new(gw)
        .list()
        .await
        .expect("restored credential must authorize");
}

#[tokio::test]
async fn restore_on_corrupt_identity_leaves_session_empty() {
    let base = serve().await;
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(TOKEN_KEY), TOKEN).expect("write token");
    std::fs::write(dir.path().join(IDENTITY_KEY), "{not json").expect("write identity");

    let gw = gateway(&base);
    let session = SessionStore::new(gw.clone(), dir.path());
    assert!(!session.restore());
    assert!(!session.is_authenticated());
    assert!(!gw.has_credential());
}

#[tokio::test]
async fn restore_on_empty_directory_is_a_no_op() {
    let base = serve().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let session = SessionStore::new(gateway(&base), dir.path());
    assert!(!session.restore());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn logout_clears_persisted_token_and_gateway_credential() {
    let base = serve().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let gw = gateway(&base);
    let session = SessionStore::new(gw.clone(), dir.path());
    session
        .login("op@example.com", "hunter2")
        .await
        .expect("login");

    session.logout();
    assert!(!session.is_authenticated());
    assert!(!gw.has_credential());
    assert!(!dir.path().join(TOKEN_KEY).exists());
    assert!(!dir.path().join(IDENTITY_KEY).exists());

    let err = UsersClient::new(gw)
        .list()
        .await
        .expect_err("call after logout must be unauthorized");
    assert!(err.is_unauthorized());

    // Idempotent on an already-empty session.
    session.logout();
    assert!(!session.is_authenticated());
}
