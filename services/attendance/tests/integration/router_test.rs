use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

use rollcall_attendance::identity::CHAT_ID_HEADER;
use rollcall_attendance::infra::admins::FileAdminRegistry;
use rollcall_attendance::router::build_router;
use rollcall_attendance::state::AppState;

use crate::helpers::{TTL_SECS, generator, manual_clock, msk};

const ADMIN: i64 = 1;
const STUDENT: i64 = 2;

struct TestApp {
    server: TestServer,
    admins_file: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.admins_file);
    }
}

// No database: only routes that stop before the store are exercised here.
async fn app() -> TestApp {
    let admins_file = std::env::temp_dir().join(format!("rollcall-admins-{}.txt", Uuid::new_v4()));
    let admins = FileAdminRegistry::load(&admins_file, &[ADMIN]).await.unwrap();
    let clock = manual_clock();
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        generator: generator(&clock),
        admins: Arc::new(admins),
        clock,
        utc_offset: msk(),
    };
    TestApp {
        server: TestServer::new(build_router(state)).unwrap(),
        admins_file,
    }
}

fn chat_id(id: i64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(CHAT_ID_HEADER),
        HeaderValue::from(id),
    )
}

#[tokio::test]
async fn healthz_returns_ok() {
    let app = app().await;
    let response = app.server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = app().await;
    let response = app.server.get("/healthz").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn code_endpoint_returns_padded_code_and_countdown() {
    let app = app().await;
    let response = app.server.get("/code").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 4);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(body["time_remaining"], json!(TTL_SECS));
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn mark_attendance_requires_chat_identity() {
    let app = app().await;
    let response = app
        .server
        .post("/attendance")
        .json(&json!({ "code": "1234" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_non_admins() {
    let app = app().await;
    let (name, value) = chat_id(STUDENT);
    let response = app.server.get("/admin/stats").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let body: Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn admins_can_manage_admin_list() {
    let app = app().await;
    let server = &app.server;

    let (name, value) = chat_id(ADMIN);
    let list = server.get("/admin/admins").add_header(name, value).await;
    assert_eq!(list.status_code(), StatusCode::OK);
    assert_eq!(list.json::<Value>(), json!({ "admins": [ADMIN] }));

    let (name, value) = chat_id(ADMIN);
    let added = server
        .post(&format!("/admin/admins/{STUDENT}"))
        .add_header(name, value)
        .await;
    assert_eq!(added.status_code(), StatusCode::CREATED);

    let (name, value) = chat_id(ADMIN);
    let again = server
        .post(&format!("/admin/admins/{STUDENT}"))
        .add_header(name, value)
        .await;
    assert_eq!(again.status_code(), StatusCode::CONFLICT);

    // The new admin is persisted and immediately effective.
    let on_disk = std::fs::read_to_string(&app.admins_file).unwrap();
    assert!(on_disk.lines().any(|l| l.trim() == STUDENT.to_string()));
    let (name, value) = chat_id(STUDENT);
    let list = server.get("/admin/admins").add_header(name, value).await;
    assert_eq!(list.json::<Value>(), json!({ "admins": [ADMIN, STUDENT] }));

    let (name, value) = chat_id(ADMIN);
    let removed = server
        .delete(&format!("/admin/admins/{STUDENT}"))
        .add_header(name, value)
        .await;
    assert_eq!(removed.status_code(), StatusCode::NO_CONTENT);

    let (name, value) = chat_id(ADMIN);
    let missing = server
        .delete(&format!("/admin/admins/{STUDENT}"))
        .add_header(name, value)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(missing.json::<Value>()["kind"], "ADMIN_NOT_FOUND");
}
