use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

// ── GET /code ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CodeResponse {
    #[serde(serialize_with = "rollcall_core::serde::to_padded_code")]
    pub code: u16,
    pub time_remaining: i64,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Display read: returns the live code, rotating it first if expired.
pub async fn get_code(State(state): State<AppState>) -> Json<CodeResponse> {
    let snapshot = state.generator.snapshot();
    Json(CodeResponse {
        code: snapshot.code,
        time_remaining: snapshot.time_remaining,
        expires_at: snapshot.expires_at,
    })
}
