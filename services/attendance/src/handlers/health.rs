use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

pub use rollcall_core::health::healthz;

/// Ready once the database answers.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    rollcall_core::health::readiness(&state.db).await
}
