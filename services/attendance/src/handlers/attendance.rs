use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AttendanceServiceError;
use crate::identity::ChatIdentity;
use crate::state::AppState;
use crate::usecase::attendance::{MarkAttendanceInput, MarkAttendanceUseCase, MarkedTodayUseCase};

/// Chat clients forward whatever the user typed; accept a JSON string or number.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawCode {
    Text(String),
    Number(i64),
}

impl RawCode {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(n) => n.to_string(),
        }
    }
}

// ── POST /attendance ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MarkAttendanceRequest {
    pub code: RawCode,
}

#[derive(Serialize)]
pub struct MarkAttendanceResponse {
    pub outcome: &'static str,
    pub message: &'static str,
}

/// Every outcome, including rejections, is a 200 with a distinct `outcome`.
pub async fn mark_attendance(
    identity: ChatIdentity,
    State(state): State<AppState>,
    Json(body): Json<MarkAttendanceRequest>,
) -> Result<Json<MarkAttendanceResponse>, AttendanceServiceError> {
    let usecase = MarkAttendanceUseCase {
        students: state.student_repo(),
        gate: state.gate(),
    };
    let outcome = usecase
        .execute(MarkAttendanceInput {
            chat_id: identity.chat_id,
            code: body.code.into_text(),
        })
        .await?;
    Ok(Json(MarkAttendanceResponse {
        outcome: outcome.kind(),
        message: outcome.message(),
    }))
}

// ── GET /attendance/@me/today ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MarkedTodayResponse {
    pub marked: bool,
}

pub async fn get_marked_today(
    identity: ChatIdentity,
    State(state): State<AppState>,
) -> Result<Json<MarkedTodayResponse>, AttendanceServiceError> {
    let usecase = MarkedTodayUseCase {
        students: state.student_repo(),
        gate: state.gate(),
    };
    let marked = usecase.execute(identity.chat_id).await?;
    Ok(Json(MarkedTodayResponse { marked }))
}
