use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::types::Student;
use crate::error::AttendanceServiceError;
use crate::identity::ChatIdentity;
use crate::state::AppState;
use crate::usecase::student::{GetStudentUseCase, RegisterStudentInput, RegisterStudentUseCase};

#[derive(Serialize)]
pub struct StudentResponse {
    pub id: String,
    pub chat_id: i64,
    pub full_name: String,
    pub group: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.to_string(),
            chat_id: student.chat_id,
            full_name: student.full_name,
            group: student.group,
            created_at: student.created_at,
        }
    }
}

// ── POST /students ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterStudentRequest {
    pub full_name: String,
    pub group: String,
}

pub async fn register_student(
    identity: ChatIdentity,
    State(state): State<AppState>,
    Json(body): Json<RegisterStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), AttendanceServiceError> {
    let usecase = RegisterStudentUseCase {
        repo: state.student_repo(),
    };
    let student = usecase
        .execute(RegisterStudentInput {
            chat_id: identity.chat_id,
            full_name: body.full_name,
            group: body.group,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(student.into())))
}

// ── GET /students/@me ────────────────────────────────────────────────────────

pub async fn get_me(
    identity: ChatIdentity,
    State(state): State<AppState>,
) -> Result<Json<StudentResponse>, AttendanceServiceError> {
    let usecase = GetStudentUseCase {
        repo: state.student_repo(),
    };
    let student = usecase.execute(identity.chat_id).await?;
    Ok(Json(student.into()))
}
