use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;

use crate::error::AttendanceServiceError;
use crate::identity::ChatIdentity;
use crate::state::AppState;
use crate::usecase::export::{CsvExport, ExportAttendanceUseCase, ExportStudentsUseCase};
use crate::usecase::stats::DailyStatsUseCase;
use crate::usecase::student::DeleteStudentUseCase;

async fn require_admin(
    state: &AppState,
    identity: &ChatIdentity,
) -> Result<(), AttendanceServiceError> {
    if state.admins.contains(identity.chat_id).await {
        Ok(())
    } else {
        Err(AttendanceServiceError::Forbidden)
    }
}

fn csv_attachment(export: CsvExport) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.content,
    )
}

// ── GET /admin/stats ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EarliestMarkResponse {
    pub full_name: String,
    pub time: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub marked_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
pub struct DailyStatsResponse {
    pub day: chrono::NaiveDate,
    pub total: usize,
    pub by_group: BTreeMap<String, usize>,
    pub earliest: Option<EarliestMarkResponse>,
    pub message: String,
}

pub async fn get_stats(
    identity: ChatIdentity,
    State(state): State<AppState>,
) -> Result<Json<DailyStatsResponse>, AttendanceServiceError> {
    require_admin(&state, &identity).await?;
    let usecase = DailyStatsUseCase {
        store: state.attendance_store(),
        clock: state.clock.clone(),
        offset: state.utc_offset,
    };
    let stats = usecase.execute().await?;
    Ok(Json(DailyStatsResponse {
        day: stats.day,
        total: stats.total,
        by_group: stats.by_group,
        earliest: stats.earliest.map(|e| EarliestMarkResponse {
            full_name: e.full_name,
            time: e.local_time,
            marked_at: e.marked_at,
        }),
        message: stats.message,
    }))
}

// ── GET /admin/exports/* ─────────────────────────────────────────────────────

pub async fn export_attendance(
    identity: ChatIdentity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    require_admin(&state, &identity).await?;
    let usecase = ExportAttendanceUseCase {
        store: state.attendance_store(),
        clock: state.clock.clone(),
        offset: state.utc_offset,
    };
    Ok(csv_attachment(usecase.execute().await?))
}

pub async fn export_students(
    identity: ChatIdentity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AttendanceServiceError> {
    require_admin(&state, &identity).await?;
    let usecase = ExportStudentsUseCase {
        repo: state.student_repo(),
    };
    Ok(csv_attachment(usecase.execute().await?))
}

// ── DELETE /admin/students/{chat_id} ─────────────────────────────────────────

pub async fn delete_student(
    identity: ChatIdentity,
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> Result<StatusCode, AttendanceServiceError> {
    require_admin(&state, &identity).await?;
    let usecase = DeleteStudentUseCase {
        repo: state.student_repo(),
    };
    usecase.execute(chat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /admin/admins ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AdminListResponse {
    pub admins: Vec<i64>,
}

pub async fn list_admins(
    identity: ChatIdentity,
    State(state): State<AppState>,
) -> Result<Json<AdminListResponse>, AttendanceServiceError> {
    require_admin(&state, &identity).await?;
    Ok(Json(AdminListResponse {
        admins: state.admins.list().await,
    }))
}

pub async fn add_admin(
    identity: ChatIdentity,
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> Result<StatusCode, AttendanceServiceError> {
    require_admin(&state, &identity).await?;
    if !state.admins.add(chat_id).await? {
        return Err(AttendanceServiceError::AdminAlreadyExists);
    }
    Ok(StatusCode::CREATED)
}

pub async fn remove_admin(
    identity: ChatIdentity,
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> Result<StatusCode, AttendanceServiceError> {
    require_admin(&state, &identity).await?;
    if !state.admins.remove(chat_id).await? {
        return Err(AttendanceServiceError::AdminNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
