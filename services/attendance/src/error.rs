use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Attendance service error variants.
///
/// Code rejections and duplicate marks are not errors: they are
/// [`MarkOutcome`](crate::domain::types::MarkOutcome) values.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error("student not found")]
    StudentNotFound,
    #[error("student already registered")]
    StudentAlreadyExists,
    #[error("full name already taken")]
    FullNameTaken,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("admin not found")]
    AdminNotFound,
    #[error("admin already exists")]
    AdminAlreadyExists,
    #[error("attendance store unavailable")]
    StoreUnavailable(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AttendanceServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StudentNotFound => "STUDENT_NOT_FOUND",
            Self::StudentAlreadyExists => "STUDENT_ALREADY_EXISTS",
            Self::FullNameTaken => "FULL_NAME_TAKEN",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::AdminNotFound => "ADMIN_NOT_FOUND",
            Self::AdminAlreadyExists => "ADMIN_ALREADY_EXISTS",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AttendanceServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::StudentNotFound | Self::AdminNotFound => StatusCode::NOT_FOUND,
            Self::StudentAlreadyExists | Self::FullNameTaken | Self::AdminAlreadyExists => {
                StatusCode::CONFLICT
            }
            Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client outcomes; TraceLayer already records them.
        match &self {
            Self::StoreUnavailable(e) => {
                tracing::error!(error = %e, kind = self.kind(), "attendance store unavailable");
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = self.kind(), "internal error");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
