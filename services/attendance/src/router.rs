use axum::{
    Router,
    routing::{delete, get, post},
};

use rollcall_core::middleware::with_http_layers;

use crate::handlers::{
    admin::{
        add_admin, delete_student, export_attendance, export_students, get_stats, list_admins,
        remove_admin,
    },
    attendance::{get_marked_today, mark_attendance},
    code::get_code,
    health::{healthz, readyz},
    students::{get_me, register_student},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Display
        .route("/code", get(get_code))
        // Students
        .route("/students", post(register_student))
        .route("/students/@me", get(get_me))
        // Attendance
        .route("/attendance", post(mark_attendance))
        .route("/attendance/@me/today", get(get_marked_today))
        // Admin
        .route("/admin/stats", get(get_stats))
        .route("/admin/exports/attendance", get(export_attendance))
        .route("/admin/exports/students", get(export_students))
        .route("/admin/students/{chat_id}", delete(delete_student))
        .route("/admin/admins", get(list_admins))
        .route("/admin/admins/{chat_id}", post(add_admin).delete(remove_admin))
        .with_state(state);
    with_http_layers(router)
}
