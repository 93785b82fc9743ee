use std::sync::Arc;

use chrono::FixedOffset;
use sea_orm::DatabaseConnection;

use rollcall_core::clock::Clock;

use crate::domain::code_generator::CodeGenerator;
use crate::infra::admins::FileAdminRegistry;
use crate::infra::db::{DbAttendanceStore, DbStudentRepository};
use crate::usecase::attendance::AttendanceGate;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub generator: Arc<CodeGenerator>,
    pub admins: Arc<FileAdminRegistry>,
    pub clock: Arc<dyn Clock>,
    pub utc_offset: FixedOffset,
}

impl AppState {
    pub fn student_repo(&self) -> DbStudentRepository {
        DbStudentRepository {
            db: self.db.clone(),
        }
    }

    pub fn attendance_store(&self) -> DbAttendanceStore {
        DbAttendanceStore {
            db: self.db.clone(),
        }
    }

    pub fn gate(&self) -> AttendanceGate<DbAttendanceStore> {
        AttendanceGate {
            store: self.attendance_store(),
            generator: self.generator.clone(),
            clock: self.clock.clone(),
            offset: self.utc_offset,
        }
    }
}
