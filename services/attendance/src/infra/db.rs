use anyhow::Context as _;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, sea_query::OnConflict,
};
use uuid::Uuid;

use rollcall_attendance_schema::{attendances, students};

use crate::domain::repository::{AttendanceStore, StudentRepository};
use crate::domain::types::{AttendanceEntry, AttendanceRecord, InsertOutcome, Student};
use crate::error::AttendanceServiceError;

/// Connection-level failures become `StoreUnavailable` so callers can retry;
/// anything else is an internal error.
fn store_error(context: &'static str) -> impl FnOnce(DbErr) -> AttendanceServiceError {
    move |e| match e {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            AttendanceServiceError::StoreUnavailable(anyhow::Error::new(e).context(context))
        }
        other => AttendanceServiceError::Internal(anyhow::Error::new(other).context(context)),
    }
}

// ── Student repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStudentRepository {
    pub db: DatabaseConnection,
}

impl StudentRepository for DbStudentRepository {
    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<Student>, AttendanceServiceError> {
        let model = students::Entity::find()
            .filter(students::Column::ChatId.eq(chat_id))
            .one(&self.db)
            .await
            .map_err(store_error("find student by chat id"))?;
        Ok(model.map(student_from_model))
    }

    async fn full_name_exists(&self, full_name: &str) -> Result<bool, AttendanceServiceError> {
        let count = students::Entity::find()
            .filter(students::Column::FullName.eq(full_name))
            .count(&self.db)
            .await
            .context("check student full name")?;
        Ok(count > 0)
    }

    async fn create(&self, student: &Student) -> Result<(), AttendanceServiceError> {
        let result = students::ActiveModel {
            id: Set(student.id),
            chat_id: Set(student.chat_id),
            full_name: Set(student.full_name.clone()),
            group_name: Set(student.group.clone()),
            created_at: Set(student.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            // Lost a race with a concurrent registration.
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("full_name") => {
                    Err(AttendanceServiceError::FullNameTaken)
                }
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AttendanceServiceError::StudentAlreadyExists)
                }
                _ => Err(anyhow::Error::new(e).context("create student").into()),
            },
        }
    }

    async fn delete_by_chat_id(&self, chat_id: i64) -> Result<bool, AttendanceServiceError> {
        let result = students::Entity::delete_many()
            .filter(students::Column::ChatId.eq(chat_id))
            .exec(&self.db)
            .await
            .context("delete student")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_all(&self) -> Result<Vec<Student>, AttendanceServiceError> {
        let models = students::Entity::find()
            .order_by_asc(students::Column::GroupName)
            .order_by_asc(students::Column::FullName)
            .all(&self.db)
            .await
            .context("list students")?;
        Ok(models.into_iter().map(student_from_model).collect())
    }
}

fn student_from_model(model: students::Model) -> Student {
    Student {
        id: model.id,
        chat_id: model.chat_id,
        full_name: model.full_name,
        group: model.group_name,
        created_at: model.created_at,
    }
}

// ── Attendance store ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceStore {
    pub db: DatabaseConnection,
}

impl AttendanceStore for DbAttendanceStore {
    async fn exists(&self, student_id: Uuid, day: NaiveDate) -> Result<bool, AttendanceServiceError> {
        let count = attendances::Entity::find()
            .filter(attendances::Column::StudentId.eq(student_id))
            .filter(attendances::Column::Day.eq(day))
            .count(&self.db)
            .await
            .map_err(store_error("check attendance"))?;
        Ok(count > 0)
    }

    async fn insert(&self, record: &AttendanceRecord) -> Result<InsertOutcome, AttendanceServiceError> {
        let model = attendances::ActiveModel {
            id: Set(record.id),
            student_id: Set(record.student_id),
            day: Set(record.day),
            marked_at: Set(record.marked_at),
        };
        // `uq_attendances_student_day` decides concurrent submissions.
        let inserted = attendances::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    attendances::Column::StudentId,
                    attendances::Column::Day,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;
        match inserted {
            Ok(0) | Err(DbErr::RecordNotInserted) => Ok(InsertOutcome::Conflict),
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) => Err(store_error("insert attendance")(e)),
        }
    }

    async fn list_by_day(&self, day: NaiveDate) -> Result<Vec<AttendanceEntry>, AttendanceServiceError> {
        let rows = attendances::Entity::find()
            .filter(attendances::Column::Day.eq(day))
            .find_also_related(students::Entity)
            .order_by_asc(attendances::Column::MarkedAt)
            .all(&self.db)
            .await
            .map_err(store_error("list attendance by day"))?;
        Ok(rows.into_iter().filter_map(entry_from_models).collect())
    }

    async fn list_all(&self) -> Result<Vec<AttendanceEntry>, AttendanceServiceError> {
        let rows = attendances::Entity::find()
            .find_also_related(students::Entity)
            .order_by_asc(attendances::Column::Day)
            .order_by_asc(attendances::Column::MarkedAt)
            .all(&self.db)
            .await
            .map_err(store_error("list attendance"))?;
        Ok(rows.into_iter().filter_map(entry_from_models).collect())
    }
}

fn entry_from_models(
    (attendance, student): (attendances::Model, Option<students::Model>),
) -> Option<AttendanceEntry> {
    // The FK cascades, so a missing student means a row deleted mid-query.
    let student = student?;
    Some(AttendanceEntry {
        record: AttendanceRecord {
            id: attendance.id,
            student_id: attendance.student_id,
            day: attendance.day,
            marked_at: attendance.marked_at,
        },
        full_name: student.full_name,
        group: student.group_name,
    })
}
