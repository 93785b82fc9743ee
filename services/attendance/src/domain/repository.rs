#![allow(async_fn_in_trait)]

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::types::{AttendanceEntry, AttendanceRecord, InsertOutcome, Student};
use crate::error::AttendanceServiceError;

/// Repository for registered students.
pub trait StudentRepository: Send + Sync {
    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<Student>, AttendanceServiceError>;

    async fn full_name_exists(&self, full_name: &str) -> Result<bool, AttendanceServiceError>;

    /// Insert a student. Unique violations surface as `StudentAlreadyExists`
    /// (chat id) or `FullNameTaken` (full name).
    async fn create(&self, student: &Student) -> Result<(), AttendanceServiceError>;

    /// Delete a student and their attendance. Returns `false` if not found.
    async fn delete_by_chat_id(&self, chat_id: i64) -> Result<bool, AttendanceServiceError>;

    async fn list_all(&self) -> Result<Vec<Student>, AttendanceServiceError>;
}

/// Attendance persistence. Implementations must guarantee at most one record
/// per `(student_id, day)`: a losing concurrent insert reports `Conflict`.
pub trait AttendanceStore: Send + Sync {
    async fn exists(&self, student_id: Uuid, day: NaiveDate) -> Result<bool, AttendanceServiceError>;

    async fn insert(&self, record: &AttendanceRecord) -> Result<InsertOutcome, AttendanceServiceError>;

    /// Records for one local day joined with their students.
    async fn list_by_day(&self, day: NaiveDate) -> Result<Vec<AttendanceEntry>, AttendanceServiceError>;

    /// Every record joined with its student.
    async fn list_all(&self) -> Result<Vec<AttendanceEntry>, AttendanceServiceError>;
}
