use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::StudentRepository;
use crate::domain::types::Student;
use crate::error::AttendanceServiceError;

// ── RegisterStudent ──────────────────────────────────────────────────────────

pub struct RegisterStudentInput {
    pub chat_id: i64,
    pub full_name: String,
    pub group: String,
}

pub struct RegisterStudentUseCase<R: StudentRepository> {
    pub repo: R,
}

impl<R: StudentRepository> RegisterStudentUseCase<R> {
    pub async fn execute(&self, input: RegisterStudentInput) -> Result<Student, AttendanceServiceError> {
        let full_name = input.full_name.trim();
        let group = input.group.trim();
        if full_name.is_empty() || group.is_empty() {
            return Err(AttendanceServiceError::MissingData);
        }
        if self.repo.find_by_chat_id(input.chat_id).await?.is_some() {
            return Err(AttendanceServiceError::StudentAlreadyExists);
        }
        if self.repo.full_name_exists(full_name).await? {
            return Err(AttendanceServiceError::FullNameTaken);
        }
        let student = Student {
            id: Uuid::now_v7(),
            chat_id: input.chat_id,
            full_name: full_name.to_owned(),
            group: group.to_owned(),
            created_at: Utc::now(),
        };
        self.repo.create(&student).await?;
        info!(chat_id = student.chat_id, group = %student.group, "student registered");
        Ok(student)
    }
}

// ── GetStudent ───────────────────────────────────────────────────────────────

pub struct GetStudentUseCase<R: StudentRepository> {
    pub repo: R,
}

impl<R: StudentRepository> GetStudentUseCase<R> {
    pub async fn execute(&self, chat_id: i64) -> Result<Student, AttendanceServiceError> {
        self.repo
            .find_by_chat_id(chat_id)
            .await?
            .ok_or(AttendanceServiceError::StudentNotFound)
    }
}

// ── DeleteStudent ────────────────────────────────────────────────────────────

pub struct DeleteStudentUseCase<R: StudentRepository> {
    pub repo: R,
}

impl<R: StudentRepository> DeleteStudentUseCase<R> {
    pub async fn execute(&self, chat_id: i64) -> Result<(), AttendanceServiceError> {
        if !self.repo.delete_by_chat_id(chat_id).await? {
            return Err(AttendanceServiceError::StudentNotFound);
        }
        info!(chat_id, "student deleted");
        Ok(())
    }
}
