use std::sync::Arc;

use chrono::FixedOffset;
use tracing::{debug, info};
use uuid::Uuid;

use rollcall_core::clock::Clock;

use crate::domain::code_generator::CodeGenerator;
use crate::domain::repository::{AttendanceStore, StudentRepository};
use crate::domain::types::{AttendanceRecord, InsertOutcome, MarkOutcome, local_day};
use crate::error::AttendanceServiceError;

// ── AttendanceGate ───────────────────────────────────────────────────────────

/// Decides whether a submitted code marks a student present today.
pub struct AttendanceGate<S: AttendanceStore> {
    pub store: S,
    pub generator: Arc<CodeGenerator>,
    pub clock: Arc<dyn Clock>,
    /// Offset that defines "today".
    pub offset: FixedOffset,
}

impl<S: AttendanceStore> AttendanceGate<S> {
    /// Checks run in a fixed order so the caller gets the most specific answer:
    /// malformed text, then code validity, then the per-day duplicate check.
    /// Store failures are returned as errors, never as a rejection.
    pub async fn try_mark(
        &self,
        student_id: Uuid,
        raw_code: &str,
    ) -> Result<MarkOutcome, AttendanceServiceError> {
        // 1. Parse → no oracle or store access on garbage input
        let Ok(candidate) = raw_code.trim().parse::<i64>() else {
            debug!(%student_id, "malformed attendance code");
            return Ok(MarkOutcome::RejectedMalformedInput);
        };

        // 2. Code must be the live one and unexpired (never rotates)
        if !self.generator.is_valid(candidate) {
            debug!(%student_id, "invalid or expired attendance code");
            return Ok(MarkOutcome::RejectedInvalidCode);
        }

        // 3. One mark per student per local day
        let now = self.clock.now();
        let day = local_day(now, &self.offset);
        if self.store.exists(student_id, day).await? {
            return Ok(MarkOutcome::RejectedAlreadyMarked);
        }

        // 4. Insert; a concurrent winner shows up as a conflict
        let record = AttendanceRecord {
            id: Uuid::now_v7(),
            student_id,
            day,
            marked_at: now,
        };
        match self.store.insert(&record).await? {
            InsertOutcome::Inserted => {
                info!(%student_id, %day, "attendance marked");
                Ok(MarkOutcome::Accepted)
            }
            InsertOutcome::Conflict => {
                debug!(%student_id, %day, "lost attendance insert race");
                Ok(MarkOutcome::RejectedAlreadyMarked)
            }
        }
    }

    pub async fn is_marked_today(&self, student_id: Uuid) -> Result<bool, AttendanceServiceError> {
        let day = local_day(self.clock.now(), &self.offset);
        self.store.exists(student_id, day).await
    }
}

// ── MarkAttendance ───────────────────────────────────────────────────────────

pub struct MarkAttendanceInput {
    pub chat_id: i64,
    pub code: String,
}

/// Resolves the submitting chat user to a registered student, then runs the gate.
pub struct MarkAttendanceUseCase<R, S>
where
    R: StudentRepository,
    S: AttendanceStore,
{
    pub students: R,
    pub gate: AttendanceGate<S>,
}

impl<R, S> MarkAttendanceUseCase<R, S>
where
    R: StudentRepository,
    S: AttendanceStore,
{
    pub async fn execute(
        &self,
        input: MarkAttendanceInput,
    ) -> Result<MarkOutcome, AttendanceServiceError> {
        let student = self
            .students
            .find_by_chat_id(input.chat_id)
            .await?
            .ok_or(AttendanceServiceError::StudentNotFound)?;
        self.gate.try_mark(student.id, &input.code).await
    }
}

// ── MarkedToday ──────────────────────────────────────────────────────────────

pub struct MarkedTodayUseCase<R, S>
where
    R: StudentRepository,
    S: AttendanceStore,
{
    pub students: R,
    pub gate: AttendanceGate<S>,
}

impl<R, S> MarkedTodayUseCase<R, S>
where
    R: StudentRepository,
    S: AttendanceStore,
{
    pub async fn execute(&self, chat_id: i64) -> Result<bool, AttendanceServiceError> {
        let student = self
            .students
            .find_by_chat_id(chat_id)
            .await?
            .ok_or(AttendanceServiceError::StudentNotFound)?;
        self.gate.is_marked_today(student.id).await
    }
}
