use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use uuid::Uuid;

/// Smallest code the generator can produce.
pub const CODE_MIN: u16 = 1000;

/// Largest code the generator can produce.
pub const CODE_MAX: u16 = 9999;

/// Default validity window of a display code, in seconds.
pub const DEFAULT_CODE_TTL_SECS: i64 = 20;

/// Group label used in statistics for students registered without a group.
pub const NO_GROUP: &str = "no group";

/// A student registered through the chat front end.
#[derive(Debug, Clone)]
pub struct Student {
    pub id: Uuid,
    pub chat_id: i64,
    pub full_name: String,
    pub group: String,
    pub created_at: DateTime<Utc>,
}

/// One accepted attendance mark.
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    /// Local calendar day the mark counts for.
    pub day: NaiveDate,
    pub marked_at: DateTime<Utc>,
}

/// Attendance record joined with the student it belongs to (reports only).
#[derive(Debug, Clone)]
pub struct AttendanceEntry {
    pub record: AttendanceRecord,
    pub full_name: String,
    pub group: String,
}

/// Result of inserting an attendance record under the `(student, day)` uniqueness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Conflict,
}

/// Every attendance submission resolves to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Accepted,
    RejectedInvalidCode,
    RejectedAlreadyMarked,
    RejectedMalformedInput,
}

impl MarkOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::RejectedInvalidCode => "INVALID_CODE",
            Self::RejectedAlreadyMarked => "ALREADY_MARKED",
            Self::RejectedMalformedInput => "MALFORMED_CODE",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Accepted => "attendance marked",
            Self::RejectedInvalidCode => "invalid or expired code",
            Self::RejectedAlreadyMarked => "attendance already marked today",
            Self::RejectedMalformedInput => "code must be a number",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Calendar day of `at` as seen in `offset`.
pub fn local_day(at: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    at.with_timezone(offset).date_naive()
}
