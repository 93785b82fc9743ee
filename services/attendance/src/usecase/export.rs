//! CSV exports for administrators.
//!
//! The attendance export groups rows by day and appends per-day and overall
//! per-group statistics, so it reads as a report when opened in a
//! spreadsheet.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::FixedOffset;

use rollcall_core::clock::Clock;

use crate::domain::repository::{AttendanceStore, StudentRepository};
use crate::domain::types::{AttendanceEntry, Student};
use crate::error::AttendanceServiceError;
use crate::usecase::stats::group_label;

const DATE_FORMAT: &str = "%d-%m-%Y";

/// A rendered export ready to be served as an attachment.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

/// Quote a field if it contains a delimiter, quote or line break.
fn csv_escape(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_owned()
    }
}

fn push_row(buf: &mut String, fields: [&str; 3]) {
    let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
    buf.push_str(&row.join(","));
    buf.push('\n');
}

fn count_by_group<'a>(entries: impl Iterator<Item = &'a AttendanceEntry>) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(group_label(&entry.group)).or_insert(0) += 1;
    }
    counts
}

/// Render attendance entries as a day-grouped report. Dates are the local
/// days stored on the records.
pub fn render_attendance_csv(entries: &[AttendanceEntry]) -> String {
    let mut sorted: Vec<&AttendanceEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        (a.record.day, &a.group, &a.full_name).cmp(&(b.record.day, &b.group, &b.full_name))
    });

    let mut buf = String::new();
    push_row(&mut buf, ["Date", "Full name", "Group"]);
    if sorted.is_empty() {
        return buf;
    }

    let separator = "-".repeat(50);
    for day_entries in sorted.chunk_by(|a, b| a.record.day == b.record.day) {
        let date = day_entries[0].record.day.format(DATE_FORMAT).to_string();
        for entry in day_entries {
            push_row(&mut buf, [&date, &entry.full_name, &entry.group]);
        }

        push_row(&mut buf, ["", "", ""]);
        push_row(&mut buf, ["", &format!("STATISTICS FOR {date}:"), ""]);
        for (group, count) in count_by_group(day_entries.iter().copied()) {
            push_row(
                &mut buf,
                ["", &format!("  Group {group}:"), &format!("{count} people")],
            );
        }
        push_row(
            &mut buf,
            ["", "  Total visits:", &format!("{} people", day_entries.len())],
        );
        push_row(&mut buf, ["", "", ""]);
        push_row(&mut buf, ["", &separator, ""]);
        push_row(&mut buf, ["", "", ""]);
    }

    push_row(&mut buf, ["", "OVERALL STATISTICS BY GROUP:", ""]);
    for (group, count) in count_by_group(sorted.iter().copied()) {
        push_row(
            &mut buf,
            ["", &format!("  Group {group}:"), &format!("{count} visits")],
        );
    }
    buf
}

/// Render the student roster sorted by group, name and chat id.
pub fn render_students_csv(students: &[Student]) -> String {
    let mut sorted: Vec<&Student> = students.iter().collect();
    sorted.sort_by(|a, b| (&a.group, &a.full_name, a.chat_id).cmp(&(&b.group, &b.full_name, b.chat_id)));

    let mut buf = String::new();
    push_row(&mut buf, ["Group", "Full name", "Chat ID"]);
    for student in sorted {
        push_row(
            &mut buf,
            [&student.group, &student.full_name, &student.chat_id.to_string()],
        );
    }
    buf
}

// ── ExportAttendance ─────────────────────────────────────────────────────────

pub struct ExportAttendanceUseCase<S: AttendanceStore> {
    pub store: S,
    pub clock: Arc<dyn Clock>,
    pub offset: FixedOffset,
}

impl<S: AttendanceStore> ExportAttendanceUseCase<S> {
    pub async fn execute(&self) -> Result<CsvExport, AttendanceServiceError> {
        let entries = self.store.list_all().await?;
        let stamp = self
            .clock
            .now()
            .with_timezone(&self.offset)
            .format(DATE_FORMAT);
        Ok(CsvExport {
            file_name: format!("attendance_{stamp}.csv"),
            content: render_attendance_csv(&entries),
        })
    }
}

// ── ExportStudents ───────────────────────────────────────────────────────────

pub struct ExportStudentsUseCase<R: StudentRepository> {
    pub repo: R,
}

impl<R: StudentRepository> ExportStudentsUseCase<R> {
    pub async fn execute(&self) -> Result<CsvExport, AttendanceServiceError> {
        let students = self.repo.list_all().await?;
        Ok(CsvExport {
            file_name: "students.csv".to_owned(),
            content: render_students_csv(&students),
        })
    }
}
