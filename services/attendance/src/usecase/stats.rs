use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use rollcall_core::clock::Clock;

use crate::domain::repository::AttendanceStore;
use crate::domain::types::{AttendanceEntry, NO_GROUP, local_day};
use crate::error::AttendanceServiceError;

/// Earliest mark of the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarliestMark {
    pub full_name: String,
    pub marked_at: DateTime<Utc>,
    /// `HH:MM:SS` in the configured offset.
    pub local_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStats {
    pub day: NaiveDate,
    pub total: usize,
    pub by_group: BTreeMap<String, usize>,
    pub earliest: Option<EarliestMark>,
    pub message: String,
}

pub(crate) fn group_label(group: &str) -> &str {
    if group.is_empty() { NO_GROUP } else { group }
}

/// Aggregate one day's entries.
pub fn summarize_day(day: NaiveDate, entries: &[AttendanceEntry], offset: &FixedOffset) -> DailyStats {
    let mut by_group = BTreeMap::new();
    for entry in entries {
        *by_group
            .entry(group_label(&entry.group).to_owned())
            .or_insert(0) += 1;
    }
    let earliest = entries
        .iter()
        .min_by_key(|e| e.record.marked_at)
        .map(|e| EarliestMark {
            full_name: e.full_name.clone(),
            marked_at: e.record.marked_at,
            local_time: e
                .record
                .marked_at
                .with_timezone(offset)
                .format("%H:%M:%S")
                .to_string(),
        });
    let total = entries.len();
    let message = if total == 0 {
        "nobody has marked attendance today".to_owned()
    } else {
        format!("{total} students marked attendance today")
    };
    DailyStats {
        day,
        total,
        by_group,
        earliest,
        message,
    }
}

pub struct DailyStatsUseCase<S: AttendanceStore> {
    pub store: S,
    pub clock: Arc<dyn Clock>,
    pub offset: FixedOffset,
}

impl<S: AttendanceStore> DailyStatsUseCase<S> {
    pub async fn execute(&self) -> Result<DailyStats, AttendanceServiceError> {
        let day = local_day(self.clock.now(), &self.offset);
        let entries = self.store.list_by_day(day).await?;
        Ok(summarize_day(day, &entries, &self.offset))
    }
}
