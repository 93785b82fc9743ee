use std::num::ParseIntError;
use std::path::PathBuf;

use chrono::FixedOffset;

use rollcall_core::tracing::LogFormat;

use crate::domain::types::DEFAULT_CODE_TTL_SECS;

/// Attendance service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AttendanceConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3114). Env var: `ATTENDANCE_PORT`.
    pub attendance_port: u16,
    /// Validity window of a display code in seconds (default 20). Env var: `CODE_TTL_SECS`.
    pub code_ttl_secs: i64,
    /// Offset that defines the attendance day (default `+03:00`). Env var: `UTC_OFFSET`.
    pub utc_offset: FixedOffset,
    /// Initial admins, used only when the admin file does not exist yet. Env var: `ADMIN_IDS`.
    pub admin_ids: Vec<i64>,
    /// Line-delimited admin list (default `admins.txt`). Env var: `ADMINS_FILE`.
    pub admins_file: PathBuf,
    /// Draw the live code on the service's terminal. Env var: `DISPLAY_CONSOLE`.
    pub display_console: bool,
    /// `json` (default) or `pretty`. Env var: `LOG_FORMAT`.
    pub log_format: LogFormat,
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a comma-separated list of chat ids, ignoring empty items.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, ParseIntError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AttendanceConfig {
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is missing or any variable is malformed.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            attendance_port: var("ATTENDANCE_PORT")
                .map(|v| v.parse().expect("ATTENDANCE_PORT must be a port number"))
                .unwrap_or(3114),
            code_ttl_secs: var("CODE_TTL_SECS")
                .map(|v| v.parse().expect("CODE_TTL_SECS must be an integer"))
                .unwrap_or(DEFAULT_CODE_TTL_SECS),
            utc_offset: var("UTC_OFFSET")
                .as_deref()
                .unwrap_or("+03:00")
                .parse()
                .expect("UTC_OFFSET must look like +03:00"),
            admin_ids: var("ADMIN_IDS")
                .map(|v| parse_admin_ids(&v).expect("ADMIN_IDS must be comma-separated integers"))
                .unwrap_or_default(),
            admins_file: var("ADMINS_FILE")
                .unwrap_or_else(|| "admins.txt".to_owned())
                .into(),
            display_console: var("DISPLAY_CONSOLE").is_some_and(|v| parse_flag(&v)),
            log_format: var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }
}
