//! File-backed administrator list.
//!
//! One chat id per line; blank lines and `#` comments are ignored. The
//! registry is the only writer: every mutation holds the lock while the file
//! is rewritten through a temporary sibling and renamed into place.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::AttendanceServiceError;

#[derive(Debug, thiserror::Error)]
pub enum AdminRegistryError {
    #[error("failed to read admin list {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid chat id {value:?} on line {line} of {path}")]
    Parse {
        path: PathBuf,
        line: usize,
        value: String,
    },
    #[error("failed to write admin list {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl From<AdminRegistryError> for AttendanceServiceError {
    fn from(e: AdminRegistryError) -> Self {
        Self::Internal(e.into())
    }
}

#[derive(Debug)]
pub struct FileAdminRegistry {
    path: PathBuf,
    ids: Mutex<BTreeSet<i64>>,
}

fn parse_admin_file(path: &Path, contents: &str) -> Result<BTreeSet<i64>, AdminRegistryError> {
    let mut ids = BTreeSet::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let id = line.parse().map_err(|_| AdminRegistryError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            value: line.to_owned(),
        })?;
        ids.insert(id);
    }
    Ok(ids)
}

async fn persist(path: &Path, ids: &BTreeSet<i64>) -> Result<(), AdminRegistryError> {
    let mut contents = String::from("# rollcall administrators, one chat id per line\n");
    for id in ids {
        contents.push_str(&id.to_string());
        contents.push('\n');
    }
    let tmp = path.with_extension("tmp");
    let write_err = |source| AdminRegistryError::Write {
        path: path.to_path_buf(),
        source,
    };
    tokio::fs::write(&tmp, contents).await.map_err(write_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(write_err)
}

impl FileAdminRegistry {
    /// Load the list at `path`. A missing file is created from `seed`.
    pub async fn load(path: impl Into<PathBuf>, seed: &[i64]) -> Result<Self, AdminRegistryError> {
        let path = path.into();
        let ids = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => parse_admin_file(&path, &contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let ids: BTreeSet<i64> = seed.iter().copied().collect();
                persist(&path, &ids).await?;
                info!(path = %path.display(), count = ids.len(), "created admin list from seed");
                ids
            }
            Err(source) => return Err(AdminRegistryError::Read { path, source }),
        };
        if ids.is_empty() {
            warn!(path = %path.display(), "admin list is empty");
        }
        Ok(Self {
            path,
            ids: Mutex::new(ids),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn contains(&self, chat_id: i64) -> bool {
        self.ids.lock().await.contains(&chat_id)
    }

    pub async fn list(&self) -> Vec<i64> {
        self.ids.lock().await.iter().copied().collect()
    }

    /// Returns `false` if `chat_id` is already an admin.
    pub async fn add(&self, chat_id: i64) -> Result<bool, AdminRegistryError> {
        let mut ids = self.ids.lock().await;
        if !ids.insert(chat_id) {
            return Ok(false);
        }
        if let Err(e) = persist(&self.path, &ids).await {
            ids.remove(&chat_id);
            return Err(e);
        }
        info!(chat_id, "admin added");
        Ok(true)
    }

    /// Returns `false` if `chat_id` was not an admin.
    pub async fn remove(&self, chat_id: i64) -> Result<bool, AdminRegistryError> {
        let mut ids = self.ids.lock().await;
        if !ids.remove(&chat_id) {
            return Ok(false);
        }
        if let Err(e) = persist(&self.path, &ids).await {
            ids.insert(chat_id);
            return Err(e);
        }
        info!(chat_id, "admin removed");
        Ok(true)
    }
}
