//! Holder metadata written into lock files by exclusive holders.
//!
//! The advisory lock is the source of truth; this record only answers
//! "who is holding it" for humans. A holder that crashed leaves its record
//! behind until the next exclusive holder overwrites it.

use super::types::LockMode;
use crate::error::{LockError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Lock metadata stored in lock files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Owner of the lock (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the lock holder (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the lock was acquired (RFC3339).
    pub created_at: DateTime<Utc>,

    /// The subject the lock was taken for.
    pub subject: String,

    /// The mode the lock was taken in.
    pub mode: LockMode,
}

impl LockMetadata {
    /// Create new lock metadata with the current timestamp.
    pub fn new(subject: &str, mode: LockMode) -> Self {
        Self {
            owner: get_owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            subject: subject.to_string(),
            mode,
        }
    }

    /// Serialize lock metadata to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LockError::Metadata(format!("failed to serialize lock metadata: {}", e)))
    }

    /// Calculate the age of the lock.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

impl fmt::Display for LockMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} lock held by {}",
            self.subject, self.mode, self.owner
        )?;
        if let Some(pid) = self.pid {
            write!(f, ", pid {}", pid)?;
        }
        write!(f, ", age: {})", self.age_string())
    }
}

/// Read the holder metadata of a lock file.
///
/// # Returns
///
/// * `Ok(Some(LockMetadata))` - An exclusive holder recorded itself
/// * `Ok(None)` - The file is empty (unheld, shared, or holder recording disabled)
/// * `Err(LockError::Metadata)` - The file is missing, unreadable or malformed
pub fn read_holder<P: AsRef<Path>>(path: P) -> Result<Option<LockMetadata>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        LockError::Metadata(format!(
            "failed to read lock file '{}': {}",
            path.display(),
            e
        ))
    })?;

    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&content).map(Some).map_err(|e| {
        LockError::Metadata(format!(
            "failed to parse lock file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Get the owner string for lock metadata.
fn get_owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_metadata_creation() {
        let meta = LockMetadata::new("testLock", LockMode::Exclusive);

        assert!(meta.owner.contains('@'));
        assert_eq!(meta.pid, Some(std::process::id()));
        assert_eq!(meta.subject, "testLock");
        assert_eq!(meta.mode, LockMode::Exclusive);
        assert!(meta.age().num_minutes() < 1);
    }

    #[test]
    fn test_lock_metadata_serialization() {
        let meta = LockMetadata::new("cache", LockMode::Exclusive);
        let json = meta.to_json().unwrap();

        assert!(json.contains("created_at"));
        assert!(json.contains("\"exclusive\""));

        let parsed: LockMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.subject, "cache");
        assert_eq!(parsed.mode, LockMode::Exclusive);
    }

    #[test]
    fn test_lock_metadata_age_string() {
        let mut meta = LockMetadata::new("test", LockMode::Exclusive);
        assert!(meta.age_string().ends_with('m'));

        meta.created_at = Utc::now() - Duration::hours(2);
        assert!(meta.age_string().starts_with("2h"));

        meta.created_at = Utc::now() - Duration::days(3);
        assert!(meta.age_string().starts_with("3d"));
    }

    #[test]
    fn test_lock_metadata_display() {
        let meta = LockMetadata::new("config", LockMode::Exclusive);
        let display = meta.to_string();
        assert!(display.starts_with("config (exclusive lock held by "));
        assert!(display.contains(&format!("pid {}", std::process::id())));
    }

    #[test]
    fn test_read_holder_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.lock");
        fs::write(&path, "").unwrap();

        assert!(read_holder(&path).unwrap().is_none());
    }

    #[test]
    fn test_read_holder_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.lock");
        fs::write(&path, "not json").unwrap();

        let err = read_holder(&path).unwrap_err();
        assert!(matches!(err, LockError::Metadata(_)));
        assert!(err.to_string().contains("failed to parse lock file"));
    }

    #[test]
    fn test_read_holder_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_holder(temp_dir.path().join("missing.lock"));
        assert!(matches!(result, Err(LockError::Metadata(_))));
    }
}
