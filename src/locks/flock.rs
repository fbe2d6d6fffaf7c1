//! Advisory file-lock strategy.
//!
//! Each subject maps to one file under the configured lock directory. The
//! file is opened (created if missing, never truncated on open) and locked
//! with `flock(2)` on Unix or `LockFileEx` on Windows via `fs2`. The `File`
//! stays open while the lock is held, so the OS drops the lock if the
//! process dies.
//!
//! Lock files are never deleted: a waiter blocked on an unlinked file would
//! otherwise "acquire" a lock nobody else can see.

use super::metadata::LockMetadata;
use super::strategy::LockStrategy;
use super::types::LockMode;
use crate::config::LockConfig;
use crate::error::{LockError, Result};
use fs2::FileExt;
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Maximum length of the readable part of a lock file name.
const MAX_SLUG_LEN: usize = 32;

/// Number of digest bytes encoded into a lock file name.
const DIGEST_BYTES: usize = 16;

/// Lock strategy backed by advisory file locks.
#[derive(Debug)]
pub struct FlockLockStrategy {
    lock_directory: PathBuf,
    record_holder: bool,
    lock_file: Option<PathBuf>,
    held: Option<HeldLock>,
}

#[derive(Debug)]
struct HeldLock {
    file: File,
    subject: String,
    mode: LockMode,
}

impl FlockLockStrategy {
    /// Create a strategy that keeps its lock files in `lock_directory`.
    pub fn new(lock_directory: impl Into<PathBuf>) -> Self {
        Self {
            lock_directory: lock_directory.into(),
            record_holder: true,
            lock_file: None,
            held: None,
        }
    }

    /// Create a strategy from a lock configuration.
    pub fn from_config(config: &LockConfig) -> Self {
        Self {
            record_holder: config.record_holder,
            ..Self::new(&config.lock_directory)
        }
    }

    /// Directory holding the lock files.
    pub fn lock_directory(&self) -> &Path {
        &self.lock_directory
    }

    /// Mode of the currently held lock, if any.
    pub fn held_mode(&self) -> Option<LockMode> {
        self.held.as_ref().map(|held| held.mode)
    }
}

impl LockStrategy for FlockLockStrategy {
    fn acquire(&mut self, subject: &str, mode: LockMode) -> Result<()> {
        if let Some(held) = &self.held {
            return Err(LockError::NotAcquired(format!(
                "strategy already holds a {} lock on '{}'",
                held.mode, held.subject
            )));
        }

        fs::create_dir_all(&self.lock_directory).map_err(|e| {
            LockError::NotAcquired(format!(
                "failed to create lock directory '{}': {}",
                self.lock_directory.display(),
                e
            ))
        })?;

        let path = lock_file_name(&self.lock_directory, subject);
        self.lock_file = Some(path.clone());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::NotAcquired(format!(
                    "failed to open lock file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        debug!(subject, %mode, path = %path.display(), "waiting for lock");

        let locked = match mode {
            LockMode::Exclusive => FileExt::lock_exclusive(&file),
            LockMode::Shared => FileExt::lock_shared(&file),
        };
        locked.map_err(|e| {
            LockError::NotAcquired(format!(
                "failed to lock '{}' for subject '{}': {}",
                path.display(),
                subject,
                e
            ))
        })?;

        if mode.is_exclusive()
            && self.record_holder
            && let Err(e) = write_holder(&file, &LockMetadata::new(subject, mode))
        {
            warn!(subject, path = %path.display(), error = %e, "failed to record lock holder");
        }

        debug!(subject, %mode, path = %path.display(), "lock acquired");
        self.held = Some(HeldLock {
            file,
            subject: subject.to_string(),
            mode,
        });
        Ok(())
    }

    fn release(&mut self) -> bool {
        let Some(held) = self.held.take() else {
            return false;
        };

        // Clear our record while still holding the lock.
        if held.mode.is_exclusive()
            && self.record_holder
            && let Err(e) = held.file.set_len(0)
        {
            warn!(subject = %held.subject, error = %e, "failed to clear lock holder record");
        }

        match FileExt::unlock(&held.file) {
            Ok(()) => {
                debug!(subject = %held.subject, mode = %held.mode, "lock released");
                true
            }
            Err(e) => {
                warn!(subject = %held.subject, error = %e, "failed to unlock lock file");
                false
            }
        }
    }

    fn lock_file(&self) -> Option<&Path> {
        self.lock_file.as_deref()
    }

    fn name(&self) -> &'static str {
        "flock"
    }
}

/// Derive the lock file for `subject` inside `lock_directory`.
///
/// Format: `{slug}-{digest}.lock`, where `slug` is a lowercase rendering of
/// the subject (at most 32 characters) and `digest` is the first 16 bytes
/// of its SHA-256, hex encoded. The result depends only on the inputs, so
/// every process maps a subject to the same file.
pub fn lock_file_name(lock_directory: &Path, subject: &str) -> PathBuf {
    let digest = Sha256::digest(subject.as_bytes());
    let hash = hex::encode(&digest[..DIGEST_BYTES]);

    let slug = sanitize_subject(subject);
    let name = if slug.is_empty() {
        format!("{}.lock", hash)
    } else {
        format!("{}-{}.lock", slug, hash)
    };
    lock_directory.join(name)
}

/// Sanitize a subject for use in a file name.
///
/// Lowercases ASCII alphanumerics, collapses every other run of characters
/// into one hyphen, and trims hyphens from both ends.
fn sanitize_subject(subject: &str) -> String {
    let mut result = String::new();
    let mut last_was_hyphen = true; // Start true to avoid leading hyphen

    for c in subject.chars() {
        if result.len() >= MAX_SLUG_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    result
}

/// Replace the file content with the holder record.
fn write_holder(mut file: &File, metadata: &LockMetadata) -> Result<()> {
    let json = metadata.to_json()?;
    let io_err = |e: std::io::Error| LockError::Metadata(format!("failed to write lock metadata: {}", e));

    file.set_len(0).map_err(io_err)?;
    file.seek(SeekFrom::Start(0)).map_err(io_err)?;
    file.write_all(json.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)
}
