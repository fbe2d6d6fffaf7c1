//! Configuration types and defaults for subject-lock.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the directory created under the system temp dir when no
/// `lock_directory` is configured.
pub const DEFAULT_LOCK_DIRECTORY_NAME: &str = "Lock";

/// Locking mechanism used for new locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Advisory file locks (`flock(2)` / `LockFileEx`), one file per subject.
    #[default]
    Flock,
}

impl StrategyKind {
    /// Parse a strategy kind from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "flock" => Some(Self::Flock),
            _ => None,
        }
    }

    /// The identifier used in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Flock => "flock",
        }
    }
}

// Default value functions for serde
pub(super) fn default_lock_directory() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_LOCK_DIRECTORY_NAME)
}
pub(super) fn default_true() -> bool {
    true
}
