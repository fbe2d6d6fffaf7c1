//! LockConfig struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a lock manager.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Which locking mechanism to instantiate per lock.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Directory holding one lock file per subject
    /// (default: `<temp dir>/Lock`). Created on first acquisition.
    #[serde(default = "default_lock_directory")]
    pub lock_directory: PathBuf,

    /// Whether exclusive holders write owner metadata into the lock file.
    #[serde(default = "default_true")]
    pub record_holder: bool,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            lock_directory: default_lock_directory(),
            record_holder: default_true(),
        }
    }
}

impl LockConfig {
    /// Flock configuration rooted at `lock_directory`.
    pub fn with_lock_directory(lock_directory: impl Into<PathBuf>) -> Self {
        Self {
            lock_directory: lock_directory.into(),
            ..Self::default()
        }
    }
}
