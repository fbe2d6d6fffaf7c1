//! Lock mode definition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested access mode for a subject.
///
/// At most one `Exclusive` holder exists per subject and it excludes every
/// `Shared` holder; any number of `Shared` holders may coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Write lock.
    #[default]
    Exclusive,
    /// Read lock.
    Shared,
}

impl LockMode {
    /// Convert the `exclusive` flag form into a mode.
    pub fn from_exclusive(exclusive: bool) -> Self {
        if exclusive {
            LockMode::Exclusive
        } else {
            LockMode::Shared
        }
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(self, LockMode::Exclusive)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockMode::Exclusive => "exclusive",
            LockMode::Shared => "shared",
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
