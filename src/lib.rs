//! subject-lock: process- and thread-safe locks named by a subject string.
//!
//! Install a [`LockManager`] once, then guard work with [`Lock`]:
//!
//! ```no_run
//! use subject_lock::{Lock, LockConfig, LockManager, set_lock_manager};
//!
//! # fn main() -> subject_lock::Result<()> {
//! set_lock_manager(Some(LockManager::new(LockConfig::with_lock_directory(
//!     "/var/lock/my-app",
//! ))?));
//!
//! let mut lock = Lock::new("cache")?;
//! // ... exclusive access to the cache ...
//! lock.release();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod locks;

pub use config::{LockConfig, StrategyKind};
pub use error::{LockError, Result};
pub use locks::{
    FlockLockStrategy, Lock, LockManager, LockMetadata, LockMode, LockStrategy, lock_manager,
    set_lock_manager,
};
