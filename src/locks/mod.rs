//! Locking subsystem.
//!
//! A [`Lock`] names a subject and a [`LockMode`]. Constructing it asks the
//! process-wide [`LockManager`] for a fresh [`LockStrategy`] and acquires
//! through it, blocking until the backend grants the lock.
//!
//! # Strategies
//!
//! [`FlockLockStrategy`] is the reference backend: one advisory-locked file
//! per subject under the configured lock directory. Other mechanisms plug
//! in through [`LockManager::with_factory`].
//!
//! # Lock Metadata
//!
//! Exclusive holders write JSON metadata into the lock file:
//! - `owner`: The owner of the lock (e.g., `user@HOST`)
//! - `pid`: The process ID (optional)
//! - `created_at`: RFC3339 timestamp
//! - `subject` and `mode`
//!
//! # Release
//!
//! Handles release on drop. With no manager installed every handle is inert
//! and locking is effectively disabled.

mod flock;
mod lock;
mod manager;
mod metadata;
mod strategy;
mod types;


// Re-export public API
pub use flock::{FlockLockStrategy, lock_file_name};
pub use lock::Lock;
pub use manager::{LockManager, lock_manager, set_lock_manager};
pub use metadata::{LockMetadata, read_holder};
pub use strategy::LockStrategy;
pub use types::LockMode;
