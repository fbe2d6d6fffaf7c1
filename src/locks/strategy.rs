//! The contract every locking mechanism implements.

use super::types::LockMode;
use crate::error::Result;
use std::fmt;
use std::path::Path;

/// A mechanism that grants exclusive or shared access to a subject.
///
/// One instance backs exactly one [`Lock`](super::Lock) and holds at most
/// one lock at a time.
pub trait LockStrategy: fmt::Debug + Send {
    /// Block until `mode` is granted for `subject`.
    ///
    /// Two exclusive acquirers of the same subject exclude each other, any
    /// number of shared acquirers coexist, and an exclusive acquirer
    /// excludes all shared ones. Fails with
    /// [`LockError::NotAcquired`](crate::error::LockError::NotAcquired) when
    /// the mechanism cannot establish the lock, or when this instance
    /// already holds one.
    fn acquire(&mut self, subject: &str, mode: LockMode) -> Result<()>;

    /// Release the held lock.
    ///
    /// Returns `true` if a held lock was released. Returns `false` when
    /// nothing is held (never acquired, failed acquisition, already
    /// released) or the mechanism failed to unlock. Never panics.
    fn release(&mut self) -> bool;

    /// Backing file of the lock, once `acquire` has resolved it.
    fn lock_file(&self) -> Option<&Path> {
        None
    }

    /// Short identifier used in log output.
    fn name(&self) -> &'static str;
}
