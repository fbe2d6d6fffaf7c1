//! The public lock handle.

use super::manager::{LockManager, lock_manager};
use super::strategy::LockStrategy;
use super::types::LockMode;
use crate::error::Result;
use tracing::{debug, warn};

/// A held lock on a subject.
///
/// Constructing a `Lock` acquires it, blocking until the installed
/// strategy grants the requested mode. The lock is released by
/// [`release`](Lock::release) or, failing that, when the handle is dropped,
/// on every exit path including early returns, `?` and panics.
///
/// When no [`LockManager`] is installed the handle is *inert*: it holds no
/// strategy, touches nothing, and [`release`](Lock::release) always
/// returns `true`.
#[derive(Debug)]
pub struct Lock {
    subject: String,
    mode: LockMode,
    strategy: Option<Box<dyn LockStrategy>>,
    released: bool,
}

impl Lock {
    /// Acquire an exclusive lock on `subject`.
    pub fn new(subject: &str) -> Result<Self> {
        Self::with_mode(subject, LockMode::Exclusive)
    }

    /// Acquire a shared lock on `subject`.
    pub fn shared(subject: &str) -> Result<Self> {
        Self::with_mode(subject, LockMode::Shared)
    }

    /// Acquire an exclusive (`true`) or shared (`false`) lock on `subject`.
    pub fn acquire(subject: &str, exclusive: bool) -> Result<Self> {
        Self::with_mode(subject, LockMode::from_exclusive(exclusive))
    }

    /// Acquire `subject` in `mode` using the installed manager.
    ///
    /// # Returns
    ///
    /// * `Ok(Lock)` - The lock is held, or the handle is inert because no
    ///   manager is installed
    /// * `Err(LockError::NotAcquired)` - The strategy could not establish the lock
    pub fn with_mode(subject: &str, mode: LockMode) -> Result<Self> {
        match lock_manager() {
            Some(manager) => Self::with_manager(&manager, subject, mode),
            None => {
                debug!(subject, %mode, "no lock manager installed, lock is inert");
                Ok(Self {
                    subject: subject.to_string(),
                    mode,
                    strategy: None,
                    released: false,
                })
            }
        }
    }

    /// Acquire `subject` in `mode` with a strategy from `manager`, ignoring
    /// the process-wide slot.
    pub fn with_manager(manager: &LockManager, subject: &str, mode: LockMode) -> Result<Self> {
        let mut strategy = manager.lock_strategy_instance();
        strategy.acquire(subject, mode)?;

        Ok(Self {
            subject: subject.to_string(),
            mode,
            strategy: Some(strategy),
            released: false,
        })
    }

    /// Release the lock.
    ///
    /// The first call returns the strategy's result. Later calls return
    /// `false` and leave the strategy alone. Inert handles always return
    /// `true`.
    pub fn release(&mut self) -> bool {
        if self.released {
            return self.strategy.is_none();
        }
        self.released = true;

        match self.strategy.as_mut() {
            Some(strategy) => strategy.release(),
            None => true,
        }
    }

    /// The strategy holding this lock; `None` for inert handles.
    pub fn strategy(&self) -> Option<&dyn LockStrategy> {
        self.strategy.as_deref()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Whether this handle was created with no manager installed.
    pub fn is_inert(&self) -> bool {
        self.strategy.is_none()
    }

    /// Whether [`release`](Lock::release) has run.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for Lock {
    fn drop(&mut self) {
        if !self.released && !self.release() {
            warn!(
                subject = %self.subject,
                mode = %self.mode,
                "failed to release lock on drop"
            );
        }
    }
}
