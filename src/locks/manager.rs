//! Strategy factory and the process-wide manager slot.
//!
//! [`Lock`](super::Lock) consults the slot on every construction. The slot
//! is a single swappable reference: install a manager before constructing
//! locks, and do not reconfigure it while other threads are constructing
//! locks. Tests swap it serially in setup and teardown.

use super::flock::FlockLockStrategy;
use super::strategy::LockStrategy;
use crate::config::{LockConfig, StrategyKind};
use crate::error::Result;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::debug;

type StrategyFactory = dyn Fn() -> Box<dyn LockStrategy> + Send + Sync;

static LOCK_MANAGER: RwLock<Option<Arc<LockManager>>> = RwLock::new(None);

/// Produces a fresh [`LockStrategy`] for every lock.
pub struct LockManager {
    source: StrategySource,
}

enum StrategySource {
    Config(LockConfig),
    Factory(Box<StrategyFactory>),
}

impl LockManager {
    /// Create a manager for the strategy named in `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(LockManager)` - The config is valid
    /// * `Err(LockError::Config)` - Validation failed
    pub fn new(config: LockConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source: StrategySource::Config(config),
        })
    }

    /// Create a manager from a YAML config file.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(LockConfig::load(path)?)
    }

    /// Create a manager that builds strategies with `factory`.
    ///
    /// `factory` must return a new, unacquired instance on every call.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn() -> Box<dyn LockStrategy> + Send + Sync + 'static,
    {
        Self {
            source: StrategySource::Factory(Box::new(factory)),
        }
    }

    /// The config this manager was built from, if any.
    pub fn config(&self) -> Option<&LockConfig> {
        match &self.source {
            StrategySource::Config(config) => Some(config),
            StrategySource::Factory(_) => None,
        }
    }

    /// Build a new strategy instance. Instances are never reused.
    pub fn lock_strategy_instance(&self) -> Box<dyn LockStrategy> {
        match &self.source {
            StrategySource::Config(config) => match config.strategy {
                StrategyKind::Flock => Box::new(FlockLockStrategy::from_config(config)),
            },
            StrategySource::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for LockManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            StrategySource::Config(config) => {
                f.debug_struct("LockManager").field("config", config).finish()
            }
            StrategySource::Factory(_) => f
                .debug_struct("LockManager")
                .field("factory", &"<custom>")
                .finish(),
        }
    }
}

/// Install the manager used by subsequent lock constructions.
///
/// `None` disables locking: every later [`Lock`](super::Lock) is inert.
/// Locks that already exist keep their strategies.
pub fn set_lock_manager(manager: Option<LockManager>) {
    match &manager {
        Some(manager) => debug!(?manager, "lock manager installed"),
        None => debug!("lock manager cleared, locking disabled"),
    }

    let mut slot = LOCK_MANAGER
        .write()
        .unwrap_or_else(|poison| poison.into_inner());
    *slot = manager.map(Arc::new);
}

/// The currently installed manager, if any.
pub fn lock_manager() -> Option<Arc<LockManager>> {
    LOCK_MANAGER
        .read()
        .unwrap_or_else(|poison| poison.into_inner())
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locks::LockMode;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_config_manager_builds_flock_strategies() {
        let temp_dir = TempDir::new().unwrap();
        let manager = LockManager::new(LockConfig::with_lock_directory(temp_dir.path())).unwrap();

        let strategy = manager.lock_strategy_instance();
        assert_eq!(strategy.name(), "flock");
        assert!(strategy.lock_file().is_none());
        assert_eq!(
            manager.config().unwrap().lock_directory,
            temp_dir.path().to_path_buf()
        );
    }

    #[test]
    fn test_instances_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let manager = LockManager::new(LockConfig::with_lock_directory(temp_dir.path())).unwrap();

        let mut first = manager.lock_strategy_instance();
        let mut second = manager.lock_strategy_instance();
        first.acquire("one", LockMode::Exclusive).unwrap();

        assert!(first.lock_file().is_some());
        assert!(second.lock_file().is_none());
        assert!(!second.release());
        assert!(first.release());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LockConfig::with_lock_directory("");
        assert!(LockManager::new(config).is_err());
    }

    #[test]
    fn test_from_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lock.yaml");
        std::fs::write(&path, "record_holder: false\n").unwrap();

        let manager = LockManager::from_config_file(&path).unwrap();
        assert!(!manager.config().unwrap().record_holder);
    }

    #[test]
    fn test_debug_output() {
        let manager = LockManager::with_factory(|| {
            Box::new(FlockLockStrategy::new(std::env::temp_dir())) as Box<dyn LockStrategy>
        });
        assert!(manager.config().is_none());
        assert!(format!("{:?}", manager).contains("<custom>"));
    }

    #[test]
    #[serial]
    fn test_set_and_clear_lock_manager() {
        let temp_dir = TempDir::new().unwrap();
        set_lock_manager(Some(
            LockManager::new(LockConfig::with_lock_directory(temp_dir.path())).unwrap(),
        ));
        assert!(lock_manager().is_some());

        set_lock_manager(None);
        assert!(lock_manager().is_none());
    }
}
