//! Configuration model for subject-lock.
//!
//! This module defines the [`LockConfig`] struct that selects the lock
//! strategy and its backing directory. It supports forward-compatible YAML
//! parsing (unknown fields are ignored), sensible defaults for every field,
//! and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::LockConfig;
pub use types::StrategyKind;
