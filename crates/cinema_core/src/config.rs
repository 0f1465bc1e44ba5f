//! Persistence configuration.
//!
//! # Responsibility
//! - Carry the knobs the storage bootstrap and repositories honour.
//!
//! # Invariants
//! - Every field has a default, so partial documents deserialize.

use crate::repo::repository::IntegrityPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Settings for connection bootstrap and read mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Handling of rows whose references do not resolve.
    pub integrity_policy: IntegrityPolicy,
    /// SQLite busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            integrity_policy: IntegrityPolicy::Skip,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl PersistenceConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
