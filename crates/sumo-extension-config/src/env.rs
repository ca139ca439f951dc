// crates/sumo-extension-config/src/env.rs
// ============================================================================
// Module: Environment Snapshot
// Description: Recognized variable names and an immutable view of their values.
// Purpose: Make config building a pure function of one captured input.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The extension reads its settings from environment variables exactly once at
//! startup. [`EnvSnapshot::capture`] copies the recognized variables out of the
//! live process environment; tests build snapshots from explicit pairs instead
//! of mutating process state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;

// ============================================================================
// SECTION: Variable Names
// ============================================================================

/// Collector endpoint URL (required).
pub const SUMO_HTTP_ENDPOINT: &str = "SUMO_HTTP_ENDPOINT";
/// Enables the object-storage failover path.
pub const SUMO_ENABLE_FAILOVER: &str = "SUMO_ENABLE_FAILOVER";
/// Failover bucket name.
pub const SUMO_S3_BUCKET_NAME: &str = "SUMO_S3_BUCKET_NAME";
/// Failover bucket region.
pub const SUMO_S3_BUCKET_REGION: &str = "SUMO_S3_BUCKET_REGION";
/// Legacy retry count.
pub const SUMO_NUM_RETRIES: &str = "SUMO_NUM_RETRIES";
/// Sleep between retries, in milliseconds.
pub const SUMO_RETRY_SLEEP_TIME_MS: &str = "SUMO_RETRY_SLEEP_TIME_MS";
/// Extension log verbosity.
pub const SUMO_LOG_LEVEL: &str = "SUMO_LOG_LEVEL";
/// Maximum number of queued records.
pub const SUMO_MAX_DATAQUEUE_LENGTH: &str = "SUMO_MAX_DATAQUEUE_LENGTH";
/// Maximum number of concurrent outbound requests.
pub const SUMO_MAX_CONCURRENT_REQUESTS: &str = "SUMO_MAX_CONCURRENT_REQUESTS";
/// Comma-separated log source types.
pub const SUMO_LOG_TYPES: &str = "SUMO_LOG_TYPES";
/// Runtime API address provided by the host.
pub const AWS_LAMBDA_RUNTIME_API: &str = "AWS_LAMBDA_RUNTIME_API";
/// Function name provided by the host.
pub const AWS_LAMBDA_FUNCTION_NAME: &str = "AWS_LAMBDA_FUNCTION_NAME";
/// Function version provided by the host.
pub const AWS_LAMBDA_FUNCTION_VERSION: &str = "AWS_LAMBDA_FUNCTION_VERSION";
/// Region provided by the host.
pub const AWS_REGION: &str = "AWS_REGION";
/// Source category override attached to shipped records.
pub const SOURCE_CATEGORY_OVERRIDE: &str = "SOURCE_CATEGORY_OVERRIDE";

/// Every variable the config builder reads.
pub const RECOGNIZED_VARIABLES: &[&str] = &[
    SUMO_HTTP_ENDPOINT,
    SUMO_ENABLE_FAILOVER,
    SUMO_S3_BUCKET_NAME,
    SUMO_S3_BUCKET_REGION,
    SUMO_NUM_RETRIES,
    SUMO_RETRY_SLEEP_TIME_MS,
    SUMO_LOG_LEVEL,
    SUMO_MAX_DATAQUEUE_LENGTH,
    SUMO_MAX_CONCURRENT_REQUESTS,
    SUMO_LOG_TYPES,
    AWS_LAMBDA_RUNTIME_API,
    AWS_LAMBDA_FUNCTION_NAME,
    AWS_LAMBDA_FUNCTION_VERSION,
    AWS_REGION,
    SOURCE_CATEGORY_OVERRIDE,
];

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Immutable name-to-value view of the environment.
///
/// # Invariants
/// - Absent and empty are distinct: [`EnvSnapshot::lookup`] returns `None`
///   only when the variable was not present at capture time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// Captured variables keyed by name.
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Creates an empty snapshot (no variables set).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the recognized variables from the process environment.
    ///
    /// Non-UTF-8 values are converted lossily so they surface as malformed
    /// values instead of disappearing.
    #[must_use]
    pub fn capture() -> Self {
        RECOGNIZED_VARIABLES
            .iter()
            .filter_map(|name| {
                env::var_os(name).map(|value| (*name, value.to_string_lossy().into_owned()))
            })
            .collect()
    }

    /// Returns a copy of this snapshot with `name` set to `value`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Returns the value of `name`, or `None` when it was not set.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Returns the value of `name`, or an empty string when it was not set.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.lookup(name).unwrap_or_default()
    }

    /// Returns the number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true when no variables were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect(),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
