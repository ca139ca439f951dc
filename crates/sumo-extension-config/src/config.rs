// crates/sumo-extension-config/src/config.rs
// ============================================================================
// Module: Extension Configuration
// Description: Startup configuration model and the environment build pipeline.
// Purpose: Produce a typed config plus every validation failure in one pass.
// Dependencies: serde, thiserror, url
// ============================================================================

//! ## Overview
//! [`ExtensionConfig::build`] runs three phases over an [`EnvSnapshot`]:
//! ingest raw strings, fill defaults for unset optional settings, then coerce
//! and cross-validate. Checks never short-circuit; each failure becomes one
//! [`ConfigIssue`] and the full list is returned as a [`ConfigError`] next to
//! the best-effort configuration.
//!
//! Security posture: the endpoint URL carries a collector secret. Serialize
//! [`RedactedConfig`], never the endpoint itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::coerce::CoerceError;
use crate::coerce::parse_bool;
use crate::coerce::parse_i32;
use crate::coerce::parse_level;
use crate::coerce::parse_millis;
use crate::coerce::split_list;
use crate::env::AWS_LAMBDA_FUNCTION_NAME;
use crate::env::AWS_LAMBDA_FUNCTION_VERSION;
use crate::env::AWS_LAMBDA_RUNTIME_API;
use crate::env::AWS_REGION;
use crate::env::EnvSnapshot;
use crate::env::SOURCE_CATEGORY_OVERRIDE;
use crate::env::SUMO_ENABLE_FAILOVER;
use crate::env::SUMO_HTTP_ENDPOINT;
use crate::env::SUMO_LOG_LEVEL;
use crate::env::SUMO_LOG_TYPES;
use crate::env::SUMO_MAX_CONCURRENT_REQUESTS;
use crate::env::SUMO_MAX_DATAQUEUE_LENGTH;
use crate::env::SUMO_NUM_RETRIES;
use crate::env::SUMO_RETRY_SLEEP_TIME_MS;
use crate::env::SUMO_S3_BUCKET_NAME;
use crate::env::SUMO_S3_BUCKET_REGION;
use crate::vocab::LogLevel;
use crate::vocab::LogType;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Endpoint used when `SUMO_HTTP_ENDPOINT` is absent; it never validates.
pub const ENDPOINT_PLACEHOLDER: &str = "<REPLACE ME>";
/// Default legacy retry count.
pub const DEFAULT_NUM_RETRIES: i32 = 3;
/// Default runtime API address.
pub const DEFAULT_RUNTIME_API: &str = "127.0.0.1:9001";
/// Default log source types.
pub const DEFAULT_LOG_TYPES: &[LogType] = &[LogType::Platform, LogType::Function];
/// Default log level.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
/// Default maximum number of queued records.
pub const DEFAULT_MAX_DATA_QUEUE_LENGTH: i32 = 20;
/// Default maximum number of concurrent outbound requests.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: i32 = 3;
/// Default sleep between retries in milliseconds.
pub const DEFAULT_RETRY_SLEEP_MS: u64 = 300;
/// Maximum retry attempts per request. Not configurable.
pub const MAX_RETRY_ATTEMPTS: i32 = 5;
/// Outbound connection timeout in milliseconds. Not configurable.
pub const CONNECTION_TIMEOUT_MS: u64 = 10_000;
/// Maximum outbound payload size in bytes. Not configurable.
pub const MAX_DATA_PAYLOAD_BYTES: usize = 1024 * 1024;
/// Replacement text for secret material in logs.
pub const REDACTED: &str = "<redacted>";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Startup configuration of the telemetry extension.
///
/// # Invariants
/// - `log_types` only holds allow-listed entries, without duplicates.
/// - After a build without issues, `enable_failover` implies both bucket
///   fields are non-empty and `endpoint` is an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Collector endpoint URL.
    pub endpoint: String,
    /// Whether undeliverable records fail over to object storage.
    pub enable_failover: bool,
    /// Failover bucket name.
    pub s3_bucket_name: String,
    /// Failover bucket region.
    pub s3_bucket_region: String,
    /// Legacy retry count; retries use [`MAX_RETRY_ATTEMPTS`].
    pub num_retries: i32,
    /// Runtime API address.
    pub runtime_api: String,
    /// Log source types to subscribe to, in input order.
    pub log_types: Vec<LogType>,
    /// Function name reported by the host.
    pub function_name: String,
    /// Function version reported by the host.
    pub function_version: String,
    /// Log verbosity of the extension itself.
    pub log_level: LogLevel,
    /// Maximum number of queued records.
    pub max_data_queue_length: i32,
    /// Maximum number of concurrent outbound requests.
    pub max_concurrent_requests: i32,
    /// Maximum retry attempts per request.
    pub max_retry_attempts: i32,
    /// Sleep between retries.
    pub retry_sleep: Duration,
    /// Outbound connection timeout.
    pub connection_timeout: Duration,
    /// Maximum outbound payload size in bytes.
    pub max_payload_bytes: usize,
    /// Region reported by the host.
    pub region: String,
    /// Source category attached to shipped records, when overridden.
    pub source_category_override: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            enable_failover: false,
            s3_bucket_name: String::new(),
            s3_bucket_region: String::new(),
            num_retries: DEFAULT_NUM_RETRIES,
            runtime_api: DEFAULT_RUNTIME_API.to_string(),
            log_types: DEFAULT_LOG_TYPES.to_vec(),
            function_name: String::new(),
            function_version: String::new(),
            log_level: DEFAULT_LOG_LEVEL,
            max_data_queue_length: DEFAULT_MAX_DATA_QUEUE_LENGTH,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_retry_attempts: MAX_RETRY_ATTEMPTS,
            retry_sleep: Duration::from_millis(DEFAULT_RETRY_SLEEP_MS),
            connection_timeout: Duration::from_millis(CONNECTION_TIMEOUT_MS),
            max_payload_bytes: MAX_DATA_PAYLOAD_BYTES,
            region: String::new(),
            source_category_override: String::new(),
        }
    }
}

impl ExtensionConfig {
    /// Builds the configuration from the live process environment.
    #[must_use]
    pub fn from_env() -> ConfigBuild {
        Self::build(&EnvSnapshot::capture())
    }

    /// Builds the configuration from an environment snapshot.
    ///
    /// Always returns a populated configuration. Settings that fail to parse
    /// keep their defaults, and every failure is listed on the returned
    /// [`ConfigBuild`] in check order.
    #[must_use]
    pub fn build(env: &EnvSnapshot) -> ConfigBuild {
        let mut config = Self::ingest(env);
        let mut issues = Vec::new();
        config.check_endpoint(&mut issues);
        apply_settings(&mut config, env, FAILOVER_SETTINGS, &mut issues);
        config.check_failover_bucket(&mut issues);
        apply_settings(&mut config, env, TUNING_SETTINGS, &mut issues);
        config.apply_log_types(env.get(SUMO_LOG_TYPES), &mut issues);
        ConfigBuild::new(config, issues)
    }

    /// Returns the parsed endpoint when it is a valid absolute URL.
    #[must_use]
    pub fn endpoint_url(&self) -> Option<Url> {
        parse_endpoint(&self.endpoint).ok()
    }

    /// Returns a view that is safe to log.
    #[must_use]
    pub fn redacted(&self) -> RedactedConfig {
        RedactedConfig {
            endpoint: redact_endpoint(&self.endpoint),
            enable_failover: self.enable_failover,
            s3_bucket_name: self.s3_bucket_name.clone(),
            s3_bucket_region: self.s3_bucket_region.clone(),
            num_retries: self.num_retries,
            runtime_api: self.runtime_api.clone(),
            log_types: self.log_types.clone(),
            function_name: self.function_name.clone(),
            function_version: self.function_version.clone(),
            log_level: self.log_level,
            max_data_queue_length: self.max_data_queue_length,
            max_concurrent_requests: self.max_concurrent_requests,
            max_retry_attempts: self.max_retry_attempts,
            retry_sleep_ms: duration_millis(self.retry_sleep),
            connection_timeout_ms: duration_millis(self.connection_timeout),
            max_payload_bytes: self.max_payload_bytes,
            region: self.region.clone(),
            source_category_override: self.source_category_override.clone(),
        }
    }

    /// Copies raw strings out of the snapshot over the defaults.
    fn ingest(env: &EnvSnapshot) -> Self {
        let endpoint = env
            .lookup(SUMO_HTTP_ENDPOINT)
            .map_or_else(|| ENDPOINT_PLACEHOLDER.to_string(), str::to_string);
        let runtime_api = match env.get(AWS_LAMBDA_RUNTIME_API) {
            "" => DEFAULT_RUNTIME_API.to_string(),
            address => address.to_string(),
        };
        Self {
            endpoint,
            s3_bucket_name: env.get(SUMO_S3_BUCKET_NAME).to_string(),
            s3_bucket_region: env.get(SUMO_S3_BUCKET_REGION).to_string(),
            runtime_api,
            function_name: env.get(AWS_LAMBDA_FUNCTION_NAME).to_string(),
            function_version: env.get(AWS_LAMBDA_FUNCTION_VERSION).to_string(),
            region: env.get(AWS_REGION).to_string(),
            source_category_override: env.get(SOURCE_CATEGORY_OVERRIDE).to_string(),
            ..Self::default()
        }
    }

    /// Requires an endpoint and checks that it is an absolute URL.
    fn check_endpoint(&self, issues: &mut Vec<ConfigIssue>) {
        if self.endpoint.is_empty() {
            issues.push(ConfigIssue::new(
                IssueKind::MissingRequired,
                SUMO_HTTP_ENDPOINT,
                format!("{SUMO_HTTP_ENDPOINT} not set in environment variable"),
            ));
        } else if let Err(reason) = parse_endpoint(&self.endpoint) {
            issues.push(ConfigIssue::new(
                IssueKind::MalformedValue,
                SUMO_HTTP_ENDPOINT,
                format!("{SUMO_HTTP_ENDPOINT} is not valid: {reason}"),
            ));
        }
    }

    /// Requires both bucket fields when failover is enabled.
    fn check_failover_bucket(&self, issues: &mut Vec<ConfigIssue>) {
        if !self.enable_failover {
            return;
        }
        for (variable, value) in [
            (SUMO_S3_BUCKET_NAME, &self.s3_bucket_name),
            (SUMO_S3_BUCKET_REGION, &self.s3_bucket_region),
        ] {
            if value.is_empty() {
                issues.push(ConfigIssue::new(
                    IssueKind::ConditionalMissing,
                    variable,
                    format!(
                        "{variable} not set in environment variable (required when \
                         {SUMO_ENABLE_FAILOVER} is true)"
                    ),
                ));
            }
        }
    }

    /// Replaces the default log types with the allow-listed entries of `raw`.
    fn apply_log_types(&mut self, raw: &str, issues: &mut Vec<ConfigIssue>) {
        if raw.is_empty() {
            return;
        }
        let mut accepted = Vec::new();
        for entry in split_list(raw) {
            match LogType::parse(entry) {
                Some(log_type) => {
                    if !accepted.contains(&log_type) {
                        accepted.push(log_type);
                    }
                }
                None => issues.push(ConfigIssue::new(
                    IssueKind::OutOfAllowlist,
                    SUMO_LOG_TYPES,
                    format!("logType {entry} is unsupported"),
                )),
            }
        }
        self.log_types = accepted;
    }
}

/// Log-safe projection of [`ExtensionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactedConfig {
    /// Endpoint reduced to scheme and host.
    pub endpoint: String,
    /// Whether failover is enabled.
    pub enable_failover: bool,
    /// Failover bucket name.
    pub s3_bucket_name: String,
    /// Failover bucket region.
    pub s3_bucket_region: String,
    /// Legacy retry count.
    pub num_retries: i32,
    /// Runtime API address.
    pub runtime_api: String,
    /// Log source types.
    pub log_types: Vec<LogType>,
    /// Function name.
    pub function_name: String,
    /// Function version.
    pub function_version: String,
    /// Log level.
    pub log_level: LogLevel,
    /// Maximum number of queued records.
    pub max_data_queue_length: i32,
    /// Maximum number of concurrent outbound requests.
    pub max_concurrent_requests: i32,
    /// Maximum retry attempts per request.
    pub max_retry_attempts: i32,
    /// Sleep between retries in milliseconds.
    pub retry_sleep_ms: u64,
    /// Outbound connection timeout in milliseconds.
    pub connection_timeout_ms: u64,
    /// Maximum outbound payload size in bytes.
    pub max_payload_bytes: usize,
    /// Region.
    pub region: String,
    /// Source category override.
    pub source_category_override: String,
}

// ============================================================================
// SECTION: Build Result
// ============================================================================

/// Outcome of one configuration build.
///
/// # Invariants
/// - `error` is `Some` exactly when at least one issue was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBuild {
    /// Best-effort configuration, populated even when issues were found.
    pub config: ExtensionConfig,
    /// Aggregated failures, if any.
    pub error: Option<ConfigError>,
}

impl ConfigBuild {
    /// Wraps a configuration and the issues recorded while building it.
    fn new(config: ExtensionConfig, issues: Vec<ConfigIssue>) -> Self {
        let error = if issues.is_empty() {
            None
        } else {
            Some(ConfigError {
                issues,
            })
        };
        Self {
            config,
            error,
        }
    }

    /// Returns true when no issue was recorded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the recorded issues in check order.
    #[must_use]
    pub fn issues(&self) -> &[ConfigIssue] {
        match &self.error {
            Some(error) => error.issues(),
            None => &[],
        }
    }

    /// Converts into a `Result`, discarding the partial config on failure.
    ///
    /// # Errors
    ///
    /// Returns the aggregated [`ConfigError`] when any issue was recorded.
    pub fn into_result(self) -> Result<ExtensionConfig, ConfigError> {
        match self.error {
            None => Ok(self.config),
            Some(error) => Err(error),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Category of a configuration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A required setting is unset or empty.
    MissingRequired,
    /// A setting is present but cannot be coerced to its type.
    MalformedValue,
    /// A setting required by another setting's value is unset or empty.
    ConditionalMissing,
    /// A well-formed value outside the permitted vocabulary.
    OutOfAllowlist,
}

impl IssueKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::MalformedValue => "malformed_value",
            Self::ConditionalMissing => "conditional_missing",
            Self::OutOfAllowlist => "out_of_allowlist",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single configuration failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    /// Failure category.
    pub kind: IssueKind,
    /// Environment variable the failure is attributed to.
    pub variable: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ConfigIssue {
    /// Creates an issue.
    #[must_use]
    pub const fn new(kind: IssueKind, variable: &'static str, message: String) -> Self {
        Self {
            kind,
            variable,
            message,
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every failure found in one configuration build.
///
/// # Invariants
/// - `issues` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.issues))]
pub struct ConfigError {
    /// Failures in check order.
    issues: Vec<ConfigIssue>,
}

impl ConfigError {
    /// Returns the failures in check order.
    #[must_use]
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    /// Returns true when any failure has the given kind.
    #[must_use]
    pub fn has_kind(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }

    /// Returns the failures attributed to `variable`.
    pub fn for_variable<'a>(
        &'a self,
        variable: &'a str,
    ) -> impl Iterator<Item = &'a ConfigIssue> + 'a {
        self.issues.iter().filter(move |issue| issue.variable == variable)
    }
}

// ============================================================================
// SECTION: Settings Table
// ============================================================================

/// Declarative description of a coerced setting.
struct Setting {
    /// Environment variable holding the raw value.
    variable: &'static str,
    /// Parses a non-empty raw value and stores it on the config.
    apply: fn(&mut ExtensionConfig, &str) -> Result<(), CoerceError>,
}

/// Settings parsed before the failover bucket check.
const FAILOVER_SETTINGS: &[Setting] = &[Setting {
    variable: SUMO_ENABLE_FAILOVER,
    apply: apply_enable_failover,
}];

/// Tuning settings, parsed after the failover bucket check.
const TUNING_SETTINGS: &[Setting] = &[
    Setting {
        variable: SUMO_NUM_RETRIES,
        apply: apply_num_retries,
    },
    Setting {
        variable: SUMO_RETRY_SLEEP_TIME_MS,
        apply: apply_retry_sleep,
    },
    Setting {
        variable: SUMO_MAX_DATAQUEUE_LENGTH,
        apply: apply_max_data_queue_length,
    },
    Setting {
        variable: SUMO_MAX_CONCURRENT_REQUESTS,
        apply: apply_max_concurrent_requests,
    },
    Setting {
        variable: SUMO_LOG_LEVEL,
        apply: apply_log_level,
    },
];

/// Applies each non-empty setting, recording one issue per parse failure.
fn apply_settings(
    config: &mut ExtensionConfig,
    env: &EnvSnapshot,
    settings: &[Setting],
    issues: &mut Vec<ConfigIssue>,
) {
    for setting in settings {
        let raw = env.get(setting.variable);
        if raw.is_empty() {
            continue;
        }
        if let Err(err) = (setting.apply)(config, raw) {
            issues.push(ConfigIssue::new(
                IssueKind::MalformedValue,
                setting.variable,
                format!("Unable to parse {}: {err}", setting.variable),
            ));
        }
    }
}

/// Stores `SUMO_ENABLE_FAILOVER`.
fn apply_enable_failover(config: &mut ExtensionConfig, raw: &str) -> Result<(), CoerceError> {
    config.enable_failover = parse_bool(raw)?;
    Ok(())
}

/// Stores `SUMO_NUM_RETRIES`.
fn apply_num_retries(config: &mut ExtensionConfig, raw: &str) -> Result<(), CoerceError> {
    config.num_retries = parse_i32(raw)?;
    Ok(())
}

/// Stores `SUMO_RETRY_SLEEP_TIME_MS`.
fn apply_retry_sleep(config: &mut ExtensionConfig, raw: &str) -> Result<(), CoerceError> {
    config.retry_sleep = parse_millis(raw)?;
    Ok(())
}

/// Stores `SUMO_MAX_DATAQUEUE_LENGTH`.
fn apply_max_data_queue_length(
    config: &mut ExtensionConfig,
    raw: &str,
) -> Result<(), CoerceError> {
    config.max_data_queue_length = parse_i32(raw)?;
    Ok(())
}

/// Stores `SUMO_MAX_CONCURRENT_REQUESTS`.
fn apply_max_concurrent_requests(
    config: &mut ExtensionConfig,
    raw: &str,
) -> Result<(), CoerceError> {
    config.max_concurrent_requests = parse_i32(raw)?;
    Ok(())
}

/// Stores `SUMO_LOG_LEVEL`.
fn apply_log_level(config: &mut ExtensionConfig, raw: &str) -> Result<(), CoerceError> {
    config.log_level = parse_level(raw)?;
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses an endpoint as an absolute, hierarchical URL.
///
/// The URL parser silently strips surrounding whitespace and drops tabs and
/// newlines, so those are rejected first to keep the stored value exact.
fn parse_endpoint(endpoint: &str) -> Result<Url, String> {
    if endpoint.trim() != endpoint {
        return Err("leading or trailing whitespace".to_string());
    }
    if endpoint.chars().any(char::is_control) {
        return Err("invalid control character in URL".to_string());
    }
    let url = Url::parse(endpoint).map_err(|err| err.to_string())?;
    if url.cannot_be_a_base() {
        return Err("URL has no authority or path".to_string());
    }
    Ok(url)
}

/// Reduces an endpoint to `scheme://host/<redacted>`.
fn redact_endpoint(endpoint: &str) -> String {
    if endpoint.is_empty() {
        return String::new();
    }
    match parse_endpoint(endpoint) {
        Ok(url) => url.host_str().map_or_else(
            || REDACTED.to_string(),
            |host| format!("{}://{host}/{REDACTED}", url.scheme()),
        ),
        Err(_) => REDACTED.to_string(),
    }
}

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Joins issue messages into one line.
fn join_messages(issues: &[ConfigIssue]) -> String {
    issues.iter().map(|issue| issue.message.as_str()).collect::<Vec<_>>().join(", ")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
