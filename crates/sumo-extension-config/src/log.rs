// crates/sumo-extension-config/src/log.rs
// ============================================================================
// Module: Config Load Logging
// Description: Structured startup events for configuration builds.
// Purpose: Emit one redacted JSON-lines record per build without hard deps.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Each build produces one [`ConfigLoadEvent`]. Sinks decide where the JSON
//! line goes; the event never contains the raw endpoint. Events are filtered
//! against the configured [`LogLevel`] so a quiet extension stays quiet.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::ConfigBuild;
use crate::config::ConfigIssue;
use crate::config::RedactedConfig;
use crate::vocab::LogLevel;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Configuration build event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigLoadEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Severity of the event.
    pub level: LogLevel,
    /// `ok` when no issue was recorded, otherwise `invalid`.
    pub outcome: &'static str,
    /// Number of recorded issues.
    pub issue_count: usize,
    /// Recorded issues in check order.
    pub issues: Vec<ConfigIssue>,
    /// Effective configuration with secrets removed.
    pub config: RedactedConfig,
}

impl ConfigLoadEvent {
    /// Creates an event describing `build` with a consistent timestamp.
    #[must_use]
    pub fn new(build: &ConfigBuild) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let issues = build.issues().to_vec();
        let (level, outcome) =
            if issues.is_empty() { (LogLevel::Info, "ok") } else { (LogLevel::Error, "invalid") };
        Self {
            event: "config_load",
            timestamp_ms,
            level,
            outcome,
            issue_count: issues.len(),
            issues,
            config: build.config.redacted(),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for configuration build events.
pub trait ConfigLogSink: Send + Sync {
    /// Record a build event.
    fn record(&self, event: &ConfigLoadEvent);
}

/// Records the event for `build` when the configured level enables it.
///
/// Returns true when the event was handed to the sink.
pub fn record_build(sink: &dyn ConfigLogSink, build: &ConfigBuild) -> bool {
    let event = ConfigLoadEvent::new(build);
    if !build.config.log_level.enables(event.level) {
        return false;
    }
    sink.record(&event);
    true
}

/// Sink that logs JSON lines to stderr.
pub struct StderrConfigLogSink;

impl ConfigLogSink for StderrConfigLogSink {
    fn record(&self, event: &ConfigLoadEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that logs JSON lines to a file.
pub struct FileConfigLogSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileConfigLogSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ConfigLogSink for FileConfigLogSink {
    fn record(&self, event: &ConfigLoadEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op sink.
pub struct NoopConfigLogSink;

impl ConfigLogSink for NoopConfigLogSink {
    fn record(&self, _event: &ConfigLoadEvent) {}
}
