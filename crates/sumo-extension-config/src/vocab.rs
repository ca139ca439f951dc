// crates/sumo-extension-config/src/vocab.rs
// ============================================================================
// Module: Closed Vocabularies
// Description: Log verbosity levels and log source types.
// Purpose: Keep one table of valid tokens shared by defaults and validation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Both vocabularies are closed enums. Each carries an `ALL` table that is the
//! only list of accepted tokens, so the defaults in [`crate::config`] can never
//! drift from what validation accepts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

// ============================================================================
// SECTION: Log Level
// ============================================================================

/// Log verbosity level for the extension's own logger.
///
/// # Invariants
/// - Variants are declared from least to most verbose; the derived ordering
///   is relied on by [`LogLevel::enables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Unrecoverable failures only.
    Panic,
    /// Fatal errors.
    Fatal,
    /// Errors.
    Error,
    /// Warnings.
    Warn,
    /// Informational messages.
    Info,
    /// Debug output.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Every level, least verbose first.
    pub const ALL: [Self; 7] =
        [Self::Panic, Self::Fatal, Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace];

    /// Returns the canonical token for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Panic => "panic",
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Parses a level token, ignoring ASCII case. `warning` is accepted as an
    /// alias of `warn`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("warning") {
            return Some(Self::Warn);
        }
        Self::ALL.into_iter().find(|level| level.as_str().eq_ignore_ascii_case(token))
    }

    /// Returns true when a message at `level` passes this threshold.
    #[must_use]
    pub fn enables(self, level: Self) -> bool {
        level <= self
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = UnknownToken;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::parse(token).ok_or_else(|| UnknownToken(token.to_string()))
    }
}

// ============================================================================
// SECTION: Log Type
// ============================================================================

/// Category of telemetry collected by the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    /// Platform lifecycle events.
    Platform,
    /// Function output.
    Function,
    /// The extension's own internal events.
    Extension,
}

impl LogType {
    /// Every supported log type.
    pub const ALL: [Self; 3] = [Self::Platform, Self::Function, Self::Extension];

    /// Returns the canonical token for the log type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Function => "function",
            Self::Extension => "extension",
        }
    }

    /// Parses a log type token. Matching is exact and case-sensitive.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|log_type| log_type.as_str() == token)
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogType {
    type Err = UnknownToken;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::parse(token).ok_or_else(|| UnknownToken(token.to_string()))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Token that is not part of a closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token {0:?}")]
pub struct UnknownToken(pub String);

// ============================================================================
// SECTION: Tests
// ============================================================================
