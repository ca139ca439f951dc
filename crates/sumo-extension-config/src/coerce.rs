// crates/sumo-extension-config/src/coerce.rs
// ============================================================================
// Module: Value Coercion
// Description: Parsers from raw environment strings into typed values.
// Purpose: Strict, deterministic coercion that echoes the offending input.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Each parser accepts a non-empty raw string and either returns the typed
//! value or a [`CoerceError`] naming the rejected input. None of them trim
//! whitespace: `" 5"` is not an integer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::num::IntErrorKind;
use std::time::Duration;

use thiserror::Error;

use crate::vocab::LogLevel;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tokens accepted as `true`.
const TRUE_TOKENS: &[&str] = &["1", "t", "T", "TRUE", "true", "True"];
/// Tokens accepted as `false`.
const FALSE_TOKENS: &[&str] = &["0", "f", "F", "FALSE", "false", "False"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Coercion failure for a single raw value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// Input is not a token of the expected kind.
    #[error("invalid {kind} {raw:?}")]
    Syntax {
        /// Expected value kind.
        kind: &'static str,
        /// Rejected input.
        raw: String,
    },
    /// Input is well-formed but outside the accepted range.
    #[error("{kind} {raw:?} out of range")]
    Range {
        /// Expected value kind.
        kind: &'static str,
        /// Rejected input.
        raw: String,
    },
}

impl CoerceError {
    /// Builds a syntax error for `raw`.
    fn syntax(kind: &'static str, raw: &str) -> Self {
        Self::Syntax {
            kind,
            raw: raw.to_string(),
        }
    }

    /// Builds a range error for `raw`.
    fn range(kind: &'static str, raw: &str) -> Self {
        Self::Range {
            kind,
            raw: raw.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Parsers
// ============================================================================

/// Parses a canonical boolean token. Matching is case-sensitive.
///
/// # Errors
///
/// Returns [`CoerceError::Syntax`] for any token outside the canonical set.
pub fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    if TRUE_TOKENS.contains(&raw) {
        Ok(true)
    } else if FALSE_TOKENS.contains(&raw) {
        Ok(false)
    } else {
        Err(CoerceError::syntax("boolean", raw))
    }
}

/// Parses a base-10 signed 32-bit integer.
///
/// # Errors
///
/// Returns [`CoerceError::Range`] on overflow and [`CoerceError::Syntax`] for
/// anything that is not a decimal integer.
pub fn parse_i32(raw: &str) -> Result<i32, CoerceError> {
    raw.parse::<i32>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            CoerceError::range("integer", raw)
        }
        _ => CoerceError::syntax("integer", raw),
    })
}

/// Parses a millisecond count into a [`Duration`].
///
/// The count shares the 32-bit range of the integer settings. Negative counts
/// are well-formed and clamp to [`Duration::ZERO`] (an immediate retry).
///
/// # Errors
///
/// Returns [`CoerceError`] when the count is malformed or overflows.
pub fn parse_millis(raw: &str) -> Result<Duration, CoerceError> {
    let millis = parse_i32(raw).map_err(|err| match err {
        CoerceError::Syntax {
            raw, ..
        } => CoerceError::Syntax {
            kind: "millisecond count",
            raw,
        },
        CoerceError::Range {
            raw, ..
        } => CoerceError::Range {
            kind: "millisecond count",
            raw,
        },
    })?;
    Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
}

/// Parses a log level token.
///
/// # Errors
///
/// Returns [`CoerceError::Syntax`] for tokens outside the level vocabulary.
pub fn parse_level(raw: &str) -> Result<LogLevel, CoerceError> {
    LogLevel::parse(raw).ok_or_else(|| CoerceError::syntax("log level", raw))
}

/// Splits a comma-separated list into trimmed entries, preserving order.
///
/// Empty entries are kept so validation can report them.
#[must_use]
pub fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accepts_canonical_tokens_only() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("T"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert_eq!(parse_bool("False"), Ok(false));
        assert!(parse_bool("tRuE").is_err());
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool(" true").is_err());
    }

    #[test]
    fn integer_reports_overflow_as_range() {
        assert_eq!(parse_i32("+42"), Ok(42));
        assert_eq!(parse_i32("-7"), Ok(-7));
        assert_eq!(parse_i32("2147483648"), Err(CoerceError::range("integer", "2147483648")));
        assert_eq!(parse_i32("abc"), Err(CoerceError::syntax("integer", "abc")));
        assert_eq!(parse_i32("1.5"), Err(CoerceError::syntax("integer", "1.5")));
    }

    #[test]
    fn millis_clamps_negative_counts_to_zero() {
        assert_eq!(parse_millis("1500"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_millis("0"), Ok(Duration::ZERO));
        assert_eq!(parse_millis("-1"), Ok(Duration::ZERO));
        assert_eq!(
            parse_millis("-2147483649"),
            Err(CoerceError::range("millisecond count", "-2147483649"))
        );
        assert_eq!(parse_millis("fast"), Err(CoerceError::syntax("millisecond count", "fast")));
    }

    #[test]
    fn error_message_echoes_raw_value() {
        let message = parse_level("loud").map_err(|err| err.to_string());
        assert_eq!(message, Err("invalid log level \"loud\"".to_string()));
    }

    #[test]
    fn split_list_trims_and_keeps_empty_entries() {
        assert_eq!(split_list("platform, bogus ,extension"), vec!["platform", "bogus", "extension"]);
        assert_eq!(split_list("platform,"), vec!["platform", ""]);
    }
}
