//! Typed coercion tests for sumo-extension-config.
// crates/sumo-extension-config/tests/coercion_validation.rs
// =============================================================================
// Module: Coercion Validation Tests
// Description: Validate integer, duration, and level settings.
// Purpose: Ensure malformed values are reported and keep their defaults.
// =============================================================================

use std::time::Duration;

use sumo_extension_config::ExtensionConfig;
use sumo_extension_config::IssueKind;
use sumo_extension_config::LogLevel;
use sumo_extension_config::env::SUMO_ENABLE_FAILOVER;
use sumo_extension_config::env::SUMO_HTTP_ENDPOINT;
use sumo_extension_config::env::SUMO_LOG_LEVEL;
use sumo_extension_config::env::SUMO_LOG_TYPES;
use sumo_extension_config::env::SUMO_MAX_CONCURRENT_REQUESTS;
use sumo_extension_config::env::SUMO_MAX_DATAQUEUE_LENGTH;
use sumo_extension_config::env::SUMO_NUM_RETRIES;
use sumo_extension_config::env::SUMO_RETRY_SLEEP_TIME_MS;
use sumo_extension_config::env::SUMO_S3_BUCKET_NAME;
use sumo_extension_config::env::SUMO_S3_BUCKET_REGION;

mod common;

type TestResult = Result<(), String>;

#[test]
fn malformed_retry_count_keeps_default() -> TestResult {
    let build = common::build_with(&[(SUMO_NUM_RETRIES, "abc")]);
    common::assert_issue_count(&build, 1)?;
    common::assert_issue(
        &build,
        IssueKind::MalformedValue,
        SUMO_NUM_RETRIES,
        "Unable to parse SUMO_NUM_RETRIES",
    )?;
    if build.config.num_retries != 3 {
        return Err(format!("num_retries {}", build.config.num_retries));
    }
    Ok(())
}

#[test]
fn retry_count_overflow_is_reported() -> TestResult {
    let build = common::build_with(&[(SUMO_NUM_RETRIES, "4294967296")]);
    common::assert_issue(&build, IssueKind::MalformedValue, SUMO_NUM_RETRIES, "out of range")?;
    if build.config.num_retries != 3 {
        return Err(format!("num_retries {}", build.config.num_retries));
    }
    Ok(())
}

#[test]
fn valid_integers_override_defaults() -> TestResult {
    let build = common::build_with(&[
        (SUMO_NUM_RETRIES, "7"),
        (SUMO_MAX_DATAQUEUE_LENGTH, "+50"),
        (SUMO_MAX_CONCURRENT_REQUESTS, "-1"),
    ]);
    common::assert_ok(&build)?;
    let config = &build.config;
    if config.num_retries != 7
        || config.max_data_queue_length != 50
        || config.max_concurrent_requests != -1
    {
        return Err(format!("unexpected integers {config:?}"));
    }
    if config.max_retry_attempts != 5 {
        return Err("legacy retry count must not change max_retry_attempts".to_string());
    }
    Ok(())
}

#[test]
fn retry_sleep_accepts_millisecond_count() -> TestResult {
    let build = common::build_with(&[(SUMO_RETRY_SLEEP_TIME_MS, "1500")]);
    common::assert_ok(&build)?;
    if build.config.retry_sleep != Duration::from_millis(1500) {
        return Err(format!("retry_sleep {:?}", build.config.retry_sleep));
    }
    Ok(())
}

#[test]
fn negative_retry_sleep_means_no_wait() -> TestResult {
    let build = common::build_with(&[(SUMO_RETRY_SLEEP_TIME_MS, "-20")]);
    common::assert_ok(&build)?;
    if build.config.retry_sleep != Duration::ZERO {
        return Err(format!("retry_sleep {:?}", build.config.retry_sleep));
    }
    Ok(())
}

#[test]
fn malformed_retry_sleep_keeps_default() -> TestResult {
    let build = common::build_with(&[(SUMO_RETRY_SLEEP_TIME_MS, "1.5s")]);
    common::assert_issue(
        &build,
        IssueKind::MalformedValue,
        SUMO_RETRY_SLEEP_TIME_MS,
        "Unable to parse SUMO_RETRY_SLEEP_TIME_MS",
    )?;
    if build.config.retry_sleep != Duration::from_millis(300) {
        return Err(format!("retry_sleep {:?}", build.config.retry_sleep));
    }
    Ok(())
}

#[test]
fn log_level_is_case_insensitive() -> TestResult {
    let build = common::build_with(&[(SUMO_LOG_LEVEL, "DEBUG")]);
    common::assert_ok(&build)?;
    if build.config.log_level != LogLevel::Debug {
        return Err(format!("log_level {}", build.config.log_level));
    }
    Ok(())
}

#[test]
fn unknown_log_level_keeps_info() -> TestResult {
    let build = common::build_with(&[(SUMO_LOG_LEVEL, "verbose")]);
    common::assert_issue_count(&build, 1)?;
    common::assert_issue(&build, IssueKind::MalformedValue, SUMO_LOG_LEVEL, "\"verbose\"")?;
    if build.config.log_level != LogLevel::Info {
        return Err(format!("log_level {}", build.config.log_level));
    }
    Ok(())
}

#[test]
fn whitespace_around_integers_is_malformed() -> TestResult {
    let build = common::build_with(&[(SUMO_MAX_DATAQUEUE_LENGTH, " 10")]);
    common::assert_issue(
        &build,
        IssueKind::MalformedValue,
        SUMO_MAX_DATAQUEUE_LENGTH,
        "Unable to parse SUMO_MAX_DATAQUEUE_LENGTH",
    )?;
    Ok(())
}

#[test]
fn every_failure_is_reported_in_check_order() -> TestResult {
    let env = sumo_extension_config::EnvSnapshot::new()
        .with(SUMO_HTTP_ENDPOINT, "")
        .with(SUMO_ENABLE_FAILOVER, "true")
        .with(SUMO_NUM_RETRIES, "x")
        .with(SUMO_RETRY_SLEEP_TIME_MS, "y")
        .with(SUMO_MAX_DATAQUEUE_LENGTH, "z")
        .with(SUMO_MAX_CONCURRENT_REQUESTS, "w")
        .with(SUMO_LOG_LEVEL, "loud")
        .with(SUMO_LOG_TYPES, "bogus,platform,other");
    let build = ExtensionConfig::build(&env);
    let variables: Vec<&str> = build.issues().iter().map(|issue| issue.variable).collect();
    let expected = vec![
        SUMO_HTTP_ENDPOINT,
        SUMO_S3_BUCKET_NAME,
        SUMO_S3_BUCKET_REGION,
        SUMO_NUM_RETRIES,
        SUMO_RETRY_SLEEP_TIME_MS,
        SUMO_MAX_DATAQUEUE_LENGTH,
        SUMO_MAX_CONCURRENT_REQUESTS,
        SUMO_LOG_LEVEL,
        SUMO_LOG_TYPES,
        SUMO_LOG_TYPES,
    ];
    if variables != expected {
        return Err(format!("unexpected order {variables:?}"));
    }
    let error = build.error.ok_or_else(|| "expected aggregated error".to_string())?;
    let message = error.to_string();
    if !message.starts_with("SUMO_HTTP_ENDPOINT not set in environment variable, ") {
        return Err(format!("unexpected joined message {message}"));
    }
    if !message.ends_with("logType bogus is unsupported, logType other is unsupported") {
        return Err(format!("unexpected joined message {message}"));
    }
    Ok(())
}

#[test]
fn malformed_failover_flag_precedes_bucket_checks() -> TestResult {
    let build = common::build_with(&[(SUMO_ENABLE_FAILOVER, "maybe"), (SUMO_NUM_RETRIES, "q")]);
    let error = build.error.ok_or_else(|| "expected aggregated error".to_string())?;
    let variables: Vec<&str> = error.issues().iter().map(|issue| issue.variable).collect();
    if variables != vec![SUMO_ENABLE_FAILOVER, SUMO_NUM_RETRIES] {
        return Err(format!("unexpected order {variables:?}"));
    }
    if error.has_kind(IssueKind::ConditionalMissing) {
        return Err("bucket checks must not run when failover failed to parse".to_string());
    }
    Ok(())
}

#[test]
fn issues_can_be_filtered_by_variable() -> TestResult {
    let build = common::build_with(&[(SUMO_LOG_TYPES, "bogus,other"), (SUMO_LOG_LEVEL, "loud")]);
    let error = build.error.ok_or_else(|| "expected aggregated error".to_string())?;
    let log_type_messages: Vec<&str> =
        error.for_variable(SUMO_LOG_TYPES).map(|issue| issue.message.as_str()).collect();
    if log_type_messages != vec!["logType bogus is unsupported", "logType other is unsupported"] {
        return Err(format!("unexpected log type issues {log_type_messages:?}"));
    }
    if error.for_variable(SUMO_LOG_LEVEL).count() != 1 {
        return Err("expected one log level issue".to_string());
    }
    if error.for_variable(SUMO_NUM_RETRIES).next().is_some() {
        return Err("no retry issue was expected".to_string());
    }
    Ok(())
}
