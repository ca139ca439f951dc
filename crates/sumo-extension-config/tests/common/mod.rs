// crates/sumo-extension-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config build tests.
// Purpose: Reduce duplication across integration tests for sumo-extension-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use sumo_extension_config::ConfigBuild;
use sumo_extension_config::EnvSnapshot;
use sumo_extension_config::ExtensionConfig;
use sumo_extension_config::IssueKind;
use sumo_extension_config::env::SUMO_HTTP_ENDPOINT;

/// Collector endpoint that passes validation.
pub const VALID_ENDPOINT: &str =
    "https://collectors.sumologic.com/receiver/v1/http/ZaVnC4dhaV2ZKqH8gTk0";

/// Returns a snapshot holding only a valid endpoint.
pub fn base_env() -> EnvSnapshot {
    EnvSnapshot::new().with(SUMO_HTTP_ENDPOINT, VALID_ENDPOINT)
}

/// Builds a config from `base_env` plus the given overrides.
pub fn build_with(overrides: &[(&str, &str)]) -> ConfigBuild {
    let env = overrides
        .iter()
        .fold(base_env(), |env, (name, value)| env.with(*name, *value));
    ExtensionConfig::build(&env)
}

/// Returns the issue messages of a build.
pub fn messages(build: &ConfigBuild) -> Vec<String> {
    build.issues().iter().map(|issue| issue.message.clone()).collect()
}

/// Asserts the build is free of issues.
pub fn assert_ok(build: &ConfigBuild) -> Result<(), String> {
    if build.is_ok() {
        Ok(())
    } else {
        Err(format!("expected no issues, got {:?}", messages(build)))
    }
}

/// Asserts the build recorded exactly `expected` issues.
pub fn assert_issue_count(build: &ConfigBuild, expected: usize) -> Result<(), String> {
    let count = build.issues().len();
    if count == expected {
        Ok(())
    } else {
        Err(format!("expected {expected} issues, got {count}: {:?}", messages(build)))
    }
}

/// Asserts an issue of `kind` for `variable` whose message contains `needle`.
pub fn assert_issue(
    build: &ConfigBuild,
    kind: IssueKind,
    variable: &str,
    needle: &str,
) -> Result<(), String> {
    let found = build.issues().iter().any(|issue| {
        issue.kind == kind && issue.variable == variable && issue.message.contains(needle)
    });
    if found {
        Ok(())
    } else {
        Err(format!(
            "no {kind} issue for {variable} containing {needle:?} in {:?}",
            messages(build)
        ))
    }
}
