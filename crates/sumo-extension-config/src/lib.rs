// crates/sumo-extension-config/src/lib.rs
// ============================================================================
// Module: Sumo Extension Config Library
// Description: Startup configuration model, coercion, and validation.
// Purpose: Single source of truth for the extension's environment settings.
// Dependencies: serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! `sumo-extension-config` turns a snapshot of the process environment into a
//! typed [`ExtensionConfig`]. Every optional setting has a fixed default, every
//! malformed value is reported, and all failures of one pass are aggregated
//! into a single [`ConfigError`] returned next to a best-effort configuration.
//!
//! Security posture: the collector endpoint embeds a secret; it is only ever
//! logged through [`RedactedConfig`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod coerce;
pub mod config;
pub mod env;
pub mod log;
pub mod vocab;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use env::EnvSnapshot;
pub use log::ConfigLoadEvent;
pub use log::ConfigLogSink;
pub use log::FileConfigLogSink;
pub use log::NoopConfigLogSink;
pub use log::StderrConfigLogSink;
pub use log::record_build;
pub use vocab::LogLevel;
pub use vocab::LogType;
