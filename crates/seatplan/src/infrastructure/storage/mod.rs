//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file (institution
//! names printed on the plan, the hall form defaults, the log level), writes
//! it back, and falls back to defaults when the file does not exist yet.

pub mod config;
