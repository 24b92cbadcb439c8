//! TOML-based configuration for the seating planner.
//!
//! The default location is the platform config directory:
//! - Windows:  `%APPDATA%\Seatplan\config.toml`
//! - Linux:    `~/.config/seatplan/config.toml`
//! - macOS:    `~/Library/Application Support/Seatplan/config.toml`
//!
//! Any other path can be passed with `--config`.
//!
//! # What goes in the file? (for beginners)
//!
//! ```toml
//! [institution]
//! college_name = "A.V.C. COLLEGE OF ENGINEERING"
//! department_name = "DEPARTMENT OF COMPUTER SCIENCE AND ENGINEERING"
//! exam_title = "UNIT TEST SEATING ARRANGEMENT"
//!
//! [hall_defaults]
//! name = "Hall 1"
//! rows = 5
//! cols = 4
//! capacity = 2
//!
//! [logging]
//! log_level = "info"
//! ```
//!
//! # Serde default values
//!
//! Every field is annotated with `#[serde(default = "some_fn")]`, and every
//! section with `#[serde(default)]`, so an empty file, a file with only one
//! section, or no file at all all produce a working configuration.

use std::path::{Path, PathBuf};

use seatplan_core::HallConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub institution: InstitutionConfig,
    #[serde(default)]
    pub hall_defaults: HallDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Names printed at the top of every page of the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstitutionConfig {
    #[serde(default = "default_college_name")]
    pub college_name: String,
    #[serde(default = "default_department_name")]
    pub department_name: String,
    #[serde(default = "default_exam_title")]
    pub exam_title: String,
}

/// Starting values of the hall form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HallDefaults {
    #[serde(default = "default_hall_name")]
    pub name: String,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_cols")]
    pub cols: u32,
    /// Seats per desk.
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

impl HallDefaults {
    pub fn to_hall_config(&self) -> HallConfig {
        HallConfig::new(self.name.clone(), self.rows, self.cols, self.capacity)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_college_name() -> String {
    "A.V.C. COLLEGE OF ENGINEERING".to_string()
}
fn default_department_name() -> String {
    "DEPARTMENT OF COMPUTER SCIENCE AND ENGINEERING".to_string()
}
fn default_exam_title() -> String {
    "UNIT TEST SEATING ARRANGEMENT".to_string()
}
fn default_hall_name() -> String {
    "Hall 1".to_string()
}
fn default_rows() -> u32 {
    5
}
fn default_cols() -> u32 {
    4
}
fn default_capacity() -> u32 {
    2
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            college_name: default_college_name(),
            department_name: default_department_name(),
            exam_title: default_exam_title(),
        }
    }
}

impl Default for HallDefaults {
    fn default() -> Self {
        Self {
            name: default_hall_name(),
            rows: default_rows(),
            cols: default_cols(),
            capacity: default_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory plus the `Seatplan` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Seatplan"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("seatplan"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Seatplan")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
