//! Unitrun Configuration
//!
//! Settings for the test driver, read from:
//! - Project configuration (unitrun.toml)
//! - Global user configuration (~/.unitrun/config.toml)
//! - Environment variables (UNITRUN_*, NO_COLOR)
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Global config (~/.unitrun/config.toml)
//! 2. Project config (./unitrun.toml, searched upwards)
//! 3. Environment variables
//! 4. CLI flags (applied by the driver)
//!
//! # Example
//!
//! ```no_run
//! use unitrun_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("max time: {}ms", config.max_time_ms());
//! ```

pub mod global;
pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use global::GlobalConfig;
pub use loader::{Config, ConfigLoader};
pub use project::{ProjectConfig, ReportFormat};
