//! Project Configuration (unitrun.toml)
//!
//! Per-project driver settings, found by walking up from the working directory.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Project configuration from unitrun.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Run settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunConfig>,

    /// Report settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,
}

/// `[run]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Global per-test time budget in milliseconds (0 disables it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time_ms: Option<u64>,

    /// Suites that are registered but skipped by a full run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_suites: Vec<String>,
}

/// `[report]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Which reporter to use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ReportFormat>,

    /// Write the report to this file instead of stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Colorize console output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Emit suite/test start and finish lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<bool>,
}

/// Reporter selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text on the console
    #[default]
    Console,
    /// XML document written at the end of the run
    Xml,
    /// JSON document written at the end of the run
    Json,
    /// Structured `tracing` events
    Trace,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Console => "console",
            ReportFormat::Xml => "xml",
            ReportFormat::Json => "json",
            ReportFormat::Trace => "trace",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(ReportFormat::Console),
            "xml" => Ok(ReportFormat::Xml),
            "json" => Ok(ReportFormat::Json),
            "trace" => Ok(ReportFormat::Trace),
            other => Err(ConfigError::InvalidValue {
                field: "report.format".to_string(),
                reason: format!(
                    "unknown format '{}' (expected console, xml, json or trace)",
                    other
                ),
            }),
        }
    }
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parse and validate configuration text; `path` is used for error messages
    pub fn parse(content: &str, path: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(run) = &self.run {
            for name in &run.disabled_suites {
                if name.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "run.disabled_suites".to_string(),
                        reason: "suite names cannot be empty".to_string(),
                    });
                }
            }
        }

        if let Some(output) = self.report.as_ref().and_then(|r| r.output.as_ref()) {
            if output.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "report.output".to_string(),
                    reason: "output path cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn max_time_ms(&self) -> Option<u64> {
        self.run.as_ref().and_then(|r| r.max_time_ms)
    }

    pub fn disabled_suites(&self) -> &[String] {
        self.run
            .as_ref()
            .map(|r| r.disabled_suites.as_slice())
            .unwrap_or(&[])
    }

    pub fn format(&self) -> Option<ReportFormat> {
        self.report.as_ref().and_then(|r| r.format)
    }

    pub fn output(&self) -> Option<&Path> {
        self.report.as_ref().and_then(|r| r.output.as_deref())
    }

    pub fn color(&self) -> Option<bool> {
        self.report.as_ref().and_then(|r| r.color)
    }

    pub fn trace(&self) -> Option<bool> {
        self.report.as_ref().and_then(|r| r.trace)
    }

    /// Mutable access to the `[run]` section, creating it when absent
    pub fn run_mut(&mut self) -> &mut RunConfig {
        self.run.get_or_insert_with(RunConfig::default)
    }

    /// Mutable access to the `[report]` section, creating it when absent
    pub fn report_mut(&mut self) -> &mut ReportConfig {
        self.report.get_or_insert_with(ReportConfig::default)
    }
}
