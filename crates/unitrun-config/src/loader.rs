//! Configuration Loader
//!
//! Finds and merges configuration sources with proper precedence.

use crate::global::GlobalConfig;
use crate::project::{ProjectConfig, ReportFormat};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = "unitrun.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.unitrun/config.toml) - lowest priority
/// 2. Project config (unitrun.toml) - overrides global
/// 3. Environment variables (UNITRUN_*, NO_COLOR) - overrides project
/// 4. CLI flags - highest priority (handled by the driver)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Project configuration, with environment overrides applied
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Directory where unitrun.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use `path` instead of ~/.unitrun/config.toml for the global config
    pub fn with_global_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find unitrun.toml, then loads the
    /// global config if it exists and applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        let global_config = self.load_global_config().unwrap_or_default();
        let project_config = apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let global_config = self.load_global_config().unwrap_or_default();
        let project_config = apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root: config_path.parent().map(Path::to_path_buf),
        })
    }

    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        // Optional: a missing file means defaults
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides to project config
fn apply_env_overrides(mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
    if let Ok(max_time) = env::var("UNITRUN_MAX_TIME_MS") {
        let value = max_time
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "UNITRUN_MAX_TIME_MS".to_string(),
                reason: format!("'{}' is not a number of milliseconds ({})", max_time, e),
            })?;
        config.run_mut().max_time_ms = Some(value);
    }

    if let Ok(format) = env::var("UNITRUN_FORMAT") {
        config.report_mut().format = Some(format.parse::<ReportFormat>()?);
    }

    if let Ok(output) = env::var("UNITRUN_OUTPUT") {
        if !output.is_empty() {
            config.report_mut().output = Some(PathBuf::from(output));
        }
    }

    if let Ok(trace) = env::var("UNITRUN_TRACE") {
        config.report_mut().trace = Some(parse_flag(&trace));
    }

    // https://no-color.org: any non-empty value disables color
    if env::var("NO_COLOR").is_ok_and(|v| !v.is_empty()) {
        config.report_mut().color = Some(false);
    }

    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

impl Config {
    /// Global time budget per test (project > global > 0)
    pub fn max_time_ms(&self) -> u64 {
        self.project
            .max_time_ms()
            .or_else(|| self.global.default_max_time_ms())
            .unwrap_or(0)
    }

    /// Reporter format (project > global > console)
    pub fn format(&self) -> ReportFormat {
        self.project
            .format()
            .or_else(|| self.global.default_format())
            .unwrap_or_default()
    }

    /// Report destination; relative paths resolve against the project root
    pub fn output(&self) -> Option<PathBuf> {
        let output = self.project.output()?;
        match &self.project_root {
            Some(root) if output.is_relative() => Some(root.join(output)),
            _ => Some(output.to_path_buf()),
        }
    }

    pub fn color(&self) -> bool {
        self.project
            .color()
            .or_else(|| self.global.default_color())
            .unwrap_or(true)
    }

    pub fn trace(&self) -> bool {
        self.project
            .trace()
            .or_else(|| self.global.default_trace())
            .unwrap_or(false)
    }

    pub fn disabled_suites(&self) -> &[String] {
        self.project.disabled_suites()
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a unitrun.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
