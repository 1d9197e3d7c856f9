//! Global Configuration (~/.unitrun/config.toml)
//!
//! User-level defaults applied to every project.

use crate::project::ReportFormat;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.unitrun/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// `[defaults]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ReportFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time_ms: Option<u64>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        Ok(config)
    }

    /// Get the global config file path (~/.unitrun/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".unitrun").join("config.toml"))
    }

    pub fn default_format(&self) -> Option<ReportFormat> {
        self.defaults.as_ref().and_then(|d| d.format)
    }

    pub fn default_color(&self) -> Option<bool> {
        self.defaults.as_ref().and_then(|d| d.color)
    }

    pub fn default_trace(&self) -> Option<bool> {
        self.defaults.as_ref().and_then(|d| d.trace)
    }

    pub fn default_max_time_ms(&self) -> Option<u64> {
        self.defaults.as_ref().and_then(|d| d.max_time_ms)
    }

    /// Merge another global config into this one.
    /// Values set in `other` win; unset values keep the current setting.
    pub fn merge(&mut self, other: &GlobalConfig) {
        let Some(theirs) = &other.defaults else {
            return;
        };
        let ours = self.defaults.get_or_insert_with(DefaultsConfig::default);
        if theirs.format.is_some() {
            ours.format = theirs.format;
        }
        if theirs.color.is_some() {
            ours.color = theirs.color;
        }
        if theirs.trace.is_some() {
            ours.trace = theirs.trace;
        }
        if theirs.max_time_ms.is_some() {
            ours.max_time_ms = theirs.max_time_ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_config() {
        let toml = r#"
[defaults]
format = "console"
color = false
max_time_ms = 1000
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format(), Some(ReportFormat::Console));
        assert_eq!(config.default_color(), Some(false));
        assert_eq!(config.default_trace(), None);
        assert_eq!(config.default_max_time_ms(), Some(1000));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let toml = "[lsp]\nhover = true\n";
        assert!(toml::from_str::<GlobalConfig>(toml).is_err());
    }

    #[test]
    fn test_merge_keeps_unset_values() {
        let mut base = GlobalConfig {
            defaults: Some(DefaultsConfig {
                color: Some(true),
                trace: Some(true),
                ..Default::default()
            }),
        };
        let override_config = GlobalConfig {
            defaults: Some(DefaultsConfig {
                color: Some(false),
                ..Default::default()
            }),
        };

        base.merge(&override_config);
        assert_eq!(base.default_color(), Some(false));
        assert_eq!(base.default_trace(), Some(true));
    }
}
