//! Configuration loading tests

use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use unitrun_config::{ConfigError, ConfigLoader, ProjectConfig, ReportFormat};

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join("unitrun.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

fn loader_for(dir: &TempDir) -> ConfigLoader {
    ConfigLoader::with_global_path(dir.path().join("global.toml"))
}

// ============================================================================
// Basic Loading
// ============================================================================

#[test]
#[serial]
fn test_defaults_without_any_config() {
    let temp_dir = TempDir::new().unwrap();

    let config = loader_for(&temp_dir)
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert!(!config.is_project());
    assert_eq!(config.max_time_ms(), 0);
    assert_eq!(config.format(), ReportFormat::Console);
    assert!(!config.trace());
    assert_eq!(config.output(), None);
}

#[test]
#[serial]
fn test_load_from_specific_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[run]
disabled_suites = ["Slow"]

[report]
format = "json"
output = "report.json"
"#,
    );

    let config = loader_for(&temp_dir).load_from_file(&path).unwrap();

    assert_eq!(config.disabled_suites(), ["Slow"]);
    assert_eq!(config.format(), ReportFormat::Json);
    assert_eq!(config.output(), Some(temp_dir.path().join("report.json")));
}

#[test]
#[serial]
fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let result = loader_for(&temp_dir).load_from_file(&temp_dir.path().join("unitrun.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

// ============================================================================
// Invalid Config
// ============================================================================

#[rstest]
#[case::syntax("[run\nmax_time_ms = 1\n")]
#[case::unknown_field("[run]\nparallel = true\n")]
#[case::unknown_section("[package]\nname = \"x\"\n")]
#[case::negative_time("[run]\nmax_time_ms = -5\n")]
#[case::bad_format("[report]\nformat = \"tap\"\n")]
#[serial]
fn test_invalid_config_rejected(#[case] content: &str) {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), content);

    let result = loader_for(&temp_dir).load_from_directory(temp_dir.path());
    assert!(result.is_err());
}

#[test]
fn test_parse_error_names_the_file() {
    let err = ProjectConfig::parse("[report\n", Path::new("/p/unitrun.toml")).unwrap_err();
    assert!(err.to_string().contains("/p/unitrun.toml"));
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
#[serial]
fn test_env_format_and_trace() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[report]\nformat = \"console\"\n");

    env::set_var("UNITRUN_FORMAT", "xml");
    env::set_var("UNITRUN_TRACE", "yes");
    let result = loader_for(&temp_dir).load_from_directory(temp_dir.path());
    env::remove_var("UNITRUN_FORMAT");
    env::remove_var("UNITRUN_TRACE");

    let config = result.unwrap();
    assert_eq!(config.format(), ReportFormat::Xml);
    assert!(config.trace());
}

#[test]
#[serial]
fn test_bad_env_format_rejected() {
    let temp_dir = TempDir::new().unwrap();

    env::set_var("UNITRUN_FORMAT", "html");
    let result = loader_for(&temp_dir).load_from_directory(temp_dir.path());
    env::remove_var("UNITRUN_FORMAT");

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_global_config_fills_gaps() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("global.toml"),
        "[defaults]\nmax_time_ms = 500\ncolor = false\n",
    )
    .unwrap();
    create_config_file(temp_dir.path(), "[run]\nmax_time_ms = 20\n");

    let config = loader_for(&temp_dir)
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert_eq!(config.max_time_ms(), 20);
    assert!(!config.color());
}
