//! CLI TOML configuration tests
//!
//! Configuration file values and their command-line overrides.

use crate::common::TestConfig;
use clap::Parser;
use plugmesh::app::cli::args::Args;
use plugmesh::app::cli::config::Settings;
use plugmesh::core::logging::LogFormat;
use std::path::PathBuf;
use toml::Table;

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(args).unwrap()
}

#[test]
fn test_file_values_are_applied() {
    let config = TestConfig::with_contents(
        "log-level = \"debug\"\nlog-format = \"ext\"\nhistory-limit = 40\ncolor = false\n",
    );
    let path = config.path().to_string_lossy().into_owned();
    let settings = Settings::load(&parse(&["plugmesh", "--config-file", &path, "list"])).unwrap();

    assert_eq!(settings.log_level, "debug");
    assert_eq!(settings.log_format, LogFormat::Ext);
    assert_eq!(settings.history_limit, 40);
    assert_eq!(settings.color, Some(false));
    assert_eq!(settings.config_path, Some(config.path().to_path_buf()));
}

#[test]
fn test_cli_overrides_file_values() {
    let config = TestConfig::with_contents("log-level = \"debug\"\nhistory-limit = 40\n");
    let path = config.path().to_string_lossy().into_owned();
    let settings = Settings::load(&parse(&[
        "plugmesh",
        "--config-file",
        &path,
        "--log-level",
        "error",
        "--history-limit",
        "8",
        "--color",
        "list",
    ]))
    .unwrap();

    assert_eq!(settings.log_level, "error");
    assert_eq!(settings.history_limit, 8);
    assert_eq!(settings.color, Some(true));
}

#[test]
fn test_missing_file_uses_defaults() {
    let config = TestConfig::new();
    let path = config.path().to_string_lossy().into_owned();
    let settings = Settings::load(&parse(&["plugmesh", "--config-file", &path, "info"])).unwrap();

    assert_eq!(settings.history_limit, 1000);
    assert_eq!(settings.log_level, "info");
    assert_eq!(settings.log_file, None);
}

#[test]
fn test_invalid_file_value_names_the_key() {
    let config = TestConfig::with_contents("history-limit = 0\n");
    let path = config.path().to_string_lossy().into_owned();
    let err = Settings::load(&parse(&["plugmesh", "--config-file", &path, "list"])).unwrap_err();
    assert_eq!(err.field(), Some("history-limit"));
}

#[test]
fn test_plugins_table_is_left_to_the_flag_store() {
    let mut settings = Settings::default();
    let mut plugins = Table::new();
    plugins.insert("enabled".to_string(), toml::Value::Table(Table::new()));
    let mut config = Table::new();
    config.insert("plugins".to_string(), toml::Value::Table(plugins));
    config.insert(
        "log-file".to_string(),
        toml::Value::String("/var/log/plugmesh.log".to_string()),
    );

    settings.apply_toml_values(&config).unwrap();
    assert_eq!(settings.log_file, Some(PathBuf::from("/var/log/plugmesh.log")));
    assert_eq!(settings.history_limit, Settings::default().history_limit);
}
