//! CLI argument parsing tests

use clap::Parser;
use plugmesh::app::cli::args::*;
use serde_json::json;
use std::path::PathBuf;

#[test]
fn test_global_options_before_command() {
    let args = Args::try_parse_from([
        "plugmesh",
        "--config-file",
        "/tmp/custom.toml",
        "--log-level",
        "debug",
        "--log-format",
        "ext",
        "--history-limit",
        "20",
        "list",
    ])
    .unwrap();

    assert_eq!(args.config_file, Some(PathBuf::from("/tmp/custom.toml")));
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("ext"));
    assert_eq!(args.history_limit, Some(20));
    assert_eq!(args.command, Command::List);
}

#[test]
fn test_global_options_after_command() {
    let args = Args::try_parse_from(["plugmesh", "order", "--no-color", "-l", "warn"]).unwrap();
    assert_eq!(args.command, Command::Order);
    assert_eq!(args.color_override(), Some(false));
    assert_eq!(args.log_level.as_deref(), Some("warn"));
}

#[test]
fn test_color_flags_conflict() {
    assert!(Args::try_parse_from(["plugmesh", "--color", "--no-color", "list"]).is_err());
    let args = Args::try_parse_from(["plugmesh", "list"]).unwrap();
    assert_eq!(args.color_override(), None);
}

#[test]
fn test_run_collects_repeated_calls() {
    let args = Args::try_parse_from([
        "plugmesh",
        "run",
        "--call",
        "math.add=[1,2]",
        "--call",
        "audit.calls",
        "--json",
    ])
    .unwrap();

    match args.command {
        Command::Run { calls, json } => {
            assert!(json);
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[0].interface, "math");
            assert_eq!(calls[0].method, "add");
            assert_eq!(calls[0].args, vec![json!(1), json!(2)]);
            assert_eq!(calls[1].to_string(), "audit.calls");
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(Args::try_parse_from(["plugmesh", "--log-level", "loud", "list"]).is_err());
    assert!(Args::try_parse_from(["plugmesh", "--log-format", "xml", "list"]).is_err());
    assert!(Args::try_parse_from(["plugmesh", "--history-limit", "1", "list"]).is_err());
    assert!(Args::try_parse_from(["plugmesh", "run", "--call", "math.add=5"]).is_err());
    assert!(Args::try_parse_from(["plugmesh", "enable"]).is_err());
    assert!(Args::try_parse_from(["plugmesh"]).is_err());
}

#[test]
fn test_check_takes_optional_plugin() {
    let all = Args::try_parse_from(["plugmesh", "check"]).unwrap();
    assert_eq!(all.command, Command::Check { plugin: None });

    let one = Args::try_parse_from(["plugmesh", "check", "audit"]).unwrap();
    assert_eq!(
        one.command,
        Command::Check {
            plugin: Some("audit".to_string())
        }
    );
}
