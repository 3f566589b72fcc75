//! End-to-end tests against the built binary
//!
//! Every run points `--config-file` at a temporary directory so the user's own
//! configuration is never read or written.

use crate::common::{run_plugmesh, stdout_of, TestConfig};
use serde_json::Value;

#[test]
fn test_info_prints_build_metadata() {
    let config = TestConfig::new();
    let output = run_plugmesh(&config, &["info"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    assert!(stdout.contains("Plugin API"));
    assert!(stdout.contains("Git hash"));
}

#[test]
fn test_order_puts_math_before_audit() {
    let config = TestConfig::new();
    let output = run_plugmesh(&config, &["order"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    let math = stdout.find("math").expect("math listed");
    let audit = stdout.find("audit").expect("audit listed");
    assert!(math < audit);
}

#[test]
fn test_list_shows_dependencies() {
    let config = TestConfig::new();
    let output = run_plugmesh(&config, &["list"]);
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("math (required >=1.0)"));
    assert!(stdout.contains("metrics (optional)"));
    assert!(stdout.contains("legacy-audit (conflict)"));
}

#[test]
fn test_run_json_reports_calls_and_events() {
    let config = TestConfig::new();
    let output = run_plugmesh(
        &config,
        &[
            "run",
            "--call",
            "math.add=[1,2]",
            "--call",
            "text.upper=[\"mesh\"]",
            "--call",
            "audit.calls",
            "--json",
        ],
    );
    assert!(output.status.success());

    let document: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(document["calls"][0]["result"], Value::from(3));
    assert_eq!(document["calls"][1]["result"], Value::from("MESH"));
    assert_eq!(document["calls"][2]["result"], Value::from(3));
    assert_eq!(document["statistics"]["math.add"], Value::from(1));
    // discovery registers audit first; its dependency on math pulls math ahead
    assert_eq!(
        document["activation"]["activated"],
        serde_json::json!(["math", "audit", "text"])
    );

    let events = document["events"].as_array().expect("events array");
    assert!(events
        .iter()
        .any(|event| event["name"] == "method_called"
            && event["payload"]["interface"] == "math"));
    assert!(events
        .iter()
        .any(|event| event["name"] == "interface_registered"));
}

#[test]
fn test_failed_call_exits_non_zero() {
    let config = TestConfig::new();
    let output = run_plugmesh(&config, &["run", "--call", "math.divide=[1,0]"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains("division by zero"));
}

#[test]
fn test_unknown_interface_exits_non_zero() {
    let config = TestConfig::new();
    let output = run_plugmesh(&config, &["run", "--call", "storage.get", "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let document: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let error = document["calls"][0]["error"].as_str().unwrap_or_default();
    assert!(error.contains("Unknown interface"));
}

#[test]
fn test_disable_and_enable_persist_flags() {
    let config = TestConfig::with_contents("log-level = \"warn\"\n");

    let output = run_plugmesh(&config, &["disable", "math"]);
    assert!(output.status.success());
    let contents = config.read();
    assert!(contents.contains("math = false"));
    assert!(contents.contains("log-level"));

    // audit requires math, so checking now fails
    let output = run_plugmesh(&config, &["check", "audit"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run_plugmesh(&config, &["enable", "math"]);
    assert!(output.status.success());
    assert!(config.read().contains("math = true"));

    let output = run_plugmesh(&config, &["check"]);
    assert!(output.status.success());
}

#[test]
fn test_unknown_plugin_is_an_error() {
    let config = TestConfig::new();
    let output = run_plugmesh(&config, &["disable", "nonexistent"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_unknown_config_key_is_reported_on_stderr() {
    let config = TestConfig::with_contents("frobnicate = true\n");
    let output = run_plugmesh(&config, &["info"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Ignoring unknown configuration key 'frobnicate'"),
        "stderr was: {}",
        stderr
    );
}
