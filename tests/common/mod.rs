//! Common test utilities and helpers

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Temporary directory holding a configuration file path that may not exist yet
pub struct TestConfig {
    _dir: TempDir,
    path: PathBuf,
}

impl TestConfig {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("plugmesh.toml");
        Self { _dir: dir, path }
    }

    pub fn with_contents(contents: &str) -> Self {
        let config = Self::new();
        std::fs::write(&config.path, contents).expect("write config file");
        config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap_or_default()
    }
}

/// Run the binary with `--config-file` pointing at `config` and colors off
pub fn run_plugmesh(config: &TestConfig, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_plugmesh"))
        .arg("--config-file")
        .arg(config.path())
        .arg("--no-color")
        .args(["--log-level", "warn"])
        .args(args)
        .output()
        .expect("run plugmesh binary")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
