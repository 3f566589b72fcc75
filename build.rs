//! Generates `$OUT_DIR/version.rs` with the plugin API version, build time and
//! git revision. Cargo reruns this script when the manifest or HEAD moves, and
//! every run rewrites the file.

use chrono::Utc;
use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::Command;

const UNKNOWN: &str = "unknown";

struct BuildInfo {
    plugin_api_version: String,
    build_time: String,
    git_hash: String,
}

impl BuildInfo {
    fn collect(manifest_path: &Path) -> Result<Self, Box<dyn Error>> {
        let manifest = std::fs::read_to_string(manifest_path)?;
        Ok(Self {
            plugin_api_version: plugin_api_version(&manifest),
            build_time: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            git_hash: git_hash(),
        })
    }

    fn render(&self) -> String {
        format!(
            "pub const PLUGIN_API_VERSION: &str = {:?};\n\
             pub const BUILD_TIME: &str = {:?};\n\
             pub const GIT_HASH: &str = {:?};\n",
            self.plugin_api_version, self.build_time, self.git_hash
        )
    }
}

/// `[package.metadata] plugin_api_version`, or "unknown"
fn plugin_api_version(manifest: &str) -> String {
    manifest
        .parse::<toml::Table>()
        .ok()
        .and_then(|table| {
            table
                .get("package")?
                .get("metadata")?
                .get("plugin_api_version")?
                .as_integer()
        })
        .map_or_else(|| UNKNOWN.to_string(), |version| version.to_string())
}

fn git_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").ok_or("OUT_DIR is not set")?);
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);

    let info = BuildInfo::collect(&manifest_dir.join("Cargo.toml"))?;
    std::fs::write(out_dir.join("version.rs"), info.render())?;
    Ok(())
}
