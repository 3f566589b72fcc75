//! Build metadata and API version accessors.
//! Includes the version.rs generated by the build script so the library and the
//! binary share a single source of truth.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Parse the plugin API version string from the build script into u32.
/// Falls back to a stable default if parsing fails.
pub fn get_api_version() -> u32 {
    PLUGIN_API_VERSION.parse().unwrap_or(20261001)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}
