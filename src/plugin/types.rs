//! Type definitions for the plugin system
//!
//! Identity, dependency declarations and lifecycle status of plugins as seen by
//! the dependency resolver and the interaction manager.

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Lifecycle status of a plugin
///
/// Transitions are driven only by the interaction manager; the dependency graph
/// reads the status when validating dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PluginStatus {
    #[default]
    Inactive,
    Loading,
    Active,
    Error,
    Disabled,
}

impl PluginStatus {
    /// Whether the state machine allows moving from `self` to `next`
    ///
    /// `Disabled` is reachable from anywhere and can only be left towards
    /// `Inactive` (re-enable). `Error` may be retried or reset.
    pub fn can_transition_to(self, next: PluginStatus) -> bool {
        use PluginStatus::*;
        matches!(
            (self, next),
            (Inactive, Loading)
                | (Loading, Active)
                | (Loading, Error)
                | (Active, Inactive)
                | (Error, Loading)
                | (Error, Inactive)
                | (Disabled, Inactive)
                | (Inactive | Loading | Active | Error, Disabled)
        )
    }
}

/// How a plugin relates to one of its dependency targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Target must be present and active
    Required,
    /// Target is used when present; absence is only a warning
    Optional,
    /// Target must not be active at the same time
    Conflict,
}

/// A single declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub target_id: String,
    pub kind: DependencyKind,
    /// Opaque version constraint, interpreted by whoever supplies plugins
    pub version_spec: String,
}

impl Dependency {
    pub fn new(target_id: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            target_id: target_id.into(),
            kind,
            version_spec: String::new(),
        }
    }

    pub fn required(target_id: impl Into<String>) -> Self {
        Self::new(target_id, DependencyKind::Required)
    }

    pub fn optional(target_id: impl Into<String>) -> Self {
        Self::new(target_id, DependencyKind::Optional)
    }

    pub fn conflict(target_id: impl Into<String>) -> Self {
        Self::new(target_id, DependencyKind::Conflict)
    }

    pub fn with_version(mut self, version_spec: impl Into<String>) -> Self {
        self.version_spec = version_spec.into();
        self
    }

    /// Required and Optional dependencies order the load sequence; conflicts do not
    pub fn is_ordering_edge(&self) -> bool {
        matches!(self.kind, DependencyKind::Required | DependencyKind::Optional)
    }
}

/// Identity of a plugin inside the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    pub id: String,
    pub dependencies: Vec<Dependency>,
    pub status: PluginStatus,
}

impl PluginDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dependencies: Vec::new(),
            status: PluginStatus::Inactive,
        }
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = Dependency>) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    /// Targets of Required and Optional dependencies, in declaration order
    pub fn ordering_targets(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .filter(|d| d.is_ordering_edge())
            .map(|d| d.target_id.as_str())
    }
}

/// Result of validating one plugin's declared dependencies
///
/// Never an error value: callers inspect `valid` and decide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl DependencyReport {
    pub(crate) fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}
