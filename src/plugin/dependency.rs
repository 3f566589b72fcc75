//! Dependency Graph
//!
//! Stores declared dependencies per plugin, validates them against the current
//! plugin statuses and computes a load order in which every plugin follows its
//! Required and Optional dependencies.

use crate::core::cleanup::Cleanup;
use crate::plugin::error::CycleError;
use crate::plugin::types::{DependencyKind, DependencyReport, PluginDescriptor, PluginStatus};
use std::collections::HashMap;

/// DFS colouring used by `compute_load_order`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS stack
    Visiting,
    /// Emitted into the order
    Done,
}

/// Plugin descriptors keyed by id, remembering the order they were added
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<String, PluginDescriptor>,
    insertion_order: Vec<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a descriptor and its edges
    ///
    /// A replaced plugin keeps its original position for tie-breaking and the
    /// previous descriptor is returned.
    pub fn add_plugin(&mut self, descriptor: PluginDescriptor) -> Option<PluginDescriptor> {
        let id = descriptor.id.clone();
        let previous = self.nodes.insert(id.clone(), descriptor);
        if previous.is_none() {
            self.insertion_order.push(id);
        }
        previous
    }

    /// Remove a plugin and its outgoing edges
    ///
    /// Edges from other plugins to `id` stay in their descriptors; they show up
    /// again as missing dependencies in `check_dependencies`.
    pub fn remove_plugin(&mut self, id: &str) -> Option<PluginDescriptor> {
        let removed = self.nodes.remove(id)?;
        self.insertion_order.retain(|existing| existing != id);
        Some(removed)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&PluginDescriptor> {
        self.nodes.get(id)
    }

    pub fn status(&self, id: &str) -> Option<PluginStatus> {
        self.nodes.get(id).map(|d| d.status)
    }

    /// Overwrite a plugin's status, returning the previous one
    ///
    /// Transition rules live in the interaction manager.
    pub(crate) fn set_status(&mut self, id: &str, status: PluginStatus) -> Option<PluginStatus> {
        let descriptor = self.nodes.get_mut(id)?;
        Some(std::mem::replace(&mut descriptor.status, status))
    }

    /// Plugin ids in the order they were first added
    pub fn plugin_ids(&self) -> Vec<String> {
        self.insertion_order.clone()
    }

    /// Descriptors in the order they were first added
    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Plugins that hold a Required or Optional edge to `id`
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        self.descriptors()
            .filter(|d| d.ordering_targets().any(|target| target == id))
            .map(|d| d.id.clone())
            .collect()
    }

    /// Validate the declared dependencies of one plugin
    ///
    /// - Required target absent or not `Active`: error
    /// - Optional target absent: warning
    /// - Conflict target present and `Active`: error
    pub fn check_dependencies(&self, id: &str) -> DependencyReport {
        let Some(descriptor) = self.nodes.get(id) else {
            return DependencyReport::from_findings(
                vec![format!("plugin not registered: {}", id)],
                Vec::new(),
            );
        };

        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for dependency in &descriptor.dependencies {
            let target = dependency.target_id.as_str();
            let target_status = self.status(target);

            match (dependency.kind, target_status) {
                (DependencyKind::Required, None) => {
                    errors.push(format!("missing required dependency: {}", target));
                }
                (DependencyKind::Required, Some(status)) if status != PluginStatus::Active => {
                    errors.push(format!(
                        "required dependency not active: {} (status: {})",
                        target, status
                    ));
                }
                (DependencyKind::Optional, None) => {
                    warnings.push(format!("missing optional dependency: {}", target));
                }
                (DependencyKind::Conflict, Some(PluginStatus::Active)) => {
                    errors.push(format!("conflicting plugin is active: {}", target));
                }
                _ => {}
            }
        }

        log::trace!(
            "Dependency check for '{}': {} error(s), {} warning(s)",
            id,
            errors.len(),
            warnings.len()
        );
        DependencyReport::from_findings(errors, warnings)
    }

    /// Depth-first topological sort over Required and Optional edges
    ///
    /// Unconstrained plugins come out in insertion order. Edges to plugins that
    /// are not in the graph are skipped here and reported by
    /// `check_dependencies`. A back edge to a plugin still on the DFS stack is a
    /// cycle; the error carries the full path. The walk keeps its own stack, so
    /// chain length is bounded by memory rather than the thread stack.
    pub fn compute_load_order(&self) -> Result<Vec<String>, CycleError> {
        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(self.nodes.len());
        let mut order = Vec::with_capacity(self.nodes.len());

        for id in &self.insertion_order {
            if let Err(cycle) = self.visit(id, &mut marks, &mut order) {
                log::warn!("{}", cycle);
                return Err(cycle);
            }
        }

        log::debug!("Computed load order: {:?}", order);
        Ok(order)
    }

    /// Ordering targets of `id` that exist in the graph, in declaration order
    fn present_targets(&self, id: &str) -> Vec<&str> {
        self.nodes.get(id).map_or_else(Vec::new, |descriptor| {
            descriptor
                .ordering_targets()
                .filter(|target| self.nodes.contains_key(*target))
                .collect()
        })
    }

    fn visit<'a>(
        &'a self,
        root: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        order: &mut Vec<String>,
    ) -> Result<(), CycleError> {
        if marks.contains_key(root) || !self.nodes.contains_key(root) {
            return Ok(());
        }

        marks.insert(root, Mark::Visiting);
        let mut stack = vec![Frame {
            id: root,
            targets: self.present_targets(root),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(&target) = frame.targets.get(frame.next) else {
                let id = frame.id;
                stack.pop();
                marks.insert(id, Mark::Done);
                order.push(id.to_string());
                continue;
            };
            frame.next += 1;

            match marks.get(target) {
                Some(Mark::Done) => {}
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|f| f.id == target).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[start..].iter().map(|f| f.id.to_string()).collect();
                    path.push(target.to_string());
                    return Err(CycleError::new(path));
                }
                None => {
                    marks.insert(target, Mark::Visiting);
                    stack.push(Frame {
                        id: target,
                        targets: self.present_targets(target),
                        next: 0,
                    });
                }
            }
        }
        Ok(())
    }
}

/// One plugin on the DFS stack and the index of its next edge to follow
struct Frame<'a> {
    id: &'a str,
    targets: Vec<&'a str>,
    next: usize,
}

impl Cleanup for DependencyGraph {
    fn cleanup(&mut self) {
        self.nodes.clear();
        self.insertion_order.clear();
    }
}
