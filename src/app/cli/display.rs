//! CLI display utilities for formatting output
//!
//! Every builder returns a `prettytable::Table` so tests can inspect the plain
//! text; colors are attached as style specs and only rendered by `print_table`.

use crate::core::styles::StyleRole;
use crate::events::api::EventRecord;
use crate::plugin::api::{
    CallStatistics, Dependency, DependencyReport, InterfaceInfo, PluginDescriptor, PluginStatus,
};
use prettytable::{format, Cell, Row, Table};
use serde_json::Value;

/// Outcome of one `run --call`
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CallOutcome {
    pub call: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

fn new_table(titles: &[&str], use_color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(Row::new(
        titles
            .iter()
            .map(|title| styled(title, StyleRole::Header, use_color))
            .collect(),
    ));
    table
}

fn styled(text: &str, role: StyleRole, use_color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.to_prettytable_spec() {
        Some(spec) if use_color => cell.style_spec(&spec),
        _ => cell,
    }
}

fn status_cell(status: PluginStatus, use_color: bool) -> Cell {
    styled(&status.to_string(), StyleRole::for_status(status), use_color)
}

/// `math (required >=1.0)`
pub fn dependency_label(dependency: &Dependency) -> String {
    if dependency.version_spec.is_empty() {
        format!("{} ({})", dependency.target_id, dependency.kind)
    } else {
        format!(
            "{} ({} {})",
            dependency.target_id, dependency.kind, dependency.version_spec
        )
    }
}

fn compact_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Plugins with status, enable flag and declared dependencies
pub fn plugins_table(plugins: &[(PluginDescriptor, bool)], use_color: bool) -> Table {
    let mut table = new_table(&["Plugin", "Status", "Enabled", "Dependencies"], use_color);
    for (descriptor, enabled) in plugins {
        let dependencies = if descriptor.dependencies.is_empty() {
            "-".to_string()
        } else {
            descriptor
                .dependencies
                .iter()
                .map(dependency_label)
                .collect::<Vec<_>>()
                .join("\n")
        };
        table.add_row(Row::new(vec![
            styled(&descriptor.id, StyleRole::Key, use_color),
            status_cell(descriptor.status, use_color),
            if *enabled {
                styled("yes", StyleRole::Active, use_color)
            } else {
                styled("no", StyleRole::Disabled, use_color)
            },
            Cell::new(&dependencies),
        ]));
    }
    table
}

pub fn load_order_table(order: &[String], use_color: bool) -> Table {
    let mut table = new_table(&["#", "Plugin"], use_color);
    for (position, id) in order.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(position + 1).to_string()),
            styled(id, StyleRole::Key, use_color),
        ]));
    }
    table
}

/// One row per plugin with its dependency findings
pub fn dependency_table(
    reports: &[(String, PluginStatus, DependencyReport)],
    use_color: bool,
) -> Table {
    let mut table = new_table(&["Plugin", "Status", "Valid", "Errors", "Warnings"], use_color);
    for (id, status, report) in reports {
        let valid = if report.valid {
            styled("yes", StyleRole::Active, use_color)
        } else {
            styled("no", StyleRole::Failed, use_color)
        };
        table.add_row(Row::new(vec![
            styled(id, StyleRole::Key, use_color),
            status_cell(*status, use_color),
            valid,
            styled(&report.errors.join("\n"), StyleRole::Failed, use_color),
            styled(&report.warnings.join("\n"), StyleRole::Warning, use_color),
        ]));
    }
    table
}

pub fn interfaces_table(interfaces: &[InterfaceInfo], use_color: bool) -> Table {
    let mut table = new_table(
        &["Interface", "Version", "Provider", "Methods", "Consumers"],
        use_color,
    );
    for info in interfaces {
        table.add_row(Row::new(vec![
            styled(&info.name, StyleRole::Key, use_color),
            Cell::new(&info.version),
            Cell::new(&info.provider),
            styled(&info.methods.join(", "), StyleRole::Literal, use_color),
            Cell::new(&info.consumers.join(", ")),
        ]));
    }
    table
}

pub fn call_statistics_table(statistics: &CallStatistics, use_color: bool) -> Table {
    let mut table = new_table(&["Method", "Calls"], use_color);
    for (key, count) in statistics.iter() {
        table.add_row(Row::new(vec![
            styled(key, StyleRole::Literal, use_color),
            Cell::new(&count.to_string()),
        ]));
    }
    table
}

/// Events oldest first, with local time and compact payload
pub fn event_history_table(events: &[EventRecord], use_color: bool) -> Table {
    let mut table = new_table(&["Time", "Event", "Payload"], use_color);
    for record in events {
        let time: chrono::DateTime<chrono::Local> = record.timestamp.into();
        let payload = record
            .payload
            .iter()
            .map(|(key, value)| format!("{}={}", key, compact_json(value)))
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(Row::new(vec![
            Cell::new(&time.format("%H:%M:%S%.3f").to_string()),
            styled(&record.name, StyleRole::Key, use_color),
            Cell::new(&payload),
        ]));
    }
    table
}

pub fn call_results_table(outcomes: &[CallOutcome], use_color: bool) -> Table {
    let mut table = new_table(&["Call", "Result"], use_color);
    for outcome in outcomes {
        let result = match (&outcome.result, &outcome.error) {
            (_, Some(error)) => styled(error, StyleRole::Failed, use_color),
            (Some(value), None) => styled(&value.to_string(), StyleRole::Value, use_color),
            (None, None) => Cell::new("null"),
        };
        table.add_row(Row::new(vec![
            styled(&outcome.call, StyleRole::Literal, use_color),
            result,
        ]));
    }
    table
}

/// Print a section heading followed by the table, or a placeholder when empty
pub fn print_section(title: &str, table: &Table, use_color: bool) -> std::io::Result<()> {
    println!("{}", StyleRole::Header.paint(title, use_color));
    if table.is_empty() {
        println!("  (none)");
    } else {
        print_table(table, use_color)?;
    }
    println!();
    Ok(())
}

pub fn print_table(table: &Table, use_color: bool) -> std::io::Result<()> {
    table
        .print_tty(use_color)
        .map(|_| ())
        .map_err(|e| std::io::Error::other(e.to_string()))
}
