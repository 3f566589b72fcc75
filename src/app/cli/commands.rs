//! Command execution
//!
//! Each command builds a fresh `PluginHost` over the built-in plugins, does its
//! work and returns the process exit code.

use super::args::{CallSpec, Command};
use super::config::Settings;
use super::display::{self, CallOutcome};
use super::error::CliResult;
use crate::core::styles::StyleRole;
use crate::core::version;
use crate::plugin::api::{
    BuiltinLoader, ConfigStore, MemoryConfigStore, PluginError, PluginHost, TomlConfigStore,
};
use serde_json::json;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

pub fn execute(settings: &Settings, command: &Command) -> CliResult<i32> {
    let use_color = settings.use_color();
    match command {
        Command::List => list(settings, use_color),
        Command::Order => order(settings, use_color),
        Command::Check { plugin } => check(settings, plugin.as_deref(), use_color),
        Command::Run { calls, json } => run(settings, calls, *json, use_color),
        Command::Enable { plugin } => set_enabled(settings, plugin, true),
        Command::Disable { plugin } => set_enabled(settings, plugin, false),
        Command::Info => info(use_color),
    }
}

/// Host with every built-in plugin discovered and registered
fn build_host(settings: &Settings) -> CliResult<PluginHost<BuiltinLoader>> {
    let store: Box<dyn ConfigStore> = match &settings.config_path {
        Some(path) => Box::new(TomlConfigStore::new(path)),
        None => {
            log::warn!("No configuration directory available; plugin flags will not persist");
            Box::new(MemoryConfigStore::new())
        }
    };
    let mut host = PluginHost::with_config(BuiltinLoader::new(), store, settings.manager_config()?)?;
    host.discover()?;
    Ok(host)
}

fn list(settings: &Settings, use_color: bool) -> CliResult<i32> {
    let host = build_host(settings)?;
    let plugins: Vec<_> = host
        .manager()
        .graph()
        .descriptors()
        .map(|descriptor| (descriptor.clone(), host.is_enabled(&descriptor.id)))
        .collect();
    display::print_section("Plugins", &display::plugins_table(&plugins, use_color), use_color)?;
    Ok(EXIT_OK)
}

fn order(settings: &Settings, use_color: bool) -> CliResult<i32> {
    let host = build_host(settings)?;
    match host.manager().compute_load_order() {
        Ok(order) => {
            display::print_section(
                "Load order",
                &display::load_order_table(&order, use_color),
                use_color,
            )?;
            Ok(EXIT_OK)
        }
        Err(cycle) => {
            eprintln!("{}", StyleRole::Failed.paint(&cycle.to_string(), use_color));
            Ok(EXIT_FAILURE)
        }
    }
}

fn check(settings: &Settings, plugin: Option<&str>, use_color: bool) -> CliResult<i32> {
    let mut host = build_host(settings)?;
    let activation = host.activate_all()?;
    for (id, reasons) in &activation.failed {
        log::debug!("Activation of '{}' failed: {}", id, reasons.join("; "));
    }

    let ids = match plugin {
        Some(id) => {
            if host.manager().plugin_status(id).is_none() {
                return Err(PluginError::PluginNotFound {
                    plugin_name: id.to_string(),
                }
                .into());
            }
            vec![id.to_string()]
        }
        None => host.plugin_ids(),
    };

    let manager = host.manager();
    let reports: Vec<_> = ids
        .into_iter()
        .filter_map(|id| {
            let status = manager.plugin_status(&id)?;
            let report = manager.check_dependencies(&id);
            Some((id, status, report))
        })
        .collect();
    let all_valid = reports.iter().all(|(_, _, report)| report.valid);

    display::print_section(
        "Dependencies",
        &display::dependency_table(&reports, use_color),
        use_color,
    )?;
    host.shutdown();

    Ok(if all_valid { EXIT_OK } else { EXIT_FAILURE })
}

fn run(settings: &Settings, calls: &[CallSpec], as_json: bool, use_color: bool) -> CliResult<i32> {
    let mut host = build_host(settings)?;
    let activation = host.activate_all()?;
    for (id, reasons) in &activation.failed {
        log::warn!("Plugin '{}' was not activated: {}", id, reasons.join("; "));
    }

    let outcomes: Vec<CallOutcome> = calls
        .iter()
        .map(|call| {
            match host
                .manager_mut()
                .call_plugin_method(&call.interface, &call.method, &call.args)
            {
                Ok(value) => CallOutcome {
                    call: call.to_string(),
                    result: Some(value),
                    error: None,
                },
                Err(e) => {
                    log::warn!("{}", e);
                    CallOutcome {
                        call: call.to_string(),
                        result: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    let manager = host.manager();
    let interfaces: Vec<_> = manager
        .get_available_interfaces()
        .iter()
        .filter_map(|name| manager.get_interface_info(name))
        .collect();
    let statistics = manager.get_call_statistics().clone();
    let events = manager.get_event_history(None);

    if as_json {
        let document = json!({
            "activation": activation,
            "calls": outcomes,
            "interfaces": interfaces,
            "statistics": statistics,
            "events": events,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        if !outcomes.is_empty() {
            display::print_section(
                "Calls",
                &display::call_results_table(&outcomes, use_color),
                use_color,
            )?;
        }
        display::print_section(
            "Interfaces",
            &display::interfaces_table(&interfaces, use_color),
            use_color,
        )?;
        display::print_section(
            "Call statistics",
            &display::call_statistics_table(&statistics, use_color),
            use_color,
        )?;
        display::print_section(
            "Event history",
            &display::event_history_table(&events, use_color),
            use_color,
        )?;
    }

    host.shutdown();

    Ok(if outcomes.iter().all(CallOutcome::is_success) {
        EXIT_OK
    } else {
        EXIT_FAILURE
    })
}

fn set_enabled(settings: &Settings, plugin: &str, enabled: bool) -> CliResult<i32> {
    let mut host = build_host(settings)?;
    host.set_enabled(plugin, enabled)?;
    println!(
        "Plugin '{}' {}",
        plugin,
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(EXIT_OK)
}

fn info(use_color: bool) -> CliResult<i32> {
    let api_version = version::get_api_version().to_string();
    let rows = [
        ("Version", env!("CARGO_PKG_VERSION")),
        ("Build time", version::build_time()),
        ("Git hash", version::git_hash()),
        ("Plugin API", api_version.as_str()),
    ];
    for (key, value) in rows {
        let label = format!("{:<12}", key);
        println!("{} {}", StyleRole::Key.paint(&label, use_color), value);
    }
    Ok(EXIT_OK)
}
