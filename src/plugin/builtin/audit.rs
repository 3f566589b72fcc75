//! Audit Plugin - observes `method_called` events
//!
//! Depends on `math`, optionally uses `metrics` and refuses to run next to
//! `legacy-audit`. Exposes what it has seen as the `audit` interface.

use crate::builtin;
use crate::events::api::{handler, EventHandler, METHOD_CALLED};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::interface::PluginInterface;
use crate::plugin::manager::InteractionManager;
use crate::plugin::traits::Plugin;
use crate::plugin::types::{Dependency, PluginDescriptor};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

builtin!("audit", || Box::new(AuditPlugin::new()));

pub const PLUGIN_ID: &str = "audit";

#[derive(Debug, Default)]
struct AuditLog {
    calls: u64,
    last: Option<String>,
}

#[derive(Default)]
pub struct AuditPlugin {
    log: Arc<Mutex<AuditLog>>,
    subscription: Option<EventHandler>,
}

impl AuditPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observed_calls(&self) -> u64 {
        self.log.lock().map(|log| log.calls).unwrap_or(0)
    }
}

impl std::fmt::Debug for AuditPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditPlugin")
            .field("observed_calls", &self.observed_calls())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

impl Plugin for AuditPlugin {
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::new(PLUGIN_ID).with_dependencies([
            Dependency::required("math").with_version(">=1.0"),
            Dependency::optional("metrics"),
            Dependency::conflict("legacy-audit"),
        ])
    }

    fn initialize(&mut self, manager: &mut InteractionManager) -> PluginResult<()> {
        let log = Arc::clone(&self.log);
        let on_call = handler(move |record| {
            let interface = record.str_field("interface").unwrap_or("?");
            let method = record.str_field("method").unwrap_or("?");
            let mut log = log.lock().map_err(|_| "audit log lock poisoned")?;
            log.calls += 1;
            log.last = Some(format!("{}.{}", interface, method));
            Ok(())
        });

        if !manager.subscribe_event(METHOD_CALLED, Arc::clone(&on_call)) {
            return Err(PluginError::ExecutionError {
                plugin_name: PLUGIN_ID.to_string(),
                operation: "initialize".to_string(),
                cause: "already subscribed to method_called".to_string(),
            });
        }
        self.subscription = Some(on_call);
        Ok(())
    }

    fn execute(&mut self, _args: &[String]) -> PluginResult<()> {
        println!("{} call(s) observed", self.observed_calls());
        Ok(())
    }

    fn cleanup(&mut self, manager: &mut InteractionManager) -> PluginResult<()> {
        if let Some(subscription) = self.subscription.take() {
            manager.unsubscribe_event(METHOD_CALLED, &subscription);
        }
        Ok(())
    }

    fn interface(&self) -> Option<Arc<PluginInterface>> {
        let calls_log = Arc::clone(&self.log);
        let last_log = Arc::clone(&self.log);
        Some(Arc::new(
            PluginInterface::new(PLUGIN_ID, "1.0")
                .with_description("Observed plugin method calls")
                .with_method("calls", move |_args| {
                    let log = calls_log.lock().map_err(|_| "audit log lock poisoned")?;
                    Ok(json!(log.calls))
                })
                .with_method("last", move |_args| {
                    let log = last_log.lock().map_err(|_| "audit log lock poisoned")?;
                    Ok(log.last.clone().map_or(Value::Null, Value::String))
                }),
        ))
    }
}
