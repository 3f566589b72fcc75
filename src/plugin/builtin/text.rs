//! Text Plugin - string helpers exposed as the `text` interface

use crate::builtin;
use crate::plugin::error::{MethodError, PluginResult};
use crate::plugin::interface::{MethodResult, PluginInterface};
use crate::plugin::manager::InteractionManager;
use crate::plugin::traits::Plugin;
use crate::plugin::types::PluginDescriptor;
use serde_json::{json, Value};
use std::sync::Arc;

builtin!("text", || Box::new(TextPlugin::new()));

pub const PLUGIN_ID: &str = "text";

#[derive(Debug, Default)]
pub struct TextPlugin {
    initialized: bool,
}

impl TextPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

fn single_string<'a>(method: &str, args: &'a [Value]) -> Result<&'a str, MethodError> {
    match args {
        [Value::String(s)] => Ok(s.as_str()),
        _ => Err(format!("{} expects exactly one string argument", method).into()),
    }
}

fn upper(args: &[Value]) -> MethodResult {
    Ok(json!(single_string("upper", args)?.to_uppercase()))
}

fn reverse(args: &[Value]) -> MethodResult {
    Ok(json!(single_string("reverse", args)?.chars().rev().collect::<String>()))
}

fn length(args: &[Value]) -> MethodResult {
    Ok(json!(single_string("length", args)?.chars().count()))
}

impl Plugin for TextPlugin {
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::new(PLUGIN_ID)
    }

    fn initialize(&mut self, _manager: &mut InteractionManager) -> PluginResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn execute(&mut self, args: &[String]) -> PluginResult<()> {
        for arg in args {
            println!("{}", arg.to_uppercase());
        }
        Ok(())
    }

    fn cleanup(&mut self, _manager: &mut InteractionManager) -> PluginResult<()> {
        self.initialized = false;
        Ok(())
    }

    fn interface(&self) -> Option<Arc<PluginInterface>> {
        Some(Arc::new(
            PluginInterface::new(PLUGIN_ID, "1.0")
                .with_description("String transformations")
                .with_method("upper", upper)
                .with_method("reverse", reverse)
                .with_method("length", length),
        ))
    }
}
