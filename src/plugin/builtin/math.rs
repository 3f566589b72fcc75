//! Math Plugin - arithmetic exposed as the `math` interface

use crate::builtin;
use crate::plugin::error::{MethodError, PluginResult};
use crate::plugin::interface::{MethodResult, PluginInterface};
use crate::plugin::manager::InteractionManager;
use crate::plugin::traits::Plugin;
use crate::plugin::types::PluginDescriptor;
use serde_json::{json, Value};
use std::sync::Arc;

builtin!("math", || Box::new(MathPlugin::new()));

pub const PLUGIN_ID: &str = "math";

#[derive(Debug, Default)]
pub struct MathPlugin;

impl MathPlugin {
    pub fn new() -> Self {
        Self
    }
}

fn two_numbers(method: &str, args: &[Value]) -> Result<(f64, f64), MethodError> {
    match args {
        [a, b] => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(format!("{} expects numeric arguments", method).into()),
        },
        _ => Err(format!("{} expects exactly two arguments, got {}", method, args.len()).into()),
    }
}

/// Integers stay integers when the result is exact
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

fn add(args: &[Value]) -> MethodResult {
    let (a, b) = two_numbers("add", args)?;
    Ok(number(a + b))
}

fn multiply(args: &[Value]) -> MethodResult {
    let (a, b) = two_numbers("multiply", args)?;
    Ok(number(a * b))
}

fn divide(args: &[Value]) -> MethodResult {
    let (a, b) = two_numbers("divide", args)?;
    if b == 0.0 {
        return Err("division by zero".into());
    }
    Ok(number(a / b))
}

impl Plugin for MathPlugin {
    fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::new(PLUGIN_ID)
    }

    fn initialize(&mut self, _manager: &mut InteractionManager) -> PluginResult<()> {
        Ok(())
    }

    fn execute(&mut self, args: &[String]) -> PluginResult<()> {
        let sum: f64 = args.iter().filter_map(|a| a.parse::<f64>().ok()).sum();
        println!("{}", number(sum));
        Ok(())
    }

    fn cleanup(&mut self, _manager: &mut InteractionManager) -> PluginResult<()> {
        Ok(())
    }

    fn interface(&self) -> Option<Arc<PluginInterface>> {
        Some(Arc::new(
            PluginInterface::new(PLUGIN_ID, "1.0")
                .with_description("Basic arithmetic")
                .with_method("add", add)
                .with_method("multiply", multiply)
                .with_method("divide", divide),
        ))
    }
}
