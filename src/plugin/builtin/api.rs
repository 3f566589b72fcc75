//! API for builtin plugin registration and discovery
//!
//! Plugins use the `builtin!` macro to register themselves for automatic discovery.

use crate::plugin::traits::Plugin;

/// Entry for a builtin plugin in the dynamic registry
pub struct BuiltinPluginEntry {
    pub id: &'static str,
    pub factory: fn() -> Box<dyn Plugin>,
}

// Collect all builtin plugin entries
inventory::collect!(BuiltinPluginEntry);

/// Macro for registering builtin plugins
///
/// ```ignore
/// builtin!("text", || Box::new(TextPlugin::new()));
/// ```
#[macro_export]
macro_rules! builtin {
    ($id:expr, $factory_expr:expr) => {
        inventory::submit!($crate::plugin::builtin::api::BuiltinPluginEntry {
            id: $id,
            factory: $factory_expr
        });
    };
}

/// Get all registered builtin plugins
pub fn get_all_builtin_plugins() -> Vec<&'static BuiltinPluginEntry> {
    inventory::iter::<BuiltinPluginEntry>().collect()
}
