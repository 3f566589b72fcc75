//! Public API for the event system
//!
//! External modules should import from here rather than directly from internal modules.
//! There is no process-wide bus: each `InteractionManager` owns its own `EventBus`.

pub use crate::events::bus::{
    BusStatistics, DeliveryReport, EventBus, EventBusConfig, DEFAULT_HISTORY_LIMIT,
};
pub use crate::events::event::{
    any_handler, handler, payload, AnyEventHandler, EventHandler, EventRecord, HandlerError,
    Payload, INTERFACE_REGISTERED, INTERFACE_UNREGISTERED, METHOD_CALLED, PLUGIN_STATUS_CHANGED,
};
