//! Test modules for the event system

mod delivery;
