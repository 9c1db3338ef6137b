//! Application core: task logic with no direct hardware access.
//!
//! Button events become LED configuration transitions here. All
//! interaction with hardware happens through the port traits in [`ports`]
//! and the `embedded-hal` traits, keeping this layer testable on the host.

pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod guarded;
pub mod ports;
