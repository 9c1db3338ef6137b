//! edgesync firmware library.
//!
//! Exposes the task logic and synchronization primitives for host
//! integration testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod health;
pub mod pins;
pub mod runtime;
pub mod system;

pub mod control;
pub mod pipeline;

// Platform-facing modules; each carries a host simulation fallback.
pub mod adapters;
pub mod drivers;
