//! Edge sources, hardware initialisation, and task spawning.

pub mod button;
pub mod hw_init;
pub mod task_pin;
