//! Task delay adapter.
//!
//! - **`target_os = "espidf"`**: `FreeRtos`, which suspends the calling
//!   task with `vTaskDelay` (tick resolution).
//! - **`not(target_os = "espidf")`**: [`StdDelay`], a `thread::sleep`
//!   wrapper for host-side simulation.

#[cfg(target_os = "espidf")]
pub use esp_idf_svc::hal::delay::FreeRtos as TaskDelay;

#[cfg(not(target_os = "espidf"))]
pub use StdDelay as TaskDelay;

/// `DelayNs` on top of `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(core::time::Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(core::time::Duration::from_millis(ms as u64));
    }
}
