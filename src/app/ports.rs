//! Port traits: the boundary between task logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ task (domain)
//! ```
//!
//! Outputs use the `embedded-hal` 1.0 traits directly (`OutputPin`,
//! `SetDutyCycle`, `DelayNs`); `embedded-hal` has no ADC trait, so the
//! sample input gets its own port here.

use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sample source (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Synchronous "read one sample" operation on an analog input.
pub trait SampleSource {
    /// Take one raw reading.
    fn read(&mut self) -> Result<u16, SensorError>;
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    fn read(&mut self) -> Result<u16, SensorError> {
        (**self).read()
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// Tasks emit structured [`AppEvent`](super::events::AppEvent)s through
/// this port. Adapters decide where they go (serial log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

impl<E: EventSink + ?Sized> EventSink for &mut E {
    fn emit(&mut self, event: &super::events::AppEvent) {
        (**self).emit(event);
    }
}
