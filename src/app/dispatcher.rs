//! Button task: turns aggregated button events into LED config transitions.
//!
//! ```text
//!  EventAggregator ──wait_any──▶ ButtonDispatcher ──update──▶ GuardedConfig
//!                                       │
//!                                       └──emit──▶ EventSink (log)
//! ```
//!
//! All events seen in one wait are applied inside a single `update`, so the
//! LED task never observes an intermediate configuration.

use core::time::Duration;

use log::debug;

use crate::app::commands::apply_all;
use crate::app::events::AppEvent;
use crate::app::guarded::{ActuatorConfig, GuardedConfig};
use crate::app::ports::EventSink;
use crate::error::{Error, Result};
use crate::events::{EventAggregator, EventBits};
use crate::system::Shutdown;

pub struct ButtonDispatcher<'a, E: EventSink> {
    events: &'a EventAggregator,
    config: &'a GuardedConfig,
    sink: E,
    timeout: Option<Duration>,
}

impl<'a, E: EventSink> ButtonDispatcher<'a, E> {
    pub fn new(
        events: &'a EventAggregator,
        config: &'a GuardedConfig,
        sink: E,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            events,
            config,
            sink,
            timeout,
        }
    }

    /// Wait for the next batch of button events and apply it.
    ///
    /// Returns `Ok(None)` when a finite wait elapsed with nothing pending.
    pub fn step(&mut self) -> Result<Option<EventBits>> {
        match self
            .events
            .wait_any_blocking(EventBits::ALL_BUTTONS, true, self.timeout)
        {
            Ok(bits) => {
                self.handle(bits);
                Ok(Some(bits))
            }
            Err(Error::Timeout) => {
                debug!("btn-ctl: wait elapsed, no events");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Apply one batch of events and report it. Returns the new config.
    pub fn handle(&mut self, bits: EventBits) -> ActuatorConfig {
        let bits = bits.intersection(EventBits::ALL_BUTTONS);
        let (from, to) = self.config.update(|cfg| apply_all(bits, cfg));

        // Reporting happens after the lock is released.
        for event in bits.iter() {
            self.sink.emit(&AppEvent::ButtonPressed(event));
        }
        if from != to {
            self.sink.emit(&AppEvent::ConfigChanged { from, to });
        }
        to
    }

    /// Task body. Returns when shutdown is requested; with an infinite
    /// wait timeout that only happens after the next button event.
    pub fn run(&mut self, shutdown: &Shutdown) -> Result<()> {
        while !shutdown.is_requested() {
            self.step()?;
        }
        Ok(())
    }
}
