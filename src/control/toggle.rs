//! Single-button variant: every notification flips the LED.
//!
//! The ISR only gives the notification; the level lives here in task
//! context. Presses that arrive while the task is busy accumulate in the
//! notification count, but the task toggles once per wake-up.

use core::time::Duration;

use embedded_hal::digital::{OutputPin, PinState};
use log::debug;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::{ActuatorError, Error, Result};
use crate::events::Notification;
use crate::system::Shutdown;

pub struct ToggleTask<'a, P, E> {
    notify: &'a Notification,
    led: P,
    sink: E,
    level: bool,
    timeout: Option<Duration>,
}

impl<'a, P: OutputPin, E: EventSink> ToggleTask<'a, P, E> {
    pub fn new(notify: &'a Notification, led: P, sink: E, timeout: Option<Duration>) -> Self {
        Self {
            notify,
            led,
            sink,
            level: false,
            timeout,
        }
    }

    /// Wait for a press and flip the LED. `Ok(None)` on an elapsed wait.
    pub fn step(&mut self) -> Result<Option<bool>> {
        let presses = match self.notify.take_blocking(true, self.timeout) {
            Ok(n) => n,
            Err(Error::Timeout) => {
                debug!("toggle: wait elapsed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        self.level = !self.level;
        self.led
            .set_state(PinState::from(self.level))
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.sink.emit(&AppEvent::Toggled {
            level: self.level,
            presses,
        });
        Ok(Some(self.level))
    }

    pub fn run(&mut self, shutdown: &Shutdown) -> Result<()> {
        while !shutdown.is_requested() {
            self.step()?;
        }
        Ok(())
    }

    pub fn level(&self) -> bool {
        self.level
    }
}
