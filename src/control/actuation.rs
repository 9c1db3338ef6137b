//! LED task: drives the mode-controlled LED from config snapshots.
//!
//! | Mode        | Output                   | Sleep before next snapshot |
//! |-------------|--------------------------|----------------------------|
//! | `Off`       | low                      | housekeeping interval      |
//! | `On`        | high                     | housekeeping interval      |
//! | `Blink`     | toggles every iteration  | `period_ms / 2`            |
//! | `Alternate` | low (not wired yet)      | housekeeping interval      |
//!
//! Every iteration ends with a short fixed yield, which bounds snapshot
//! staleness to one housekeeping interval plus the yield while steady.
//!
//! The blink parity belongs to the loop, not to the config: switching away
//! from `Blink` and back resumes from the last level.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::events::AppEvent;
use crate::app::guarded::{ActuatorConfig, GuardedConfig, LedMode};
use crate::app::ports::EventSink;
use crate::config::SystemConfig;
use crate::error::{ActuatorError, Result};
use crate::system::Shutdown;

/// Fixed sleeps used by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuationTimings {
    pub housekeeping_ms: u32,
    pub yield_ms: u32,
}

impl From<&SystemConfig> for ActuationTimings {
    fn from(cfg: &SystemConfig) -> Self {
        Self {
            housekeeping_ms: cfg.housekeeping_interval_ms,
            yield_ms: cfg.loop_yield_ms,
        }
    }
}

/// Result of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Level written to the LED.
    pub level: bool,
    /// Mode-specific sleep, excluding the fixed yield.
    pub sleep_ms: u32,
}

pub struct ActuationLoop<'a, P, D, E> {
    config: &'a GuardedConfig,
    led: P,
    delay: D,
    sink: E,
    timings: ActuationTimings,
    parity: bool,
    last: Option<ActuatorConfig>,
    alternate_warned: bool,
}

impl<'a, P, D, E> ActuationLoop<'a, P, D, E>
where
    P: OutputPin,
    D: DelayNs,
    E: EventSink,
{
    pub fn new(config: &'a GuardedConfig, led: P, delay: D, sink: E, timings: ActuationTimings) -> Self {
        Self {
            config,
            led,
            delay,
            sink,
            timings,
            parity: false,
            last: None,
            alternate_warned: false,
        }
    }

    /// Drive the LED for one snapshot; no sleeping.
    pub fn step(&mut self, snap: ActuatorConfig) -> Result<Step> {
        if self.last != Some(snap) {
            self.sink.emit(&AppEvent::ModeApplied(snap));
            self.last = Some(snap);
        }

        let (level, sleep_ms) = match snap.mode {
            LedMode::Off => (false, self.timings.housekeeping_ms),
            LedMode::On => (true, self.timings.housekeeping_ms),
            LedMode::Blink => {
                self.parity = !self.parity;
                (self.parity, (snap.period_ms / 2).max(1))
            }
            LedMode::Alternate => {
                if !self.alternate_warned {
                    warn!("led-ctl: Alternate mode has no second output, holding LED off");
                    self.alternate_warned = true;
                }
                (false, self.timings.housekeeping_ms)
            }
        };

        self.led
            .set_state(PinState::from(level))
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        Ok(Step { level, sleep_ms })
    }

    /// Snapshot, drive, sleep, yield.
    pub fn run_once(&mut self) -> Result<Step> {
        // The lock is released before any sleep below.
        let snap = self.config.snapshot();
        let step = self.step(snap)?;
        self.delay.delay_ms(step.sleep_ms);
        self.delay.delay_ms(self.timings.yield_ms);
        Ok(step)
    }

    /// Task body.
    pub fn run(&mut self, shutdown: &Shutdown) -> Result<()> {
        while !shutdown.is_requested() {
            self.run_once()?;
        }
        // Leave the LED dark on the way out.
        self.led
            .set_low()
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        Ok(())
    }

    pub fn led(&self) -> &P {
        &self.led
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}
