//! Button → LED configuration transitions.
//!
//! Each logical button maps to exactly one [`ButtonCommand`]. Commands
//! overwrite the configuration; they never merge with the previous mode.
//! When several buttons are observed in one wait, they are applied in
//! button order, so the highest-numbered button wins.

use crate::app::guarded::{ActuatorConfig, LedMode};
use crate::events::{EventBits, LogicalEvent};

/// Period selected by button B.
pub const SLOW_BLINK_PERIOD_MS: u32 = 1000;
/// Period selected by button C.
pub const FAST_BLINK_PERIOD_MS: u32 = 500;

/// What a button press asks the LED to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonCommand {
    /// Solid on; keeps the last blink period.
    TurnOn,
    /// Blink with the given full-cycle period.
    Blink { period_ms: u32 },
    /// Off; keeps the last blink period.
    TurnOff,
}

impl ButtonCommand {
    pub const fn for_event(event: LogicalEvent) -> Self {
        match event {
            LogicalEvent::ButtonA => Self::TurnOn,
            LogicalEvent::ButtonB => Self::Blink {
                period_ms: SLOW_BLINK_PERIOD_MS,
            },
            LogicalEvent::ButtonC => Self::Blink {
                period_ms: FAST_BLINK_PERIOD_MS,
            },
            LogicalEvent::ButtonD => Self::TurnOff,
        }
    }

    /// Pure transition: previous config in, next config out.
    pub const fn apply(self, cfg: ActuatorConfig) -> ActuatorConfig {
        match self {
            Self::TurnOn => cfg.with_mode(LedMode::On),
            Self::Blink { period_ms } => ActuatorConfig::blink(period_ms),
            Self::TurnOff => cfg.with_mode(LedMode::Off),
        }
    }
}

/// Apply every event in `bits`, in button order.
pub fn apply_all(bits: EventBits, cfg: ActuatorConfig) -> ActuatorConfig {
    bits.iter()
        .map(ButtonCommand::for_event)
        .fold(cfg, |acc, cmd| cmd.apply(acc))
}
