//! Unified error types for the edgesync firmware.
//!
//! A single `Error` enum that every subsystem converts into, so each task's
//! `run()` loop has one uniform failure path. All variants are `Copy`; they
//! travel from a task body into the [`TaskHealth`](crate::health::TaskHealth)
//! register without allocation.
//!
//! Interrupt-context code never returns one of these. The ISR path in
//! [`drivers::button`](crate::drivers::button) has no failure mode: every
//! line is bound to its target before the handler is installed.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral or channel construction failed. Fatal at startup.
    Init(InitError),
    /// The input source could not produce a sample.
    Sensor(SensorError),
    /// An output could not be driven.
    Actuator(ActuatorError),
    /// A bounded wait elapsed before the condition was met.
    Timeout,
    /// A non-blocking operation could not complete immediately.
    WouldBlock,
    /// Configuration is invalid.
    Config(&'static str),
}

impl Error {
    /// Whether the caller may simply retry or back off.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout | Self::WouldBlock)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Timeout => write!(f, "timed out"),
            Self::WouldBlock => write!(f, "operation would block"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Init errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// GPIO direction / pull / interrupt-type config rejected.
    Gpio(i32),
    /// GPIO ISR service or per-pin handler registration failed.
    Isr(i32),
    /// ADC unit or channel setup failed.
    Adc(i32),
    /// LEDC timer or channel setup failed.
    Pwm(i32),
    /// More input lines registered than the table holds.
    TooManyLines,
    /// The same input line was bound twice.
    DuplicateLine(i32),
    /// A task could not be spawned.
    Spawn,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::Isr(rc) => write!(f, "ISR registration failed (rc={rc})"),
            Self::Adc(rc) => write!(f, "ADC setup failed (rc={rc})"),
            Self::Pwm(rc) => write!(f, "PWM setup failed (rc={rc})"),
            Self::TooManyLines => write!(f, "input line table full"),
            Self::DuplicateLine(line) => write!(f, "GPIO {line} bound twice"),
            Self::Spawn => write!(f, "task spawn failed"),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC oneshot read returned an error code.
    AdcReadFailed(i32),
    /// The simulated source has no more samples queued.
    Exhausted,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed(rc) => write!(f, "ADC read failed (rc={rc})"),
            Self::Exhausted => write!(f, "sample source exhausted"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Digital output level write failed.
    GpioWriteFailed,
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// Lets hardware adapters report `ActuatorError` through the embedded-hal traits.
impl embedded_hal::digital::Error for ActuatorError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl embedded_hal::pwm::Error for ActuatorError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
