//! Mutex-guarded LED configuration shared by the button and LED tasks.
//!
//! The button task writes through [`GuardedConfig::update`]; the LED task
//! reads through [`GuardedConfig::snapshot`]. Both take the lock only for a
//! by-value copy of an 8-byte `Copy` struct, and both APIs are synchronous
//! closures/copies, so the lock cannot be held across a sleep or a
//! blocking wait.

use std::sync::{Mutex, PoisonError};

/// LED behaviour selected by the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedMode {
    Off,
    On,
    /// Toggle every `period_ms / 2`.
    Blink,
    /// Second-channel mode; not wired to an output yet and driven as `Off`.
    Alternate,
}

/// Desired LED behaviour. `mode` and `period_ms` always change together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActuatorConfig {
    pub mode: LedMode,
    /// Full on+off cycle length while blinking.
    pub period_ms: u32,
}

impl ActuatorConfig {
    pub const fn off(period_ms: u32) -> Self {
        Self { mode: LedMode::Off, period_ms }
    }

    pub const fn blink(period_ms: u32) -> Self {
        Self { mode: LedMode::Blink, period_ms }
    }

    /// Same period, different mode.
    pub const fn with_mode(self, mode: LedMode) -> Self {
        Self { mode, ..self }
    }
}

/// Process-lifetime LED configuration behind a mutex.
///
/// Any number of writers is safe; each [`update`](Self::update) is one
/// indivisible transition, so readers observe either the whole old value
/// or the whole new one.
pub struct GuardedConfig {
    inner: Mutex<ActuatorConfig>,
}

impl GuardedConfig {
    pub fn new(initial: ActuatorConfig) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }

    /// Apply a pure transition under the lock. Returns `(before, after)`.
    pub fn update(&self, f: impl FnOnce(ActuatorConfig) -> ActuatorConfig) -> (ActuatorConfig, ActuatorConfig) {
        // A panicking writer cannot leave a torn value behind (the store is a
        // single `Copy` assignment), so a poisoned lock is still consistent.
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let before = *guard;
        let after = f(before);
        *guard = after;
        (before, after)
    }

    /// Copy the current value out and release the lock immediately.
    pub fn snapshot(&self) -> ActuatorConfig {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
