//! Task health register.
//!
//! Every long-lived task owns one bit. When a task's `run()` returns an
//! error, its bit is latched here and the supervisor in `main` aborts the
//! firmware with the recorded diagnostic. A halted task is never
//! restarted in place.
//!
//! ## Fault lifecycle
//!
//! 1. A task hits a fatal error (e.g. ADC read failure) and returns `Err`.
//! 2. The spawn wrapper calls [`TaskHealth::halt`], which sets the bit and
//!    keeps the first reason.
//! 3. The supervisor sees `any_halted()` and stops the process.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};

use log::error;

use crate::error::Error;

/// Identity of each firmware task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskId {
    /// Waits on button events and rewrites the LED config.
    Button = 0b0000_0001,
    /// Drives the LED from config snapshots.
    Led = 0b0000_0010,
    /// Samples the ADC into the channel.
    Producer = 0b0000_0100,
    /// Drains the channel into the PWM output.
    Consumer = 0b0000_1000,
    /// Single-button toggle variant.
    Toggle = 0b0001_0000,
}

impl TaskId {
    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// Name used for the thread and in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Button => "btn-ctl",
            Self::Led => "led-ctl",
            Self::Producer => "producer",
            Self::Consumer => "consumer",
            Self::Toggle => "toggle",
        }
    }

    /// NUL-terminated name for the FreeRTOS task config.
    pub const fn c_name(self) -> &'static core::ffi::CStr {
        match self {
            Self::Button => c"btn-ctl",
            Self::Led => c"led-ctl",
            Self::Producer => c"producer",
            Self::Consumer => c"consumer",
            Self::Toggle => c"toggle",
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Latched set of halted tasks plus the first fatal reason.
#[derive(Default)]
pub struct TaskHealth {
    halted: AtomicU8,
    first: Mutex<Option<(TaskId, Error)>>,
}

impl TaskHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `task` stopped because of `reason`.
    pub fn halt(&self, task: TaskId, reason: Error) {
        let prev = self.halted.fetch_or(task.mask(), Ordering::AcqRel);
        if prev & task.mask() == 0 {
            error!("TASK HALTED: {} ({})", task, reason);
        }
        let mut first = self.first.lock().unwrap_or_else(PoisonError::into_inner);
        if first.is_none() {
            *first = Some((task, reason));
        }
    }

    /// Bitmask of halted tasks.
    pub fn halted(&self) -> u8 {
        self.halted.load(Ordering::Acquire)
    }

    pub fn any_halted(&self) -> bool {
        self.halted() != 0
    }

    pub fn is_halted(&self, task: TaskId) -> bool {
        self.halted() & task.mask() != 0
    }

    /// The first task to halt and why.
    pub fn first_fault(&self) -> Option<(TaskId, Error)> {
        *self.first.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
