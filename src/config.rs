//! System configuration parameters
//!
//! All tunable timing and policy parameters for the edgesync firmware.
//! Values are compiled in; nothing here is persisted across restarts.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pipeline::consumer::DutyMapping;

/// Depth of the ADC sample channel. Fixed at compile time because the
/// channel is a const-generic, heap-free ring.
pub const SAMPLE_QUEUE_DEPTH: usize = 10;

/// Which button → output wiring the firmware runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppVariant {
    /// Four buttons select the LED mode (off / on / slow blink / fast blink).
    ModeControl,
    /// Button A toggles the red LED on every press.
    ToggleOnPress,
}

/// Scheduling parameters for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// FreeRTOS priority (higher preempts lower).
    pub priority: u8,
    /// Stack size in KiB.
    pub stack_kb: usize,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Actuation loop ---
    /// Re-check interval while the LED is steady (off / on)
    pub housekeeping_interval_ms: u32,
    /// Fixed yield after every actuation iteration
    pub loop_yield_ms: u32,
    /// Blink period the LED config starts with (full on+off cycle)
    pub default_blink_period_ms: u32,

    // --- Sampling pipeline ---
    /// Delay between two ADC samples
    pub sample_interval_ms: u32,
    /// Extra read attempts before a failed ADC read halts the producer
    pub sample_read_retries: u8,
    /// Sample → duty conversion used by the consumer
    pub duty_mapping: DutyMapping,

    // --- Waits ---
    /// Event wait limit for the button task; `None` waits forever
    pub event_wait_timeout_ms: Option<u32>,
    /// Channel push/pop limit; `None` waits forever
    pub channel_timeout_ms: Option<u32>,

    // --- Wiring ---
    pub variant: AppVariant,

    // --- Tasks ---
    pub button_task: TaskSpec,
    pub led_task: TaskSpec,
    pub producer_task: TaskSpec,
    pub consumer_task: TaskSpec,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Actuation
            housekeeping_interval_ms: 50,
            loop_yield_ms: 5,
            default_blink_period_ms: 1000,

            // Sampling
            sample_interval_ms: 500,
            sample_read_retries: 0,
            duty_mapping: DutyMapping::Linear {
                in_min: 0,
                in_max: 4095, // 12-bit ADC full scale
            },

            // Waits
            event_wait_timeout_ms: None,
            channel_timeout_ms: None,

            variant: AppVariant::ModeControl,

            // Tasks
            button_task: TaskSpec { priority: 10, stack_kb: 4 },
            led_task: TaskSpec { priority: 5, stack_kb: 4 },
            producer_task: TaskSpec { priority: 10, stack_kb: 4 },
            consumer_task: TaskSpec { priority: 5, stack_kb: 4 },
        }
    }
}

impl SystemConfig {
    /// Reject values that would stall a loop or break a mapping.
    pub fn validate(&self) -> Result<()> {
        if self.housekeeping_interval_ms == 0 {
            return Err(Error::Config("housekeeping_interval_ms must be > 0"));
        }
        if self.default_blink_period_ms < 2 {
            return Err(Error::Config("default_blink_period_ms must be >= 2"));
        }
        if self.sample_interval_ms == 0 {
            return Err(Error::Config("sample_interval_ms must be > 0"));
        }
        if self.event_wait_timeout_ms == Some(0) || self.channel_timeout_ms == Some(0) {
            return Err(Error::Config("wait timeouts must be > 0 or None"));
        }
        if let DutyMapping::Linear { in_min, in_max } = self.duty_mapping {
            if in_max <= in_min {
                return Err(Error::Config("duty_mapping: in_max must exceed in_min"));
            }
        }
        for spec in [
            self.button_task,
            self.led_task,
            self.producer_task,
            self.consumer_task,
        ] {
            if spec.stack_kb == 0 {
                return Err(Error::Config("task stack_kb must be > 0"));
            }
        }
        Ok(())
    }
}
