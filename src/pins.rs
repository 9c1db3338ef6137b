//! GPIO / peripheral pin assignments for the ESP32 dev board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

use crate::events::LogicalEvent;

// ---------------------------------------------------------------------------
// Push buttons (input-only pins, external pull-downs, rising edge)
// ---------------------------------------------------------------------------

pub const BUTTON_A_GPIO: i32 = 36;
pub const BUTTON_B_GPIO: i32 = 39;
pub const BUTTON_C_GPIO: i32 = 34;
pub const BUTTON_D_GPIO: i32 = 35;

/// Stable line → event binding used when registering ISRs.
pub const BUTTON_LINES: [(i32, LogicalEvent); 4] = [
    (BUTTON_A_GPIO, LogicalEvent::ButtonA),
    (BUTTON_B_GPIO, LogicalEvent::ButtonB),
    (BUTTON_C_GPIO, LogicalEvent::ButtonC),
    (BUTTON_D_GPIO, LogicalEvent::ButtonD),
];

// ---------------------------------------------------------------------------
// LEDs
// ---------------------------------------------------------------------------

/// Mode-controlled LED.
pub const RED_LED_GPIO: i32 = 26;
/// Reserved for the second actuator channel (`Alternate` mode). Configured
/// as an output at boot and held low.
pub const GREEN_LED_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Sample pipeline
// ---------------------------------------------------------------------------

/// ADC1 channel 5 (GPIO 33 on ESP32).
pub const SAMPLE_ADC_CHANNEL: u32 = 5;
/// LEDC output driven by the sample consumer.
pub const SAMPLE_PWM_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits). 8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the sample output (5 kHz).
pub const SAMPLE_PWM_FREQ_HZ: u32 = 5_000;
