//! Hardware adapters: peripherals behind `embedded-hal` traits.
//!
//! | Type         | Implements      | Peripheral          |
//! |--------------|-----------------|---------------------|
//! | `GpioOutput` | `OutputPin`     | GPIO output level   |
//! | `PwmOutput`  | `SetDutyCycle`  | LEDC channel duty   |
//! | `AdcSampler` | `SampleSource`  | ADC1 oneshot read   |
//!
//! This is the only module that writes peripheral registers after boot.
//! On non-espidf targets each adapter keeps its last written value in
//! memory and the sampler produces a deterministic ramp.

use embedded_hal::digital::{ErrorType as DigitalErrorType, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
#[cfg(not(target_os = "espidf"))]
use log::trace;

use crate::app::ports::SampleSource;
use crate::error::{ActuatorError, SensorError};
use crate::pins;

// ── Digital output ────────────────────────────────────────────

pub struct GpioOutput {
    pin: i32,
    level: bool,
}

impl GpioOutput {
    /// Wrap a pin already configured as an output by `hw_init`.
    pub fn new(pin: i32) -> Self {
        Self { pin, level: false }
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }

    /// Last level written.
    pub fn level(&self) -> bool {
        self.level
    }

    #[cfg(target_os = "espidf")]
    fn write(&mut self, high: bool) -> Result<(), ActuatorError> {
        crate::drivers::hw_init::gpio_write(self.pin, high)?;
        self.level = high;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn write(&mut self, high: bool) -> Result<(), ActuatorError> {
        trace!("gpio(sim): GPIO{} <- {}", self.pin, u8::from(high));
        self.level = high;
        Ok(())
    }
}

impl DigitalErrorType for GpioOutput {
    type Error = ActuatorError;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), ActuatorError> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), ActuatorError> {
        self.write(true)
    }
}

// ── PWM output ────────────────────────────────────────────────

pub struct PwmOutput {
    channel: u32,
    duty: u16,
}

impl PwmOutput {
    /// Full-scale duty for the configured LEDC resolution.
    pub const MAX_DUTY: u16 = (1 << pins::PWM_RESOLUTION_BITS) - 1;

    pub fn new(channel: u32) -> Self {
        Self { channel, duty: 0 }
    }

    /// Last duty written.
    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl PwmErrorType for PwmOutput {
    type Error = ActuatorError;
}

impl SetDutyCycle for PwmOutput {
    fn max_duty_cycle(&self) -> u16 {
        Self::MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), ActuatorError> {
        let duty = duty.min(Self::MAX_DUTY);
        #[cfg(target_os = "espidf")]
        crate::drivers::hw_init::ledc_set(self.channel, duty as u32)?;
        #[cfg(not(target_os = "espidf"))]
        trace!("ledc(sim): CH{} duty={}", self.channel, duty);
        self.duty = duty;
        Ok(())
    }
}

// ── ADC input ─────────────────────────────────────────────────

pub struct AdcSampler {
    channel: u32,
    #[cfg(not(target_os = "espidf"))]
    tick: u32,
}

impl AdcSampler {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            #[cfg(not(target_os = "espidf"))]
            tick: 0,
        }
    }
}

impl SampleSource for AdcSampler {
    #[cfg(target_os = "espidf")]
    fn read(&mut self) -> Result<u16, SensorError> {
        crate::drivers::hw_init::adc1_read(self.channel)
    }

    /// Sawtooth over the 12-bit range in 10 steps.
    #[cfg(not(target_os = "espidf"))]
    fn read(&mut self) -> Result<u16, SensorError> {
        let value = ((self.tick % 10) * 455) as u16;
        self.tick = self.tick.wrapping_add(1);
        trace!("adc(sim): CH{} = {}", self.channel, value);
        Ok(value)
    }
}
