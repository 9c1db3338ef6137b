//! Consumer task: drains the sample channel into a duty-cycle output.
//!
//! There is no delay between iterations; the consumer runs exactly as fast
//! as samples arrive and parks in `pop` otherwise.

use core::time::Duration;

use embedded_hal::pwm::SetDutyCycle;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::{ActuatorError, Error, Result};
use crate::pipeline::channel::BoundedChannel;
use crate::system::Shutdown;

/// Sample → duty conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DutyMapping {
    /// The sample is the duty, clamped to the output's maximum.
    Identity,
    /// Scale `in_min..=in_max` onto `0..=max_duty`. Values outside the
    /// range saturate.
    Linear { in_min: u16, in_max: u16 },
}

impl DutyMapping {
    pub fn map(self, value: u16, max_duty: u16) -> u16 {
        match self {
            Self::Identity => value.min(max_duty),
            Self::Linear { in_min, in_max } => {
                let span = in_max.saturating_sub(in_min) as u32;
                let offset = value.clamp(in_min, in_max.max(in_min)).saturating_sub(in_min) as u32;
                (offset * max_duty as u32)
                    .checked_div(span)
                    .map_or(0, |d| d.min(max_duty as u32) as u16)
            }
        }
    }
}

pub struct ConsumingActuator<'a, P, E, const N: usize> {
    channel: &'a BoundedChannel<u16, N>,
    output: P,
    mapping: DutyMapping,
    sink: E,
    timeout: Option<Duration>,
}

impl<'a, P, E, const N: usize> ConsumingActuator<'a, P, E, N>
where
    P: SetDutyCycle,
    E: EventSink,
{
    pub fn new(
        channel: &'a BoundedChannel<u16, N>,
        output: P,
        mapping: DutyMapping,
        sink: E,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            channel,
            output,
            mapping,
            sink,
            timeout,
        }
    }

    /// Pop one sample and apply it. `Ok(None)` when a finite wait elapsed.
    pub fn step(&mut self) -> Result<Option<u16>> {
        let value = match self.channel.pop_blocking(self.timeout) {
            Ok(v) => v,
            Err(Error::Timeout) => {
                debug!("consumer: channel empty");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let duty = self.apply(value)?;
        Ok(Some(duty))
    }

    /// Map `value` and write it to the output.
    pub fn apply(&mut self, value: u16) -> Result<u16> {
        let duty = self.mapping.map(value, self.output.max_duty_cycle());
        self.output
            .set_duty_cycle(duty)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.sink.emit(&AppEvent::SampleConsumed { value, duty });
        Ok(duty)
    }

    pub fn run(&mut self, shutdown: &Shutdown) -> Result<()> {
        while !shutdown.is_requested() {
            self.step()?;
        }
        Ok(())
    }

    pub fn output(&self) -> &P {
        &self.output
    }
}
