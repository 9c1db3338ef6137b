//! Producer task: samples the input source on a fixed interval.
//!
//! Each iteration reads one sample, pushes it (waiting while the channel is
//! full) and then sleeps `sample_interval_ms`. A read that still fails
//! after the configured retries stops the task.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, trace, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SampleSource};
use crate::config::SystemConfig;
use crate::error::{Error, Result};
use crate::pipeline::channel::BoundedChannel;
use crate::system::Shutdown;

/// Producer timing and retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerSettings {
    pub interval_ms: u32,
    /// Extra attempts after a failed read. 0 means the first failure is fatal.
    pub read_retries: u8,
    pub push_timeout: Option<Duration>,
}

impl From<&SystemConfig> for ProducerSettings {
    fn from(cfg: &SystemConfig) -> Self {
        Self {
            interval_ms: cfg.sample_interval_ms,
            read_retries: cfg.sample_read_retries,
            push_timeout: crate::runtime::timeout_from_ms(cfg.channel_timeout_ms),
        }
    }
}

pub struct SamplingProducer<'a, S, D, E, const N: usize> {
    source: S,
    channel: &'a BoundedChannel<u16, N>,
    delay: D,
    sink: E,
    settings: ProducerSettings,
}

impl<'a, S, D, E, const N: usize> SamplingProducer<'a, S, D, E, N>
where
    S: SampleSource,
    D: DelayNs,
    E: EventSink,
{
    pub fn new(
        source: S,
        channel: &'a BoundedChannel<u16, N>,
        delay: D,
        sink: E,
        settings: ProducerSettings,
    ) -> Self {
        Self {
            source,
            channel,
            delay,
            sink,
            settings,
        }
    }

    fn read(&mut self) -> Result<u16> {
        let mut attempt = 0u8;
        loop {
            match self.source.read() {
                Ok(v) => return Ok(v),
                Err(e) if attempt < self.settings.read_retries => {
                    attempt += 1;
                    warn!(
                        "producer: read failed ({e}), retry {attempt}/{}",
                        self.settings.read_retries
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read one sample and push it, waiting while the channel is full.
    ///
    /// A finite push wait that elapses is retried with the same value, so
    /// nothing is dropped. Returns `Ok(None)` only when `shutdown` was
    /// requested before the sample could be queued.
    pub fn step(&mut self, shutdown: &Shutdown) -> Result<Option<u16>> {
        let value = self.read()?;
        loop {
            match self.channel.push_blocking(value, self.settings.push_timeout) {
                Ok(()) => {
                    self.sink.emit(&AppEvent::SampleProduced(value));
                    return Ok(Some(value));
                }
                Err(Error::Timeout) if !shutdown.is_requested() => {
                    trace!("producer: channel full, holding {value}");
                }
                Err(Error::Timeout) => {
                    debug!("producer: shutdown with {value} unsent");
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn run(&mut self, shutdown: &Shutdown) -> Result<()> {
        while !shutdown.is_requested() {
            self.step(shutdown)?;
            self.delay.delay_ms(self.settings.interval_ms);
        }
        Ok(())
    }
}
