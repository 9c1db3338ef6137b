//! Mock hardware for integration tests.
//!
//! Every mock records into shared state behind an `Arc`, so a test can keep
//! a handle while the task under test owns the mock on another thread.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use edgesync::app::events::AppEvent;
use edgesync::app::ports::{EventSink, SampleSource};
use edgesync::error::SensorError;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

// ── Digital output ────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPin {
    writes: Arc<Mutex<Vec<(Instant, bool)>>>,
}

#[allow(dead_code)]
impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.writes.lock().unwrap().iter().map(|(_, l)| *l).collect()
    }

    pub fn last(&self) -> Option<bool> {
        self.writes.lock().unwrap().last().map(|(_, l)| *l)
    }

    /// Times at which the level actually changed.
    pub fn transitions(&self) -> Vec<Instant> {
        let writes = self.writes.lock().unwrap();
        writes
            .windows(2)
            .filter(|w| w[0].1 != w[1].1)
            .map(|w| w[1].0)
            .collect()
    }

    fn push(&mut self, level: bool) {
        self.writes.lock().unwrap().push((Instant::now(), level));
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.push(true);
        Ok(())
    }
}

// ── PWM output ────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockPwm {
    max: u16,
    duties: Arc<Mutex<Vec<u16>>>,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new(max: u16) -> Self {
        Self {
            max,
            duties: Arc::default(),
        }
    }

    pub fn duties(&self) -> Vec<u16> {
        self.duties.lock().unwrap().clone()
    }
}

impl embedded_hal::pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duties.lock().unwrap().push(duty);
        Ok(())
    }
}

// ── Sample source ─────────────────────────────────────────────

/// Replays a fixed script, then reports `Exhausted`.
pub struct ScriptedSource {
    script: VecDeque<Result<u16, SensorError>>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn values(values: impl IntoIterator<Item = u16>) -> Self {
        Self {
            script: values.into_iter().map(Ok).collect(),
        }
    }

    pub fn script(script: impl IntoIterator<Item = Result<u16, SensorError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl SampleSource for ScriptedSource {
    fn read(&mut self) -> Result<u16, SensorError> {
        self.script.pop_front().unwrap_or(Err(SensorError::Exhausted))
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<AppEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Sleeps for `1 / scale` of the requested time.
#[derive(Clone, Copy)]
pub struct ScaledDelay {
    pub scale: u32,
}

impl DelayNs for ScaledDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos((ns / self.scale.max(1)) as u64));
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Poll `cond` until it holds or `limit` elapses.
#[allow(dead_code)]
pub fn wait_until(limit: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}
