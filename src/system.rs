//! Process-wide shared state.
//!
//! Everything the tasks share is constructed once here and handed out by
//! reference. On target the `System` is leaked so the GPIO ISR can hold a
//! `'static` pointer into it; host tests keep it on the stack and borrow it
//! into scoped threads.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use log::info;

use crate::app::events::AppEvent;
use crate::app::guarded::{ActuatorConfig, GuardedConfig};
use crate::app::ports::EventSink;
use crate::config::{SAMPLE_QUEUE_DEPTH, SystemConfig};
use crate::error::Result;
use crate::events::{EventAggregator, Notification};
use crate::health::{TaskHealth, TaskId};
use crate::pipeline::channel::BoundedChannel;
use crate::runtime::timeout_from_ms;

/// Cooperative stop flag checked by every task loop.
#[derive(Debug, Default)]
pub struct Shutdown(AtomicBool);

impl Shutdown {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Shared objects for one firmware run.
pub struct System<const N: usize = SAMPLE_QUEUE_DEPTH> {
    pub settings: SystemConfig,
    /// Button bits, set from the GPIO ISR.
    pub events: EventAggregator,
    /// Press token for the toggle variant.
    pub notify: Notification,
    pub config: GuardedConfig,
    pub samples: BoundedChannel<u16, N>,
    pub health: TaskHealth,
    pub shutdown: Shutdown,
}

impl<const N: usize> System<N> {
    /// Validate settings and build the shared objects. The LED config
    /// starts `Off` with the default blink period.
    pub fn new(settings: SystemConfig) -> Result<Self> {
        settings.validate()?;
        let initial = ActuatorConfig::off(settings.default_blink_period_ms);
        info!(
            "system: variant={:?} queue_depth={} initial={:?}",
            settings.variant, N, initial
        );
        Ok(Self {
            settings,
            events: EventAggregator::new(),
            notify: Notification::new(),
            config: GuardedConfig::new(initial),
            samples: BoundedChannel::new(),
            health: TaskHealth::new(),
            shutdown: Shutdown::new(),
        })
    }

    pub fn event_wait_timeout(&self) -> Option<Duration> {
        timeout_from_ms(self.settings.event_wait_timeout_ms)
    }

    pub fn channel_timeout(&self) -> Option<Duration> {
        timeout_from_ms(self.settings.channel_timeout_ms)
    }

    /// Run a task body and latch its failure in the health register.
    ///
    /// A failing task is reported once through `sink` and then stays
    /// stopped; the error is handed back to the caller as well.
    pub fn run_task<E, F>(&self, task: TaskId, mut sink: E, body: F) -> Result<()>
    where
        E: EventSink,
        F: FnOnce() -> Result<()>,
    {
        info!("{task}: started");
        match body() {
            Ok(()) => {
                info!("{task}: stopped");
                Ok(())
            }
            Err(reason) => {
                self.health.halt(task, reason);
                sink.emit(&AppEvent::TaskHalted { task, reason });
                Err(reason)
            }
        }
    }
}
