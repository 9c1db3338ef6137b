//! edgesync firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ GPIO ISR ──set──▶ EventAggregator ──▶ btn-ctl ──▶ GuardedConfig  │
//! │                                                       │          │
//! │                                     led-ctl ◀─snapshot┘ ──▶ LED  │
//! │                                                                  │
//! │ producer ──push──▶ BoundedChannel ──pop──▶ consumer ──▶ PWM      │
//! │                                                                  │
//! │ main: fail-fast init, then supervise TaskHealth                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, bail};
use embedded_hal::delay::DelayNs;
use log::info;

use edgesync::adapters::hardware::{AdcSampler, GpioOutput, PwmOutput};
use edgesync::adapters::log_sink::LogEventSink;
use edgesync::adapters::time::TaskDelay;
use edgesync::app::dispatcher::ButtonDispatcher;
use edgesync::config::{AppVariant, SystemConfig, TaskSpec};
use edgesync::control::actuation::{ActuationLoop, ActuationTimings};
use edgesync::control::toggle::ToggleTask;
use edgesync::drivers::button::EdgeLines;
use edgesync::drivers::hw_init::{self, LEDC_CH_SAMPLE};
use edgesync::drivers::task_pin::{Core, spawn_task};
use edgesync::error::Error;
use edgesync::health::TaskId;
use edgesync::pins;
use edgesync::pipeline::consumer::ConsumingActuator;
use edgesync::pipeline::producer::{ProducerSettings, SamplingProducer};
use edgesync::system::System;

/// Health poll interval for the supervisor loop.
const SUPERVISE_INTERVAL_MS: u32 = 1_000;

/// Spawn one task whose failure is latched in `sys.health`.
fn spawn(
    sys: &'static System,
    task: TaskId,
    spec: TaskSpec,
    core: Core,
    body: impl FnOnce() -> edgesync::error::Result<()> + Send + 'static,
) -> Result<()> {
    spawn_task(task, spec, core, move || {
        // The error is already recorded; the supervisor acts on it.
        let _ = sys.run_task(task, LogEventSink, body);
    })
    .map_err(Error::from)?;
    Ok(())
}

fn spawn_mode_control(sys: &'static System) -> Result<()> {
    let s = &sys.settings;

    spawn(sys, TaskId::Button, s.button_task, Core::App, move || {
        ButtonDispatcher::new(&sys.events, &sys.config, LogEventSink, sys.event_wait_timeout())
            .run(&sys.shutdown)
    })?;

    spawn(sys, TaskId::Led, s.led_task, Core::App, move || {
        ActuationLoop::new(
            &sys.config,
            GpioOutput::new(pins::RED_LED_GPIO),
            TaskDelay,
            LogEventSink,
            ActuationTimings::from(&sys.settings),
        )
        .run(&sys.shutdown)
    })
}

fn spawn_toggle(sys: &'static System) -> Result<()> {
    spawn(sys, TaskId::Toggle, sys.settings.button_task, Core::App, move || {
        ToggleTask::new(
            &sys.notify,
            GpioOutput::new(pins::RED_LED_GPIO),
            LogEventSink,
            sys.event_wait_timeout(),
        )
        .run(&sys.shutdown)
    })
}

fn spawn_pipeline(sys: &'static System) -> Result<()> {
    let s = &sys.settings;

    spawn(sys, TaskId::Producer, s.producer_task, Core::Pro, move || {
        SamplingProducer::new(
            AdcSampler::new(pins::SAMPLE_ADC_CHANNEL),
            &sys.samples,
            TaskDelay,
            LogEventSink,
            ProducerSettings::from(&sys.settings),
        )
        .run(&sys.shutdown)
    })?;

    spawn(sys, TaskId::Consumer, s.consumer_task, Core::Pro, move || {
        ConsumingActuator::new(
            &sys.samples,
            PwmOutput::new(LEDC_CH_SAMPLE),
            sys.settings.duty_mapping,
            LogEventSink,
            sys.channel_timeout(),
        )
        .run(&sys.shutdown)
    })
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("edgesync v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Shared state ───────────────────────────────────────
    let settings = SystemConfig::default();
    let sys: &'static System = Box::leak(Box::new(System::new(settings)?));

    // ── 3. Peripherals and ISRs (any failure aborts boot) ─────
    hw_init::init_peripherals().map_err(Error::from)?;
    let lines: &'static EdgeLines<'static> = Box::leak(Box::new(
        EdgeLines::for_variant(sys.settings.variant, &sys.events, &sys.notify)
            .map_err(Error::from)?,
    ));
    hw_init::install_edge_isrs(lines).map_err(Error::from)?;

    // ── 4. Tasks ──────────────────────────────────────────────
    match sys.settings.variant {
        AppVariant::ModeControl => spawn_mode_control(sys)?,
        AppVariant::ToggleOnPress => spawn_toggle(sys)?,
    }
    spawn_pipeline(sys)?;
    info!("Boot complete, supervising");

    // ── 5. Supervise ──────────────────────────────────────────
    let mut delay = TaskDelay;
    loop {
        delay.delay_ms(SUPERVISE_INTERVAL_MS);
        if let Some((task, reason)) = sys.health.first_fault() {
            sys.shutdown.request();
            bail!("task {task} halted: {reason}");
        }
    }
}
