//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART in production, stderr in simulation).

use log::{debug, error, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::ButtonPressed(button) => {
                info!("Button {} Pressed", button.number());
            }
            AppEvent::ConfigChanged { from, to } => {
                info!(
                    "CONFIG | {:?}/{}ms -> {:?}/{}ms",
                    from.mode, from.period_ms, to.mode, to.period_ms
                );
            }
            AppEvent::ModeApplied(cfg) => {
                debug!("LED | applying {:?} ({}ms)", cfg.mode, cfg.period_ms);
            }
            AppEvent::SampleProduced(value) => {
                info!("Produced: {}", value);
            }
            AppEvent::SampleConsumed { value, duty } => {
                info!("Consumed: {} (duty={})", value, duty);
            }
            AppEvent::Toggled { level, presses } => {
                info!(
                    "LED | toggled {} ({} press(es))",
                    if *level { "ON" } else { "OFF" },
                    presses
                );
            }
            AppEvent::TaskHalted { task, reason } => {
                error!("HALT | {} stopped: {}", task, reason);
            }
        }
    }
}
