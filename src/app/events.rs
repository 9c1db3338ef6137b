//! Outbound application events.
//!
//! Tasks emit these through the [`EventSink`](super::ports::EventSink)
//! port. They are informational only; nothing in the control path depends
//! on them being delivered.

use crate::app::guarded::ActuatorConfig;
use crate::events::LogicalEvent;
use crate::health::TaskId;

/// Structured events emitted by the firmware tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A button edge was observed by the button task.
    ButtonPressed(LogicalEvent),

    /// The LED configuration was rewritten.
    ConfigChanged { from: ActuatorConfig, to: ActuatorConfig },

    /// The LED task picked up a new configuration snapshot.
    ModeApplied(ActuatorConfig),

    /// A sample was pushed into the channel.
    SampleProduced(u16),

    /// A sample was popped and written to the output.
    SampleConsumed { value: u16, duty: u16 },

    /// The toggle task flipped its output.
    Toggled { level: bool, presses: u32 },

    /// A task stopped with a fatal error.
    TaskHalted { task: TaskId, reason: crate::error::Error },
}
