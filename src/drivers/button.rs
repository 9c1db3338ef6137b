//! Edge-triggered button lines and their interrupt-context dispatch.
//!
//! ## Hardware
//!
//! Momentary switches on input-only pins with external pull-downs. The
//! GPIO fires on the rising edge; there is no debounce, so a bouncing
//! contact may deliver several edges per press.
//!
//! ## Dispatch
//!
//! Every registered line is bound once, at startup, to an
//! [`EdgeEventSource`] that already knows its target. The ISR receives a
//! pointer to that source as its opaque argument, so the interrupt path is
//! a single match on a two-variant enum: no pin lookup, no locking, no
//! allocation.
//!
//! | Variant          | Target                          |
//! |------------------|---------------------------------|
//! | `ModeControl`    | `EventAggregator` bit per line  |
//! | `ToggleOnPress`  | `Notification` (button A only)  |

use heapless::Vec;
use log::info;

use crate::config::AppVariant;
use crate::error::InitError;
use crate::events::{EventAggregator, LogicalEvent, Notification};
use crate::pins;

/// Upper bound on edge lines one table can hold.
pub const MAX_EDGE_LINES: usize = 8;

/// Where an edge is delivered.
#[derive(Clone, Copy)]
pub enum EdgeTarget<'a> {
    Aggregator {
        events: &'a EventAggregator,
        event: LogicalEvent,
    },
    Notify(&'a Notification),
}

/// One input line bound to its target.
pub struct EdgeEventSource<'a> {
    line: i32,
    target: EdgeTarget<'a>,
}

impl<'a> EdgeEventSource<'a> {
    pub const fn new(line: i32, target: EdgeTarget<'a>) -> Self {
        Self { line, target }
    }

    pub const fn line(&self) -> i32 {
        self.line
    }

    /// Called from interrupt context on every edge. Never blocks.
    ///
    /// Returns `true` when a waiting task was woken and a context switch
    /// should be requested on exit.
    #[inline]
    pub fn on_edge(&self) -> bool {
        match self.target {
            EdgeTarget::Aggregator { events, event } => events.set(event),
            EdgeTarget::Notify(n) => n.give(),
        }
    }
}

/// Registration table. Must not move once its entries are handed to the
/// interrupt controller.
#[derive(Default)]
pub struct EdgeLines<'a> {
    sources: Vec<EdgeEventSource<'a>, MAX_EDGE_LINES>,
}

impl<'a> EdgeLines<'a> {
    pub const fn new() -> Self {
        Self { sources: Vec::new() }
    }

    /// Bind `line` to `target`. Each line may be bound once.
    pub fn register(&mut self, line: i32, target: EdgeTarget<'a>) -> Result<(), InitError> {
        if self.get(line).is_some() {
            return Err(InitError::DuplicateLine(line));
        }
        self.sources
            .push(EdgeEventSource::new(line, target))
            .map_err(|_| InitError::TooManyLines)
    }

    /// Build the table for one wiring variant.
    pub fn for_variant(
        variant: AppVariant,
        events: &'a EventAggregator,
        notify: &'a Notification,
    ) -> Result<Self, InitError> {
        let mut lines = Self::new();
        match variant {
            AppVariant::ModeControl => {
                for (line, event) in pins::BUTTON_LINES {
                    lines.register(line, EdgeTarget::Aggregator { events, event })?;
                }
            }
            AppVariant::ToggleOnPress => {
                lines.register(pins::BUTTON_A_GPIO, EdgeTarget::Notify(notify))?;
            }
        }
        info!("button: {} edge line(s) bound for {:?}", lines.len(), variant);
        Ok(lines)
    }

    pub fn get(&self, line: i32) -> Option<&EdgeEventSource<'a>> {
        self.sources.iter().find(|s| s.line == line)
    }

    /// Deliver an edge on `line` as the interrupt controller would.
    /// Unknown lines are ignored.
    pub fn fire(&self, line: i32) -> bool {
        self.get(line).is_some_and(EdgeEventSource::on_edge)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EdgeEventSource<'a>> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
