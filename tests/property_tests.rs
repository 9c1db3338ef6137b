//! Property tests for the event register, config transitions and channel.
//!
//! Runs on host only; proptest is not available for ESP32 targets.

#![cfg(not(target_os = "espidf"))]

use edgesync::app::commands::{ButtonCommand, apply_all};
use edgesync::app::guarded::{ActuatorConfig, GuardedConfig, LedMode};
use edgesync::events::{EventAggregator, EventBits, LogicalEvent};
use edgesync::pipeline::channel::BoundedChannel;
use proptest::prelude::*;

fn any_event() -> impl Strategy<Value = LogicalEvent> {
    (0usize..4).prop_map(|i| LogicalEvent::from_index(i).unwrap())
}

fn any_config() -> impl Strategy<Value = ActuatorConfig> {
    let mode = prop_oneof![
        Just(LedMode::Off),
        Just(LedMode::On),
        Just(LedMode::Blink),
        Just(LedMode::Alternate),
    ];
    (mode, 2u32..10_000).prop_map(|(mode, period_ms)| ActuatorConfig { mode, period_ms })
}

// ── Config transitions ────────────────────────────────────────

proptest! {
    /// The last event alone decides the mode; earlier history is overwritten.
    #[test]
    fn last_event_wins(start in any_config(), events in prop::collection::vec(any_event(), 1..20)) {
        let cfg = GuardedConfig::new(start);
        for e in &events {
            cfg.update(|c| ButtonCommand::for_event(*e).apply(c));
        }
        let last = *events.last().unwrap();
        let expected_mode = match last {
            LogicalEvent::ButtonA => LedMode::On,
            LogicalEvent::ButtonB | LogicalEvent::ButtonC => LedMode::Blink,
            LogicalEvent::ButtonD => LedMode::Off,
        };
        prop_assert_eq!(cfg.snapshot().mode, expected_mode);
    }

    /// Button D always ends in `Off`, keeping the period.
    #[test]
    fn off_from_any_state(start in any_config()) {
        let after = ButtonCommand::for_event(LogicalEvent::ButtonD).apply(start);
        prop_assert_eq!(after, ActuatorConfig::off(start.period_ms));
    }

    /// Blink commands always set mode and period together.
    #[test]
    fn blink_sets_period(start in any_config()) {
        prop_assert_eq!(
            ButtonCommand::for_event(LogicalEvent::ButtonB).apply(start),
            ActuatorConfig::blink(1000)
        );
        prop_assert_eq!(
            ButtonCommand::for_event(LogicalEvent::ButtonC).apply(start),
            ActuatorConfig::blink(500)
        );
    }
}

// ── Event aggregator ──────────────────────────────────────────

proptest! {
    /// Any burst of sets between two waits is observed as the set of
    /// distinct events: presence is kept, count is not.
    #[test]
    fn burst_observed_as_distinct_set(events in prop::collection::vec(any_event(), 1..32)) {
        let agg = EventAggregator::new();
        let mut expected = EventBits::EMPTY;
        for e in &events {
            agg.set(*e);
            expected |= e.bits();
        }
        let seen = agg
            .wait_any_blocking(EventBits::ALL_BUTTONS, true, Some(std::time::Duration::from_millis(50)))
            .unwrap();
        prop_assert_eq!(seen, expected);
        prop_assert!(agg.pending().is_empty());
    }

    /// Waiting on a sub-mask clears only the masked bits it observed.
    #[test]
    fn wait_clears_only_mask(events in prop::collection::vec(any_event(), 1..16), mask_raw in 1u32..16) {
        let agg = EventAggregator::new();
        for e in &events {
            agg.set(*e);
        }
        let before = agg.pending();
        let mask = EventBits::from_raw(mask_raw);
        prop_assume!(before.intersects(mask));

        let seen = agg
            .wait_any_blocking(mask, true, Some(std::time::Duration::from_millis(50)))
            .unwrap();
        prop_assert_eq!(seen, before);
        prop_assert_eq!(agg.pending().raw(), before.raw() & !mask.raw());
    }

    /// Applying a batch equals applying its events one by one in button order.
    #[test]
    fn batch_matches_sequential(start in any_config(), raw in 1u32..16) {
        let bits = EventBits::from_raw(raw);
        let sequential = bits.iter().fold(start, |c, e| ButtonCommand::for_event(e).apply(c));
        prop_assert_eq!(apply_all(bits, start), sequential);
    }
}

// ── Bounded channel ───────────────────────────────────────────

#[derive(Debug, Clone)]
enum ChanOp {
    Push(u16),
    Pop,
}

fn chan_op() -> impl Strategy<Value = ChanOp> {
    prop_oneof![any::<u16>().prop_map(ChanOp::Push), Just(ChanOp::Pop)]
}

proptest! {
    /// Against a model queue: FIFO order holds, occupancy stays within
    /// capacity, and a push is refused exactly when the channel is full.
    #[test]
    fn channel_matches_fifo_model(ops in prop::collection::vec(chan_op(), 0..64)) {
        const CAP: usize = 3;
        let ch = BoundedChannel::<u16, CAP>::new();
        let mut model = std::collections::VecDeque::new();

        for op in ops {
            match op {
                ChanOp::Push(v) => {
                    let full = model.len() == CAP;
                    prop_assert_eq!(ch.is_full(), full);
                    match ch.try_push(v) {
                        Ok(()) => {
                            prop_assert!(!full);
                            model.push_back(v);
                        }
                        Err(back) => {
                            prop_assert!(full);
                            prop_assert_eq!(back, v);
                        }
                    }
                }
                ChanOp::Pop => {
                    prop_assert_eq!(ch.try_pop().ok(), model.pop_front());
                }
            }
            prop_assert_eq!(ch.len(), model.len());
            prop_assert!(ch.len() <= CAP);
        }
    }
}
