//! Edge → aggregator → button task → config → LED task, on real threads.

use std::thread;
use std::time::Duration;

use edgesync::adapters::time::StdDelay;
use edgesync::app::dispatcher::ButtonDispatcher;
use edgesync::app::events::AppEvent;
use edgesync::app::guarded::{ActuatorConfig, GuardedConfig, LedMode};
use edgesync::config::{AppVariant, SystemConfig};
use edgesync::control::actuation::{ActuationLoop, ActuationTimings};
use edgesync::control::toggle::ToggleTask;
use edgesync::drivers::button::EdgeLines;
use edgesync::events::{EventBits, LogicalEvent};
use edgesync::pins;
use edgesync::system::System;

use crate::mock_hw::{MockPin, RecordingSink, wait_until};

const LIMIT: Duration = Duration::from_secs(5);

fn test_settings(variant: AppVariant) -> SystemConfig {
    SystemConfig {
        housekeeping_interval_ms: 5,
        loop_yield_ms: 1,
        event_wait_timeout_ms: Some(20),
        variant,
        ..SystemConfig::default()
    }
}

#[test]
fn buttons_drive_led_modes_end_to_end() {
    let sys: System = System::new(test_settings(AppVariant::ModeControl)).unwrap();
    let lines = EdgeLines::for_variant(sys.settings.variant, &sys.events, &sys.notify).unwrap();
    let led = MockPin::new();
    let sink = RecordingSink::new();

    thread::scope(|s| {
        let sys = &sys;
        let (btn_sink, led_sink, led_pin) = (sink.clone(), sink.clone(), led.clone());
        s.spawn(move || {
            ButtonDispatcher::new(&sys.events, &sys.config, btn_sink, sys.event_wait_timeout())
                .run(&sys.shutdown)
        });
        s.spawn(move || {
            ActuationLoop::new(
                &sys.config,
                led_pin,
                StdDelay,
                led_sink,
                ActuationTimings::from(&sys.settings),
            )
            .run(&sys.shutdown)
        });

        // A: steady on.
        lines.fire(pins::BUTTON_A_GPIO);
        assert!(wait_until(LIMIT, || sys.config.snapshot().mode == LedMode::On));
        assert!(wait_until(LIMIT, || led.last() == Some(true)));

        // C: fast blink; the LED must actually toggle.
        lines.fire(pins::BUTTON_C_GPIO);
        assert!(wait_until(LIMIT, || sys.config.snapshot() == ActuatorConfig::blink(500)));
        let before = led.transitions().len();
        assert!(wait_until(LIMIT, || led.transitions().len() >= before + 2));

        // D: off, whatever came before.
        lines.fire(pins::BUTTON_D_GPIO);
        assert!(wait_until(LIMIT, || sys.config.snapshot().mode == LedMode::Off));
        assert!(wait_until(LIMIT, || led.last() == Some(false)));

        sys.shutdown.request();
    });

    assert_eq!(sys.config.snapshot(), ActuatorConfig::off(500));
    for button in [LogicalEvent::ButtonA, LogicalEvent::ButtonC, LogicalEvent::ButtonD] {
        assert_eq!(sink.count(|e| *e == AppEvent::ButtonPressed(button)), 1);
    }
    assert!(!sys.health.any_halted());
}

#[test]
fn repeated_edges_before_wait_coalesce() {
    let sys: System = System::new(test_settings(AppVariant::ModeControl)).unwrap();
    let lines = EdgeLines::for_variant(sys.settings.variant, &sys.events, &sys.notify).unwrap();
    let sink = RecordingSink::new();

    lines.fire(pins::BUTTON_B_GPIO);
    lines.fire(pins::BUTTON_B_GPIO);
    lines.fire(pins::BUTTON_B_GPIO);
    lines.fire(pins::BUTTON_A_GPIO);

    let mut task = ButtonDispatcher::new(&sys.events, &sys.config, sink.clone(), sys.event_wait_timeout());
    let seen = task.step().unwrap();
    assert_eq!(
        seen,
        Some(LogicalEvent::ButtonA.bits() | LogicalEvent::ButtonB.bits())
    );
    assert_eq!(sink.count(|e| *e == AppEvent::ButtonPressed(LogicalEvent::ButtonB)), 1);
    // Both applied in one transition; B is the later button.
    assert_eq!(sys.config.snapshot(), ActuatorConfig::blink(1000));

    assert_eq!(task.step(), Ok(None));
    assert_eq!(sys.events.pending(), EventBits::EMPTY);
}

#[test]
fn snapshots_never_observe_torn_config() {
    const FIRST: ActuatorConfig = ActuatorConfig { mode: LedMode::On, period_ms: 111 };
    const SECOND: ActuatorConfig = ActuatorConfig { mode: LedMode::Blink, period_ms: 222 };
    let cfg = GuardedConfig::new(FIRST);

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..100 {
                cfg.update(|_| if i % 2 == 0 { SECOND } else { FIRST });
                thread::yield_now();
            }
        });
        s.spawn(|| {
            for _ in 0..100 {
                let snap = cfg.snapshot();
                assert!(snap == FIRST || snap == SECOND, "torn snapshot: {snap:?}");
                thread::yield_now();
            }
        });
    });
}

#[test]
fn blink_period_500_toggles_about_every_250ms() {
    let cfg = GuardedConfig::new(ActuatorConfig::blink(500));
    let led = MockPin::new();
    let shutdown = edgesync::system::Shutdown::new();
    let timings = ActuationTimings { housekeeping_ms: 50, yield_ms: 1 };

    thread::scope(|s| {
        let pin = led.clone();
        let (cfg, shutdown) = (&cfg, &shutdown);
        s.spawn(move || {
            ActuationLoop::new(cfg, pin, StdDelay, RecordingSink::new(), timings).run(shutdown)
        });
        assert!(wait_until(LIMIT, || led.transitions().len() >= 4));
        shutdown.request();
    });

    let t = led.transitions();
    for pair in t.windows(2).take(3) {
        let gap = pair[1] - pair[0];
        assert!(
            gap >= Duration::from_millis(240) && gap <= Duration::from_millis(400),
            "toggle gap {gap:?}"
        );
    }
}

#[test]
fn toggle_variant_flips_led_per_press() {
    let sys: System = System::new(test_settings(AppVariant::ToggleOnPress)).unwrap();
    let lines = EdgeLines::for_variant(sys.settings.variant, &sys.events, &sys.notify).unwrap();
    let led = MockPin::new();
    let sink = RecordingSink::new();

    thread::scope(|s| {
        let sys = &sys;
        let (pin, task_sink) = (led.clone(), sink.clone());
        s.spawn(move || {
            ToggleTask::new(&sys.notify, pin, task_sink, sys.event_wait_timeout()).run(&sys.shutdown)
        });

        lines.fire(pins::BUTTON_A_GPIO);
        assert!(wait_until(LIMIT, || led.last() == Some(true)));
        lines.fire(pins::BUTTON_A_GPIO);
        assert!(wait_until(LIMIT, || led.last() == Some(false)));

        // Other buttons are not bound in this variant.
        assert!(!lines.fire(pins::BUTTON_B_GPIO));
        sys.shutdown.request();
    });

    assert_eq!(led.levels(), [true, false]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Toggled { .. })), 2);
}
