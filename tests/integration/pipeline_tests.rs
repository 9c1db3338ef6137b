//! Producer → channel → consumer integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use edgesync::app::events::AppEvent;
use edgesync::config::SystemConfig;
use edgesync::error::{Error, SensorError};
use edgesync::health::TaskId;
use edgesync::pipeline::channel::BoundedChannel;
use edgesync::pipeline::consumer::{ConsumingActuator, DutyMapping};
use edgesync::pipeline::producer::{ProducerSettings, SamplingProducer};
use edgesync::system::{Shutdown, System};

use crate::mock_hw::{MockPwm, RecordingSink, ScaledDelay, ScriptedSource, wait_until};

const LIMIT: Duration = Duration::from_secs(5);

fn fast_settings() -> SystemConfig {
    SystemConfig {
        sample_interval_ms: 2,
        channel_timeout_ms: Some(20),
        duty_mapping: DutyMapping::Identity,
        ..SystemConfig::default()
    }
}

#[test]
fn push_blocks_at_capacity_until_pop() {
    let ch = BoundedChannel::<u16, 2>::new();
    ch.push_blocking(1, None).unwrap();
    ch.push_blocking(2, None).unwrap();
    assert!(ch.is_full());

    let pushed = AtomicBool::new(false);
    thread::scope(|s| {
        s.spawn(|| {
            ch.push_blocking(3, Some(LIMIT)).unwrap();
            pushed.store(true, Ordering::Release);
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!pushed.load(Ordering::Acquire), "push(3) must block while full");
        assert_eq!(ch.len(), 2);

        assert_eq!(ch.pop_blocking(Some(LIMIT)), Ok(1));
        assert!(wait_until(LIMIT, || pushed.load(Ordering::Acquire)));
    });

    assert_eq!(ch.try_pop(), Ok(2));
    assert_eq!(ch.try_pop(), Ok(3));
    assert_eq!(ch.try_pop(), Err(Error::WouldBlock));
}

#[test]
fn pop_blocks_until_value_arrives() {
    let ch = BoundedChannel::<u16, 2>::new();
    thread::scope(|s| {
        let h = s.spawn(|| ch.pop_blocking(Some(LIMIT)));
        thread::sleep(Duration::from_millis(30));
        ch.push_blocking(77, None).unwrap();
        assert_eq!(h.join().unwrap(), Ok(77));
    });
}

#[test]
fn samples_flow_in_order_and_source_failure_halts_producer() {
    let sys = System::<4>::new(fast_settings()).unwrap();
    let pwm = MockPwm::new(255);
    let sink = RecordingSink::new();
    let values: Vec<u16> = (0..20).map(|i| i * 10).collect();

    thread::scope(|s| {
        let consumer_pwm = pwm.clone();
        let consumer_sink = sink.clone();
        let sys = &sys;
        s.spawn(move || {
            let mut consumer = ConsumingActuator::new(
                &sys.samples,
                consumer_pwm,
                sys.settings.duty_mapping,
                consumer_sink.clone(),
                sys.channel_timeout(),
            );
            sys.run_task(TaskId::Consumer, consumer_sink, || consumer.run(&sys.shutdown))
        });

        let mut producer = SamplingProducer::new(
            ScriptedSource::values(values.clone()),
            &sys.samples,
            ScaledDelay { scale: 1 },
            sink.clone(),
            // Finite push waits: a full channel holds the sample, never drops it.
            ProducerSettings::from(&sys.settings),
        );
        let out = sys.run_task(TaskId::Producer, sink.clone(), || producer.run(&sys.shutdown));
        assert_eq!(out, Err(Error::Sensor(SensorError::Exhausted)));

        assert!(wait_until(LIMIT, || pwm.duties().len() == values.len()));
        sys.shutdown.request();
    });

    // Identity mapping with max 255 clamps the tail.
    let expected: Vec<u16> = values.iter().map(|v| (*v).min(255)).collect();
    assert_eq!(pwm.duties(), expected);

    assert!(sys.health.is_halted(TaskId::Producer));
    assert!(!sys.health.is_halted(TaskId::Consumer));
    assert_eq!(
        sys.health.first_fault(),
        Some((TaskId::Producer, Error::Sensor(SensorError::Exhausted)))
    );

    let produced: Vec<u16> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            AppEvent::SampleProduced(v) => Some(v),
            _ => None,
        })
        .collect();
    assert_eq!(produced, values);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::TaskHalted { task: TaskId::Producer, .. })),
        1
    );
}

#[test]
fn slow_consumer_applies_backpressure_without_loss() {
    let ch = BoundedChannel::<u16, 2>::new();
    let pwm = MockPwm::new(u16::MAX);

    thread::scope(|s| {
        let ch = &ch;
        let producer = s.spawn(move || {
            let settings = ProducerSettings {
                interval_ms: 0,
                read_retries: 0,
                push_timeout: None,
            };
            let mut p = SamplingProducer::new(
                ScriptedSource::values(1..=8),
                ch,
                ScaledDelay { scale: 1 },
                RecordingSink::new(),
                settings,
            );
            let running = Shutdown::new();
            for _ in 0..8 {
                p.step(&running).unwrap();
                assert!(ch.len() <= ch.capacity());
            }
        });

        let mut consumer = ConsumingActuator::new(
            ch,
            pwm.clone(),
            DutyMapping::Identity,
            RecordingSink::new(),
            Some(LIMIT),
        );
        for _ in 0..8 {
            thread::sleep(Duration::from_millis(5));
            consumer.step().unwrap();
        }
        producer.join().unwrap();
    });

    assert_eq!(pwm.duties(), (1..=8).collect::<Vec<u16>>());
}

#[test]
fn linear_mapping_drives_pwm_range() {
    let ch = BoundedChannel::<u16, 4>::new();
    let pwm = MockPwm::new(255);
    let mut consumer = ConsumingActuator::new(
        &ch,
        pwm.clone(),
        DutyMapping::Linear { in_min: 0, in_max: 4095 },
        RecordingSink::new(),
        Some(Duration::from_millis(20)),
    );
    for v in [0, 4095, 8000] {
        ch.try_push(v).unwrap();
        consumer.step().unwrap();
    }
    assert_eq!(pwm.duties(), [0, 255, 255]);
}
