//! Sampling pipeline: ADC producer → bounded channel → PWM consumer.
//!
//! ```text
//!  SampleSource ──read──▶ SamplingProducer ──push──▶ BoundedChannel<u16, N>
//!                                                          │
//!                          SetDutyCycle ◀──duty── ConsumingActuator ◀──pop
//! ```
//!
//! Backpressure is pure blocking on both ends: a full channel parks the
//! producer and an empty one parks the consumer.

pub mod channel;
pub mod consumer;
pub mod producer;
