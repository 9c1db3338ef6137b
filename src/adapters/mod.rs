//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements                  | Connects to        |
//! |------------|-----------------------------|--------------------|
//! | `hardware` | OutputPin, SetDutyCycle     | ESP32 GPIO, LEDC   |
//! |            | SampleSource                | ESP32 ADC1         |
//! | `log_sink` | EventSink                   | Serial log output  |
//! | `time`     | DelayNs                     | FreeRTOS tick      |

pub mod hardware;
pub mod log_sink;
pub mod time;
