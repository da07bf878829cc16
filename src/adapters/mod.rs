//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements   | Connects to              |
//! |------------|--------------|--------------------------|
//! | `hardware` | AnalogInput  | ESP32 ADC1 oneshot       |
//! | `log_sink` | EventSink    | Serial log output        |
//! | `nvs`      | ConfigPort   | NVS / in-memory store    |
//! | `time`     | (none)       | ESP32 system timer       |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
