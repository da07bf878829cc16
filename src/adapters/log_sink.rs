//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured events to the ESP-IDF
//! logger (UART / USB-CDC in production).

use log::{Level, info, log, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::battery::BatteryLevel;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(status) => {
                info!("START | status={:?}", status);
            }
            AppEvent::StatusChanged { from, to } => {
                info!("STATUS | {:?} -> {:?}", from, to);
            }
            AppEvent::DoorChanged { open } => {
                info!("DOOR | {}", if *open { "open" } else { "closed" });
            }
            AppEvent::BatteryLevelChanged { from, reading } => {
                let level = if reading.level == BatteryLevel::Ok {
                    Level::Info
                } else {
                    Level::Warn
                };
                log!(
                    level,
                    "BATT | {:?} -> {:?} | {}mV ({}S)",
                    from,
                    reading.level,
                    reading.pack_mv,
                    reading.cells
                );
            }
            AppEvent::BatteryReminder(reading) => {
                warn!(
                    "BATT | still {:?} | {}mV ({}S)",
                    reading.level, reading.pack_mv, reading.cells
                );
            }
            AppEvent::KnobModeChanged { mode, value } => {
                info!("KNOB | mode={:?} value={}", mode, value);
            }
        }
    }
}
