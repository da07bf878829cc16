//! Outbound application events.
//!
//! The [`StatusService`](super::service::StatusService) and the firmware
//! loops emit these through the [`EventSink`](super::ports::EventSink)
//! port. Adapters on the other side decide where they go.

use crate::drivers::knob::KnobMode;
use crate::sensors::battery::{BatteryLevel, BatteryReading};

use super::service::DeviceStatus;

/// Structured events emitted by the device logic.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The status service has started (carries initial status).
    Started(DeviceStatus),

    /// The indicated device status changed.
    StatusChanged { from: DeviceStatus, to: DeviceStatus },

    /// The debounced door switch changed.
    DoorChanged { open: bool },

    /// The pack crossed a voltage threshold.
    BatteryLevelChanged {
        from: BatteryLevel,
        reading: BatteryReading,
    },

    /// The low-battery blink was repeated as a reminder.
    BatteryReminder(BatteryReading),

    /// The control knob switched mode.
    KnobModeChanged { mode: KnobMode, value: u16 },
}
