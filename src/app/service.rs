//! Status service: maps door and battery state onto the indicator.
//!
//! ```text
//!  DoorSwitch ───┐
//!                ├──▶ ┌───────────────┐ ──▶ BlinkPort (indicator)
//!  BatteryMonitor┘    │ StatusService │ ──▶ EventSink
//!                     └───────────────┘
//! ```
//!
//! | Status           | Priority | Indication                       |
//! |------------------|----------|----------------------------------|
//! | BatteryCritical  | 1        | steady red                       |
//! | DoorOpen         | 2        | steady yellow                    |
//! | BatteryLow       | 3        | 3 orange blinks, repeated        |
//! | Ok               | 4        | one green blink, then off        |
//!
//! The indicator is only driven on a status change, so a running blink is
//! never restarted by an unchanged reading.

use log::info;

use crate::config::SystemConfig;
use crate::drivers::colour::{GREEN, ORANGE, RED, YELLOW};
use crate::sensors::battery::{BatteryLevel, BatteryReading};

use super::events::AppEvent;
use super::ports::{BlinkPort, EventSink};

const ACK_BLINK_PERIOD_MS: u32 = 250;
const LOW_BATTERY_BLINK_PERIOD_MS: u32 = 300;
const LOW_BATTERY_BLINKS: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Ok,
    BatteryLow,
    DoorOpen,
    BatteryCritical,
}

impl DeviceStatus {
    /// Highest-priority status for the given inputs.
    pub fn evaluate(door_open: bool, battery: BatteryLevel) -> Self {
        match (battery, door_open) {
            (BatteryLevel::Critical, _) => Self::BatteryCritical,
            (_, true) => Self::DoorOpen,
            (BatteryLevel::Low, false) => Self::BatteryLow,
            (BatteryLevel::Ok, false) => Self::Ok,
        }
    }
}

pub struct StatusService {
    status: Option<DeviceStatus>,
    door_open: Option<bool>,
    battery: Option<BatteryLevel>,
    reminder_ms: u32,
    last_indication_ms: u32,
}

impl StatusService {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            status: None,
            door_open: None,
            battery: None,
            reminder_ms: config.low_battery_reminder_secs.saturating_mul(1000),
            last_indication_ms: 0,
        }
    }

    pub fn status(&self) -> Option<DeviceStatus> {
        self.status
    }

    /// Fold in the latest readings and drive the indicator if the status
    /// changed (or a low-battery reminder is due).
    pub fn update(
        &mut self,
        now_ms: u32,
        door_open: bool,
        battery: BatteryReading,
        led: &impl BlinkPort,
        sink: &mut impl EventSink,
    ) -> DeviceStatus {
        if self.door_open.is_some_and(|prev| prev != door_open) {
            sink.emit(&AppEvent::DoorChanged { open: door_open });
        }
        self.door_open = Some(door_open);

        if let Some(prev) = self.battery.filter(|prev| *prev != battery.level) {
            sink.emit(&AppEvent::BatteryLevelChanged {
                from: prev,
                reading: battery,
            });
        }
        self.battery = Some(battery.level);

        let next = DeviceStatus::evaluate(door_open, battery.level);
        match self.status {
            None => {
                info!("status: starting as {:?}", next);
                sink.emit(&AppEvent::Started(next));
                self.indicate(next, now_ms, led);
            }
            Some(prev) if prev != next => {
                info!("status: {:?} -> {:?}", prev, next);
                sink.emit(&AppEvent::StatusChanged { from: prev, to: next });
                self.indicate(next, now_ms, led);
            }
            Some(_) => {
                if next == DeviceStatus::BatteryLow
                    && !led.is_blinking()
                    && now_ms.wrapping_sub(self.last_indication_ms) >= self.reminder_ms
                {
                    sink.emit(&AppEvent::BatteryReminder(battery));
                    self.indicate(next, now_ms, led);
                }
            }
        }
        self.status = Some(next);
        next
    }

    fn indicate(&mut self, status: DeviceStatus, now_ms: u32, led: &impl BlinkPort) {
        self.last_indication_ms = now_ms;
        match status {
            DeviceStatus::Ok => led.start_blink(ACK_BLINK_PERIOD_MS, 1, GREEN),
            DeviceStatus::BatteryLow => {
                led.start_blink(LOW_BATTERY_BLINK_PERIOD_MS, LOW_BATTERY_BLINKS, ORANGE);
            }
            DeviceStatus::DoorOpen => led.light_steady(YELLOW),
            DeviceStatus::BatteryCritical => led.light_steady(RED),
        }
    }
}
