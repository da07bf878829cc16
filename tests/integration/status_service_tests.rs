//! Integration tests for the door/battery status pipeline.
//!
//! Readings go into `StatusService`, which drives a `BlinkPort` and an
//! `EventSink`. Most tests use the recording LED; the last one runs the
//! real blink controller on mock hardware.

use crate::mock_hw::{LedCall, LogSink, RecordingLed, controller, fire};

use sketchbook::app::events::AppEvent;
use sketchbook::app::service::{DeviceStatus, StatusService};
use sketchbook::config::SystemConfig;
use sketchbook::drivers::blink::BlinkState;
use sketchbook::drivers::colour::{BLACK, GREEN, ORANGE, RED, YELLOW};
use sketchbook::sensors::battery::{BatteryLevel, BatteryReading};

fn reading(level: BatteryLevel) -> BatteryReading {
    let pack_mv = match level {
        BatteryLevel::Ok => 7800,
        BatteryLevel::Low => 6400,
        BatteryLevel::Critical => 5600,
    };
    BatteryReading {
        pack_mv,
        cells: 2,
        level,
    }
}

fn make_service() -> (StatusService, RecordingLed, LogSink) {
    (
        StatusService::new(&SystemConfig::default()),
        RecordingLed::default(),
        LogSink::new(),
    )
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn healthy_start_acknowledges_with_green_blink() {
    let (mut svc, led, mut sink) = make_service();
    assert_eq!(svc.status(), None);

    let status = svc.update(0, false, reading(BatteryLevel::Ok), &led, &mut sink);

    assert_eq!(status, DeviceStatus::Ok);
    assert_eq!(
        led.last(),
        Some(LedCall::Blink {
            period_ms: 250,
            repeat_count: 1,
            colour: GREEN,
        })
    );
    assert!(matches!(sink.events[..], [AppEvent::Started(DeviceStatus::Ok)]));
}

#[test]
fn unchanged_readings_do_not_touch_the_indicator() {
    let (mut svc, led, mut sink) = make_service();
    svc.update(0, false, reading(BatteryLevel::Ok), &led, &mut sink);
    for t in 1..50 {
        svc.update(t * 10, false, reading(BatteryLevel::Ok), &led, &mut sink);
    }
    assert_eq!(led.count(), 1);
    assert_eq!(sink.events.len(), 1);
}

// ── Door ──────────────────────────────────────────────────────

#[test]
fn open_door_shows_steady_yellow_until_closed() {
    let (mut svc, led, mut sink) = make_service();
    svc.update(0, false, reading(BatteryLevel::Ok), &led, &mut sink);

    svc.update(100, true, reading(BatteryLevel::Ok), &led, &mut sink);
    assert_eq!(svc.status(), Some(DeviceStatus::DoorOpen));
    assert_eq!(led.last(), Some(LedCall::Steady(YELLOW)));

    svc.update(200, false, reading(BatteryLevel::Ok), &led, &mut sink);
    assert_eq!(svc.status(), Some(DeviceStatus::Ok));
    assert!(matches!(led.last(), Some(LedCall::Blink { colour: GREEN, .. })));

    assert_eq!(
        sink.count_where(|e| matches!(e, AppEvent::DoorChanged { .. })),
        2
    );
    assert_eq!(
        sink.count_where(|e| matches!(e, AppEvent::StatusChanged { .. })),
        2
    );
}

// ── Battery ───────────────────────────────────────────────────

#[test]
fn critical_battery_outranks_open_door() {
    let (mut svc, led, mut sink) = make_service();
    svc.update(0, true, reading(BatteryLevel::Ok), &led, &mut sink);
    assert_eq!(led.last(), Some(LedCall::Steady(YELLOW)));

    svc.update(100, true, reading(BatteryLevel::Critical), &led, &mut sink);
    assert_eq!(svc.status(), Some(DeviceStatus::BatteryCritical));
    assert_eq!(led.last(), Some(LedCall::Steady(RED)));
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::BatteryLevelChanged {
            from: BatteryLevel::Ok,
            reading: BatteryReading {
                level: BatteryLevel::Critical,
                ..
            },
        }
    )));
}

#[test]
fn low_battery_blinks_orange_and_reminds() {
    let (mut svc, led, mut sink) = make_service();
    svc.update(0, false, reading(BatteryLevel::Low), &led, &mut sink);
    assert_eq!(
        led.last(),
        Some(LedCall::Blink {
            period_ms: 300,
            repeat_count: 3,
            colour: ORANGE,
        })
    );

    // Still blinking: no reminder.
    svc.update(20_000, false, reading(BatteryLevel::Low), &led, &mut sink);
    assert_eq!(led.count(), 1);

    led.blinking.set(false);
    svc.update(29_999, false, reading(BatteryLevel::Low), &led, &mut sink);
    assert_eq!(led.count(), 1, "reminder not due yet");

    svc.update(30_000, false, reading(BatteryLevel::Low), &led, &mut sink);
    assert_eq!(led.count(), 2);
    assert_eq!(
        sink.count_where(|e| matches!(e, AppEvent::BatteryReminder(_))),
        1
    );

    // The reminder blink is running again, so the next one waits for it.
    svc.update(70_000, false, reading(BatteryLevel::Low), &led, &mut sink);
    assert_eq!(led.count(), 2);
}

#[test]
fn door_open_suppresses_low_battery_reminder() {
    let (mut svc, led, mut sink) = make_service();
    svc.update(0, true, reading(BatteryLevel::Low), &led, &mut sink);
    assert_eq!(led.last(), Some(LedCall::Steady(YELLOW)));

    svc.update(60_000, true, reading(BatteryLevel::Low), &led, &mut sink);
    assert_eq!(led.count(), 1);
    assert_eq!(
        sink.count_where(|e| matches!(e, AppEvent::BatteryReminder(_))),
        0
    );
}

// ── End to end ────────────────────────────────────────────────

#[test]
fn service_drives_real_blink_controller() {
    let (c, hw) = controller();
    let mut svc = StatusService::new(&SystemConfig::default());
    let mut sink = LogSink::new();

    svc.update(0, false, reading(BatteryLevel::Ok), &c, &mut sink);
    assert_eq!(c.state(), BlinkState::Blinking);
    assert_eq!(hw.borrow().period_us, 250_000);

    // Door opens mid-blink: steady yellow replaces the acknowledgement.
    fire(&c, &hw);
    svc.update(10, true, reading(BatteryLevel::Ok), &c, &mut sink);
    assert_eq!(c.state(), BlinkState::Idle);
    assert_eq!(hw.borrow().last_shown(), Some(YELLOW));
    assert!(!fire(&c, &hw));

    svc.update(20, false, reading(BatteryLevel::Ok), &c, &mut sink);
    while fire(&c, &hw) {}
    assert_eq!(hw.borrow().last_shown(), Some(BLACK));
}
