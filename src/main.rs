//! slipom: LiPo pack and jam-door monitor.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  DoorSwitch (GPIO7)     BatteryMonitor (ADC1)                │
//! │          └──────────┬──────────┘                             │
//! │                     ▼                                        │
//! │              StatusService ──▶ LogEventSink                  │
//! │                     │                                        │
//! │                     ▼                                        │
//! │   BlinkController ◀── esp_timer tick (timer task)            │
//! │          │                                                   │
//! │          ▼                                                   │
//! │   NeoPixel (RMT ch0, GPIO5)                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use log::{error, info, warn};
use ws2812_esp32_rmt_driver::Ws2812Esp32Rmt;

use sketchbook::adapters::hardware::AdcChannel;
use sketchbook::adapters::log_sink::LogEventSink;
use sketchbook::adapters::nvs::{NvsConfigStore, load_or_default};
use sketchbook::adapters::time::Esp32TimeAdapter;
use sketchbook::app::service::StatusService;
use sketchbook::config::SystemConfig;
use sketchbook::drivers::blink::BlinkController;
use sketchbook::drivers::door::DoorSwitch;
use sketchbook::drivers::hw_init;
use sketchbook::drivers::hw_timer::BlinkTimer;
use sketchbook::drivers::pixel::NeoPixel;
use sketchbook::sensors::battery::BatteryMonitor;

type Indicator = BlinkController<NeoPixel<Ws2812Esp32Rmt<'static>>, BlinkTimer>;

static INDICATOR: OnceLock<Indicator> = OnceLock::new();

fn indicator_tick() {
    if let Some(indicator) = INDICATOR.get() {
        indicator.on_tick();
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  slipom v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 2. Config ─────────────────────────────────────────────
    let config = match NvsConfigStore::new() {
        Ok(store) => load_or_default(&store),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            SystemConfig::default()
        }
    };

    // ── 3. Indicator ──────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let strip = Ws2812Esp32Rmt::new(peripherals.rmt.channel0, peripherals.pins.gpio5)?;
    let indicator = INDICATOR.get_or_init(|| {
        BlinkController::new(NeoPixel::new(strip), BlinkTimer::new(), indicator_tick)
            .with_default_period(config.blink_default_period_ms)
    });
    indicator.initialize();

    // ── 4. Inputs ─────────────────────────────────────────────
    let mut door_pin = PinDriver::input(peripherals.pins.gpio7)?;
    door_pin.set_pull(Pull::Down)?;
    let mut door = DoorSwitch::new(door_pin, config.door_debounce_ms);
    let mut battery = BatteryMonitor::new(AdcChannel::voltage(), &config);

    let clock = Esp32TimeAdapter::new();
    let mut service = StatusService::new(&config);
    let mut sink = LogEventSink::new();

    let mut reading = battery.read()?;
    let mut last_battery_ms = clock.uptime_ms();
    info!(
        "Boot complete: {}mV ({}S), polling every {}ms",
        reading.pack_mv, reading.cells, config.poll_interval_ms
    );

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        let now = clock.uptime_ms();

        if now.wrapping_sub(last_battery_ms) >= config.battery_sample_interval_ms {
            last_battery_ms = now;
            match battery.read() {
                Ok(r) => reading = r,
                Err(e) => warn!("battery read failed: {}", e),
            }
        }

        match door.is_open(now) {
            Ok(open) => {
                service.update(now, open, reading, indicator, &mut sink);
            }
            Err(e) => warn!("door read failed: {}", e),
        }

        std::thread::sleep(Duration::from_millis(u64::from(config.poll_interval_ms)));
    }
}
