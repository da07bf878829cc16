//! warpdrive: two-setting light controller on one knob.
//!
//! Mode 1 sets the white brightness, mode 2 mixes red against blue. A
//! full turn of the knob switches modes; the two signal LEDs show which
//! setting is live, and the pixel blinks once in the new mode's colour to
//! acknowledge the switch. The light policy lives in
//! [`sketchbook::app::knob_lights`].
#![deny(unused_must_use)]

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::gpio::{OutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use log::{error, info, warn};
use ws2812_esp32_rmt_driver::Ws2812Esp32Rmt;

use sketchbook::adapters::hardware::AdcChannel;
use sketchbook::adapters::log_sink::LogEventSink;
use sketchbook::adapters::nvs::{NvsConfigStore, load_or_default};
use sketchbook::app::knob_lights::KnobLights;
use sketchbook::config::SystemConfig;
use sketchbook::drivers::blink::BlinkController;
use sketchbook::drivers::hw_init;
use sketchbook::drivers::hw_timer::BlinkTimer;
use sketchbook::drivers::knob::ControlKnob;
use sketchbook::drivers::pixel::NeoPixel;

type Indicator = BlinkController<NeoPixel<Ws2812Esp32Rmt<'static>>, BlinkTimer>;

static INDICATOR: OnceLock<Indicator> = OnceLock::new();

fn indicator_tick() {
    if let Some(indicator) = INDICATOR.get() {
        indicator.on_tick();
    }
}

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("warpdrive v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let config = match NvsConfigStore::new() {
        Ok(store) => load_or_default(&store),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            SystemConfig::default()
        }
    };

    let peripherals = Peripherals::take()?;
    let strip = Ws2812Esp32Rmt::new(peripherals.rmt.channel0, peripherals.pins.gpio5)?;
    let indicator = INDICATOR.get_or_init(|| {
        BlinkController::new(NeoPixel::new(strip), BlinkTimer::new(), indicator_tick)
            .with_default_period(config.blink_default_period_ms)
    });
    indicator.initialize();

    let mode1 = PinDriver::output(peripherals.pins.gpio10.downgrade_output())?;
    let mode2 = PinDriver::output(peripherals.pins.gpio11.downgrade_output())?;
    let mut knob = ControlKnob::new(
        AdcChannel::knob(),
        mode1,
        mode2,
        config.knob_inverted,
        config.knob_change_threshold,
    );
    let mut sink = LogEventSink::new();
    let mut lights = KnobLights::new();

    let value = knob.begin()?;
    lights.update(knob.mode(), value, knob.in_change_mode(), indicator, &mut sink);
    info!("Boot complete: mode {:?}, value {}", knob.mode(), value);

    loop {
        std::thread::sleep(Duration::from_millis(u64::from(config.poll_interval_ms)));

        match knob.check_for_new_mode() {
            Ok(value) => {
                lights.update(knob.mode(), value, knob.in_change_mode(), indicator, &mut sink);
            }
            Err(e) => warn!("knob read failed: {}", e),
        }
    }
}
