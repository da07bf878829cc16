//! Knob-driven light policy for the warpdrive board.
//!
//! | Knob mode | Pixel colour                         |
//! |-----------|--------------------------------------|
//! | One       | white, brightness follows the knob   |
//! | Two       | red/blue mix, red grows with the knob|
//!
//! A mode switch is acknowledged with one short blink in the new mode's
//! colour; once that blink has finished the steady colour comes back.
//! While the knob sits in change mode the pixel is left alone.

use crate::config::ANALOG_FULL_SCALE;
use crate::drivers::colour::{PackedRgb, compose_colour};
use crate::drivers::knob::KnobMode;

use super::events::AppEvent;
use super::ports::{BlinkPort, EventSink};

/// Half-cycle length of the mode-switch acknowledgement.
pub const MODE_SWITCH_BLINK_MS: u32 = 150;

/// Scale a 10-bit knob value to an 8-bit channel.
pub fn to_channel(value: u16) -> u8 {
    (u32::from(value.min(ANALOG_FULL_SCALE)) * 255 / u32::from(ANALOG_FULL_SCALE)) as u8
}

/// Colour for the given mode and knob position.
pub fn colour_for(mode: KnobMode, value: u16) -> PackedRgb {
    let level = to_channel(value);
    match mode {
        KnobMode::One => compose_colour(level, level, level),
        KnobMode::Two => compose_colour(level, 0, 255 - level),
    }
}

pub struct KnobLights {
    mode: Option<KnobMode>,
    /// Colour currently held steady; `None` while a blink owns the pixel.
    shown: Option<PackedRgb>,
}

impl Default for KnobLights {
    fn default() -> Self {
        Self::new()
    }
}

impl KnobLights {
    pub fn new() -> Self {
        Self {
            mode: None,
            shown: None,
        }
    }

    /// Fold in the latest knob reading and drive the pixel.
    pub fn update(
        &mut self,
        mode: KnobMode,
        value: u16,
        in_change_mode: bool,
        led: &impl BlinkPort,
        sink: &mut impl EventSink,
    ) {
        let switched = self.mode.is_some_and(|prev| prev != mode);
        self.mode = Some(mode);

        if switched {
            sink.emit(&AppEvent::KnobModeChanged { mode, value });
            led.start_blink(MODE_SWITCH_BLINK_MS, 1, colour_for(mode, value));
            self.shown = None;
            return;
        }

        if in_change_mode || led.is_blinking() {
            return;
        }

        let colour = colour_for(mode, value);
        if self.shown != Some(colour) {
            led.light_steady(colour);
            self.shown = Some(colour);
        }
    }
}
