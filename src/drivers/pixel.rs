//! Single NeoPixel behind the [`IndicatorPort`].
//!
//! Generic over any `smart_leds` writer; on ESP-IDF the writer is the RMT
//! WS2812 driver. `set_colour` only stages the value, `show` pushes it
//! out, matching the latch-then-flush model of the pixel hardware.

use log::warn;
use smart_leds::{RGB8, SmartLedsWrite};

use crate::app::ports::IndicatorPort;
use crate::drivers::colour::{BLACK, PackedRgb, unpack};

pub struct NeoPixel<W> {
    writer: W,
    staged: PackedRgb,
    shown: PackedRgb,
}

impl<W> NeoPixel<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: core::fmt::Debug,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            staged: BLACK,
            shown: BLACK,
        }
    }

    /// Last colour successfully written to the pixel.
    pub fn current_colour(&self) -> PackedRgb {
        self.shown
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> IndicatorPort for NeoPixel<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: core::fmt::Debug,
{
    fn set_colour(&mut self, colour: PackedRgb) {
        self.staged = colour;
    }

    fn show(&mut self) {
        match self.writer.write(core::iter::once(unpack(self.staged))) {
            Ok(()) => self.shown = self.staged,
            Err(e) => warn!("pixel: write failed: {:?}", e),
        }
    }
}
