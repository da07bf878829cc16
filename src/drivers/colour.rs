//! Packed-RGB colour values for the NeoPixel indicator.
//!
//! The indicator API takes a single `u32` per colour, laid out as
//! `0x00RRGGBB`, the same packing the NeoPixel library uses. Wire order
//! (GRB for WS2812) is the pixel driver's concern, not ours.

use smart_leds::RGB8;

/// Single-integer colour encoding understood by [`IndicatorPort`](crate::app::ports::IndicatorPort).
pub type PackedRgb = u32;

/// Pixel off.
pub const BLACK: PackedRgb = 0;

/// Combine three 0–255 channel values into one packed colour.
pub const fn compose_colour(r: u8, g: u8, b: u8) -> PackedRgb {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split a packed colour back into channels for the LED driver.
pub const fn unpack(colour: PackedRgb) -> RGB8 {
    RGB8 {
        r: (colour >> 16) as u8,
        g: (colour >> 8) as u8,
        b: colour as u8,
    }
}

// ── Well-known colours ────────────────────────────────────────

pub const RED: PackedRgb = compose_colour(255, 0, 0);
pub const GREEN: PackedRgb = compose_colour(0, 255, 0);
pub const BLUE: PackedRgb = compose_colour(0, 0, 255);
pub const YELLOW: PackedRgb = compose_colour(255, 200, 0);
pub const ORANGE: PackedRgb = compose_colour(255, 80, 0);
pub const WHITE: PackedRgb = compose_colour(255, 255, 255);
