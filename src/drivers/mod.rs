//! Indicator, input drivers, and peripheral helpers.

pub mod blink;
pub mod colour;
pub mod door;
pub mod hw_init;
pub mod hw_timer;
pub mod knob;
pub mod pixel;
