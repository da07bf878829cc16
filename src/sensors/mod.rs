//! Analog sensors.

pub mod battery;
