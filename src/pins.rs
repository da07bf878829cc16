//! GPIO / ADC pin assignments for the ESP32-S3 carrier boards.
//!
//! | Signal          | GPIO | Peripheral | Device    |
//! |-----------------|------|------------|-----------|
//! | NeoPixel data   | 5    | RMT CH0    | both      |
//! | Pack voltage    | 3    | ADC1 CH2   | slipom    |
//! | Door switch     | 7    | input      | slipom    |
//! | Knob wiper      | 1    | ADC1 CH0   | warpdrive |
//! | Mode 1 signal   | 10   | output     | warpdrive |
//! | Mode 2 signal   | 11   | output     | warpdrive |
//!
//! Digital pins are taken as typed `esp-idf-hal` peripherals in the
//! binaries (`src/main.rs`, `src/bin/warpdrive.rs`), which are the source
//! of truth for them. Only the analog inputs, configured through raw ADC
//! calls, need numbers here.

/// Pack voltage divider tap.
pub const VOLTAGE_GPIO: i32 = 3;
pub const VOLTAGE_ADC_CHANNEL: u32 = 2;

/// Control knob wiper.
pub const KNOB_GPIO: i32 = 1;
pub const KNOB_ADC_CHANNEL: u32 = 0;
