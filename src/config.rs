//! System configuration parameters
//!
//! All tunable parameters for both devices. Defaults match the bench
//! hardware; values can be overridden through NVS
//! (see [`crate::adapters::nvs::NvsConfigStore`]).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Full scale of the normalised 10-bit analog reading.
pub const ANALOG_FULL_SCALE: u16 = 1023;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Indicator ---
    /// Timer period programmed by `BlinkController::initialize` (ms)
    pub blink_default_period_ms: u32,

    // --- Door switch ---
    /// Time a level must be stable before it is accepted (ms)
    pub door_debounce_ms: u32,

    // --- Battery ---
    /// Per-cell voltage below which the pack is critical (mV)
    pub min_cell_mv: u32,
    /// Per-cell voltage below which the pack starts warning (mV)
    pub low_cell_mv: u32,
    /// Multiplier undoing the voltage divider in front of the ADC
    pub voltage_divider_ratio: f32,
    /// Voltage corresponding to a full-scale ADC reading (mV)
    pub adc_reference_mv: u32,

    // --- Control knob ---
    /// Control value at or above which the knob enters change mode
    pub knob_change_threshold: u16,
    /// Reverse the knob direction in software
    pub knob_inverted: bool,

    // --- Timing ---
    /// Main loop poll interval (ms)
    pub poll_interval_ms: u32,
    /// Battery sample interval (ms)
    pub battery_sample_interval_ms: u32,
    /// Repeat the low-battery blink this often while the pack stays low (s)
    pub low_battery_reminder_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Indicator
            blink_default_period_ms: 500,

            // Door
            door_debounce_ms: 20,

            // Battery
            min_cell_mv: 3000,
            low_cell_mv: 3300,
            voltage_divider_ratio: 1.0 / 0.357,
            adc_reference_mv: 3300,

            // Knob
            knob_change_threshold: 1015,
            knob_inverted: false,

            // Timing
            poll_interval_ms: 10,
            battery_sample_interval_ms: 1000,
            low_battery_reminder_secs: 30,
        }
    }
}

impl SystemConfig {
    /// Reject values that would make a device misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.blink_default_period_ms == 0 {
            return Err(Error::Config("blink_default_period_ms must be > 0"));
        }
        if self.door_debounce_ms == 0 {
            return Err(Error::Config("door_debounce_ms must be > 0"));
        }
        if self.low_cell_mv <= self.min_cell_mv {
            return Err(Error::Config("low_cell_mv must exceed min_cell_mv"));
        }
        if self.voltage_divider_ratio.is_nan() || self.voltage_divider_ratio <= 0.0 {
            return Err(Error::Config("voltage_divider_ratio must be positive"));
        }
        if self.adc_reference_mv == 0 {
            return Err(Error::Config("adc_reference_mv must be > 0"));
        }
        if self.knob_change_threshold == 0 || self.knob_change_threshold > ANALOG_FULL_SCALE {
            return Err(Error::Config("knob_change_threshold out of range"));
        }
        if self.poll_interval_ms == 0 || self.battery_sample_interval_ms == 0 {
            return Err(Error::Config("poll intervals must be > 0"));
        }
        Ok(())
    }
}
