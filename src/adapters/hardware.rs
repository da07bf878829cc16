//! Hardware adapter: ADC channels behind the [`AnalogInput`] port.
//!
//! The 12-bit ESP32-S3 readings are normalised to the 10-bit range the
//! knob thresholds and battery maths are written against.

use crate::app::ports::AnalogInput;
use crate::drivers::hw_init;
use crate::error::{Result, SensorError};

/// One ADC1 channel configured by [`hw_init::init_peripherals`].
pub struct AdcChannel {
    channel: u32,
}

impl AdcChannel {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub fn voltage() -> Self {
        Self::new(hw_init::ADC1_CH_VOLTAGE)
    }

    pub fn knob() -> Self {
        Self::new(hw_init::ADC1_CH_KNOB)
    }
}

impl AnalogInput for AdcChannel {
    fn read(&mut self) -> Result<u16> {
        let raw = hw_init::adc1_read(self.channel).ok_or(SensorError::AdcReadFailed)?;
        Ok(raw >> 2)
    }
}
