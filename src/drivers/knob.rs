//! Two-mode control knob.
//!
//! One potentiometer controls two settings, one at a time. Turning the
//! knob fully up (to or above the change threshold) enters change mode;
//! turning it back down flips between mode 1 and mode 2. The caller reads
//! the raw control value alongside the mode to decide which setting it
//! adjusts.
//!
//! | Knob event                     | Effect                         |
//! |--------------------------------|--------------------------------|
//! | rises to >= threshold          | enter change mode, both LEDs on|
//! | falls below threshold          | flip mode, leave change mode   |
//! | anything else                  | current mode LED on            |

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::AnalogInput;
use crate::config::ANALOG_FULL_SCALE;
use crate::error::{Result, SensorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobMode {
    One,
    Two,
}

impl KnobMode {
    fn flipped(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

pub struct ControlKnob<A, O> {
    input: A,
    mode1_signal: O,
    mode2_signal: O,
    inverted: bool,
    threshold: u16,
    mode: KnobMode,
    in_change_mode: bool,
    previous_value: u16,
}

impl<A: AnalogInput, O: OutputPin> ControlKnob<A, O> {
    pub fn new(input: A, mode1_signal: O, mode2_signal: O, inverted: bool, threshold: u16) -> Self {
        Self {
            input,
            mode1_signal,
            mode2_signal,
            inverted,
            threshold,
            mode: KnobMode::One,
            in_change_mode: false,
            previous_value: 0,
        }
    }

    /// Initial read so the signal LEDs reflect the knob position right away.
    pub fn begin(&mut self) -> Result<u16> {
        self.mode = KnobMode::One;
        self.previous_value = 0;
        self.check_for_new_mode()
    }

    /// Read the knob, update the mode, refresh the signal LEDs.
    ///
    /// Returns the current control value (0–1023). Does not block; pace the
    /// calls from the polling loop.
    pub fn check_for_new_mode(&mut self) -> Result<u16> {
        let value = self.read_control_value()?;

        if value >= self.threshold && self.previous_value < self.threshold {
            self.in_change_mode = true;
            debug!("knob: change mode entered");
        } else if value < self.threshold && self.previous_value >= self.threshold {
            self.mode = self.mode.flipped();
            self.in_change_mode = false;
            debug!("knob: mode -> {:?}", self.mode);
        }

        self.previous_value = value;
        self.refresh_mode_display()?;
        Ok(value)
    }

    pub fn mode(&self) -> KnobMode {
        self.mode
    }

    pub fn in_change_mode(&self) -> bool {
        self.in_change_mode
    }

    fn read_control_value(&mut self) -> Result<u16> {
        let raw = self.input.read()?.min(ANALOG_FULL_SCALE);
        Ok(if self.inverted {
            ANALOG_FULL_SCALE - raw
        } else {
            raw
        })
    }

    fn refresh_mode_display(&mut self) -> Result<()> {
        let (one, two) = if self.in_change_mode {
            (true, true)
        } else {
            (self.mode == KnobMode::One, self.mode == KnobMode::Two)
        };
        self.mode1_signal
            .set_state(one.into())
            .map_err(|_| SensorError::GpioWriteFailed)?;
        self.mode2_signal
            .set_state(two.into())
            .map_err(|_| SensorError::GpioWriteFailed)?;
        Ok(())
    }
}
