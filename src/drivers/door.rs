//! Debounced door-jam switch.
//!
//! ## Hardware
//!
//! Closing switch to VCC with an external pull-down. The jam door holds the
//! switch closed, so a stable HIGH level means the door is shut.
//!
//! ## Debounce
//!
//! A level change is accepted only after it has been stable for the
//! configured debounce time. `process()` reports how long the switch has
//! been (stably) closed, in milliseconds; 0 while it is open.

use embedded_hal::digital::InputPin;
use log::debug;

use crate::error::{Result, SensorError};

pub struct DoorSwitch<P> {
    pin: P,
    debounce_ms: u32,
    stable_closed: bool,
    /// Raw level that differs from the stable one, and when it was first seen.
    candidate: Option<(bool, u32)>,
    closed_since_ms: u32,
}

impl<P: InputPin> DoorSwitch<P> {
    pub fn new(pin: P, debounce_ms: u32) -> Self {
        Self {
            pin,
            debounce_ms,
            stable_closed: false,
            candidate: None,
            closed_since_ms: 0,
        }
    }

    /// Sample the switch and return the debounced on-time in ms.
    pub fn process(&mut self, now_ms: u32) -> Result<u32> {
        let raw_closed = self
            .pin
            .is_high()
            .map_err(|_| SensorError::GpioReadFailed)?;

        if raw_closed == self.stable_closed {
            self.candidate = None;
        } else {
            match self.candidate {
                Some((level, since)) if level == raw_closed => {
                    if now_ms.wrapping_sub(since) >= self.debounce_ms {
                        self.stable_closed = raw_closed;
                        self.candidate = None;
                        if raw_closed {
                            self.closed_since_ms = since;
                        }
                        debug!(
                            "door: switch {}",
                            if raw_closed { "closed" } else { "opened" }
                        );
                    }
                }
                _ => self.candidate = Some((raw_closed, now_ms)),
            }
        }

        if self.stable_closed {
            // A freshly closed switch reports at least 1ms so that "closed"
            // and "on time > 0" stay equivalent.
            Ok(now_ms.wrapping_sub(self.closed_since_ms).max(1))
        } else {
            Ok(0)
        }
    }

    /// `true` unless the switch has been stably closed.
    pub fn is_open(&mut self, now_ms: u32) -> Result<bool> {
        Ok(self.process(now_ms)? == 0)
    }
}
