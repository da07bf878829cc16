//! LiPo pack voltage monitor.
//!
//! Reads the divided pack voltage through an ADC channel, undoes the
//! divider, and classifies the per-cell voltage against the configured
//! low/minimum thresholds. The cell count is detected once from the first
//! reading, assuming a pack is never charged above 4.2 V per cell.
//!
//! A short ring buffer smooths ADC noise before classification.

use log::info;

use crate::app::ports::AnalogInput;
use crate::config::{ANALOG_FULL_SCALE, SystemConfig};
use crate::error::Result;

/// Highest voltage a healthy LiPo cell reaches (mV).
pub const CELL_FULL_MV: u32 = 4200;

const RING_BUF_CAP: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryLevel {
    Ok,
    /// Below the warning voltage, still usable.
    Low,
    /// Below the minimum voltage; stop drawing current.
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    pub pack_mv: u32,
    pub cells: u8,
    pub level: BatteryLevel,
}

pub struct BatteryMonitor<A> {
    input: A,
    min_cell_mv: u32,
    low_cell_mv: u32,
    divider_ratio: f32,
    adc_reference_mv: u32,
    cells: Option<u8>,
    ring: [u32; RING_BUF_CAP],
    head: usize,
    count: usize,
}

impl<A: AnalogInput> BatteryMonitor<A> {
    pub fn new(input: A, config: &SystemConfig) -> Self {
        Self {
            input,
            min_cell_mv: config.min_cell_mv,
            low_cell_mv: config.low_cell_mv,
            divider_ratio: config.voltage_divider_ratio,
            adc_reference_mv: config.adc_reference_mv,
            cells: None,
            ring: [0; RING_BUF_CAP],
            head: 0,
            count: 0,
        }
    }

    pub fn read(&mut self) -> Result<BatteryReading> {
        let raw = self.input.read()?.min(ANALOG_FULL_SCALE);
        let sample_mv = self.raw_to_pack_mv(raw);

        self.ring[self.head] = sample_mv;
        self.head = (self.head + 1) % RING_BUF_CAP;
        if self.count < RING_BUF_CAP {
            self.count += 1;
        }
        let pack_mv = self.running_average();

        let cells = match self.cells {
            Some(cells) => cells,
            None => {
                let cells = cell_count(pack_mv);
                info!("battery: detected {}S pack at {}mV", cells, pack_mv);
                self.cells = Some(cells);
                cells
            }
        };

        Ok(BatteryReading {
            pack_mv,
            cells,
            level: self.classify(pack_mv, cells),
        })
    }

    pub fn cells(&self) -> Option<u8> {
        self.cells
    }

    fn raw_to_pack_mv(&self, raw: u16) -> u32 {
        let adc_mv = u32::from(raw) * self.adc_reference_mv / u32::from(ANALOG_FULL_SCALE);
        (adc_mv as f32 * self.divider_ratio) as u32
    }

    fn running_average(&self) -> u32 {
        if self.count == 0 {
            return 0;
        }
        let sum: u32 = self.ring[..self.count].iter().sum();
        sum / self.count as u32
    }

    fn classify(&self, pack_mv: u32, cells: u8) -> BatteryLevel {
        let cells = u32::from(cells);
        if pack_mv < self.min_cell_mv.saturating_mul(cells) {
            BatteryLevel::Critical
        } else if pack_mv < self.low_cell_mv.saturating_mul(cells) {
            BatteryLevel::Low
        } else {
            BatteryLevel::Ok
        }
    }
}

/// Smallest cell count whose full-charge voltage covers `pack_mv`.
pub fn cell_count(pack_mv: u32) -> u8 {
    pack_mv.div_ceil(CELL_FULL_MV).clamp(1, u32::from(u8::MAX)) as u8
}
