//! Device core: pure logic, zero I/O.
//!
//! Status decisions for the monitor live here. All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer testable without real peripherals.

pub mod events;
pub mod knob_lights;
pub mod ports;
pub mod service;
