//! Port traits: the boundary between device logic and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BlinkController / StatusService
//! ```
//!
//! Drivers consume these traits via generics, so every piece of device
//! logic runs on the host against recording doubles.

use crate::config::SystemConfig;
use crate::drivers::colour::PackedRgb;

// ───────────────────────────────────────────────────────────────
// Indicator port (single addressable pixel)
// ───────────────────────────────────────────────────────────────

/// One addressable light source. Index is implicitly 0.
pub trait IndicatorPort {
    /// Stage a colour; nothing changes on the wire until [`show`](Self::show).
    fn set_colour(&mut self, colour: PackedRgb);

    /// Flush the staged colour to the hardware.
    fn show(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Timer port (periodic alarm)
// ───────────────────────────────────────────────────────────────

/// Handler invoked on every timer period elapse.
pub type TickHandler = fn();

/// Process-wide periodic alarm. Periods are in microseconds.
///
/// The handler may run in interrupt (or timer-task) context, preempting
/// whatever called into the port.
pub trait TimerPort {
    fn initialize(&mut self, period_us: u32);
    fn set_period(&mut self, period_us: u32);
    fn attach_handler(&mut self, handler: TickHandler);
    fn detach_handler(&mut self);
    fn start(&mut self);
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Blink port (what the status service drives)
// ───────────────────────────────────────────────────────────────

/// Caller-facing indicator API, implemented by
/// [`BlinkController`](crate::drivers::blink::BlinkController).
pub trait BlinkPort {
    fn start_blink(&self, period_ms: u32, repeat_count: u16, colour: PackedRgb);
    fn light_steady(&self, colour: PackedRgb);
    fn is_blinking(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Analog input port
// ───────────────────────────────────────────────────────────────

/// A single ADC channel, normalised to a 10-bit reading (0–1023).
pub trait AnalogInput {
    fn read(&mut self) -> crate::error::Result<u16>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (device → logging)
// ───────────────────────────────────────────────────────────────

pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations validate before persisting and reject out-of-range
/// values with [`ConfigError::ValidationFailed`] rather than clamping.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for ConfigError {}
