//! Mock hardware for integration tests.
//!
//! The pixel and timer doubles append to one shared call log, so tests can
//! assert on the exact ordering of flushes and timer operations the blink
//! controller performs.

use std::cell::RefCell;
use std::rc::Rc;

use sketchbook::app::events::AppEvent;
use sketchbook::app::ports::{BlinkPort, EventSink, IndicatorPort, TickHandler, TimerPort};
use sketchbook::drivers::blink::BlinkController;
use sketchbook::drivers::colour::PackedRgb;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Show(PackedRgb),
    TimerInit { period_us: u32 },
    SetPeriod { period_us: u32 },
    Attach,
    Detach,
    Start,
    Stop,
}

#[derive(Debug, Default)]
pub struct HwState {
    pub calls: Vec<HwCall>,
    pub staged: PackedRgb,
    pub started: bool,
    pub attached: bool,
    pub period_us: u32,
}

#[allow(dead_code)]
impl HwState {
    /// The timer only delivers ticks while it is both started and has a
    /// handler attached.
    pub fn armed(&self) -> bool {
        self.started && self.attached
    }

    /// Every colour flushed to the pixel, oldest first.
    pub fn shown(&self) -> Vec<PackedRgb> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Show(colour) => Some(*colour),
                _ => None,
            })
            .collect()
    }

    pub fn last_shown(&self) -> Option<PackedRgb> {
        self.shown().last().copied()
    }

    pub fn stop_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == HwCall::Stop).count()
    }
}

pub type SharedHw = Rc<RefCell<HwState>>;

// ── MockPixel / MockTimer ─────────────────────────────────────

pub struct MockPixel(pub SharedHw);

impl IndicatorPort for MockPixel {
    fn set_colour(&mut self, colour: PackedRgb) {
        self.0.borrow_mut().staged = colour;
    }

    fn show(&mut self) {
        let mut hw = self.0.borrow_mut();
        let colour = hw.staged;
        hw.calls.push(HwCall::Show(colour));
    }
}

pub struct MockTimer(pub SharedHw);

impl TimerPort for MockTimer {
    fn initialize(&mut self, period_us: u32) {
        let mut hw = self.0.borrow_mut();
        hw.period_us = period_us;
        hw.calls.push(HwCall::TimerInit { period_us });
    }

    fn set_period(&mut self, period_us: u32) {
        let mut hw = self.0.borrow_mut();
        hw.period_us = period_us;
        hw.calls.push(HwCall::SetPeriod { period_us });
    }

    fn attach_handler(&mut self, _handler: TickHandler) {
        let mut hw = self.0.borrow_mut();
        hw.attached = true;
        hw.calls.push(HwCall::Attach);
    }

    fn detach_handler(&mut self) {
        let mut hw = self.0.borrow_mut();
        hw.attached = false;
        hw.calls.push(HwCall::Detach);
    }

    fn start(&mut self) {
        let mut hw = self.0.borrow_mut();
        hw.started = true;
        hw.calls.push(HwCall::Start);
    }

    fn stop(&mut self) {
        let mut hw = self.0.borrow_mut();
        hw.started = false;
        hw.calls.push(HwCall::Stop);
    }
}

pub type MockController = BlinkController<MockPixel, MockTimer>;

fn no_op_tick() {}

/// Initialised controller plus a handle on the shared hardware log.
pub fn controller() -> (MockController, SharedHw) {
    let hw = SharedHw::default();
    let c = BlinkController::new(MockPixel(hw.clone()), MockTimer(hw.clone()), no_op_tick);
    c.initialize();
    (c, hw)
}

/// Deliver one tick if the timer is armed, like the hardware would.
/// Returns whether a tick was delivered.
#[allow(dead_code)]
pub fn fire(c: &MockController, hw: &SharedHw) -> bool {
    let armed = hw.borrow().armed();
    if armed {
        c.on_tick();
    }
    armed
}

// ── RecordingLed (BlinkPort) ──────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCall {
    Blink {
        period_ms: u32,
        repeat_count: u16,
        colour: PackedRgb,
    },
    Steady(PackedRgb),
}

/// BlinkPort double: records requests and lets the test decide whether a
/// blink is still running.
#[derive(Default)]
pub struct RecordingLed {
    pub calls: RefCell<Vec<LedCall>>,
    pub blinking: std::cell::Cell<bool>,
}

#[allow(dead_code)]
impl RecordingLed {
    pub fn last(&self) -> Option<LedCall> {
        self.calls.borrow().last().copied()
    }

    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl BlinkPort for RecordingLed {
    fn start_blink(&self, period_ms: u32, repeat_count: u16, colour: PackedRgb) {
        self.calls.borrow_mut().push(LedCall::Blink {
            period_ms,
            repeat_count,
            colour,
        });
        self.blinking.set(repeat_count > 0);
    }

    fn light_steady(&self, colour: PackedRgb) {
        self.calls.borrow_mut().push(LedCall::Steady(colour));
        self.blinking.set(false);
    }

    fn is_blinking(&self) -> bool {
        self.blinking.get()
    }
}

// ── LogSink (EventSink) ───────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_where(&self, f: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| f(e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
