//! Timer-driven blink controller for the single-pixel status indicator.
//!
//! A blink request is split into half-cycles: even indices light the pixel
//! in the requested colour, odd indices turn it off. The periodic timer is
//! the only driver; every tick advances one half-cycle and the tick after
//! the last one stops the timer.
//!
//! ```text
//!            start_blink               light_steady / start_blink
//!   ┌──────┐ ─────────────▶ ┌──────────┐ ─────────────────────────▶ (cancel)
//!   │ Idle │                │ Blinking │
//!   └──────┘ ◀───────────── └──────────┘
//!        ▲   last half-cycle done (on_tick)
//!        └── light_steady (direct, no timer)
//! ```
//!
//! ## Concurrency
//!
//! `on_tick` runs from the timer's callback context and preempts the main
//! line. The pixel, the timer and the session live in one
//! `critical_section::Mutex`, and every operation runs to completion inside
//! a single critical section, so a tick never sees a half-written session.
//! Cancelling always stops and detaches the timer before the new session is
//! written.

use core::cell::RefCell;

use critical_section::Mutex;
use log::{debug, info, trace};

use crate::app::ports::{BlinkPort, IndicatorPort, TickHandler, TimerPort};
use crate::drivers::colour::{BLACK, PackedRgb};

/// Period programmed by [`BlinkController::initialize`].
pub const DEFAULT_PERIOD_MS: u32 = 500;

/// Controller state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkState {
    Idle,
    Blinking,
}

/// One blink request and its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlinkSession {
    pub period_ms: u32,
    /// Always `2 * repeat_count`.
    pub total_half_cycles: u32,
    pub current_half_cycle: u32,
    pub colour: PackedRgb,
}

impl BlinkSession {
    fn new(period_ms: u32, repeat_count: u16, colour: PackedRgb) -> Self {
        Self {
            period_ms,
            total_half_cycles: 2 * u32::from(repeat_count),
            current_half_cycle: 0,
            colour,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_half_cycle >= self.total_half_cycles
    }

    fn half_cycle_colour(&self) -> PackedRgb {
        if self.current_half_cycle % 2 == 0 {
            self.colour
        } else {
            BLACK
        }
    }
}

struct Shared<P, T> {
    pixel: P,
    timer: T,
    session: BlinkSession,
    timer_active: bool,
}

impl<P, T: TimerPort> Shared<P, T> {
    fn cancel(&mut self) {
        self.timer.stop();
        self.timer.detach_handler();
        self.timer_active = false;
    }
}

/// Owns the indicator and the blink timer.
///
/// Construct once at start-up, call [`initialize`](Self::initialize), and
/// route the timer's tick handler to [`on_tick`](Self::on_tick).
pub struct BlinkController<P, T> {
    shared: Mutex<RefCell<Shared<P, T>>>,
    on_tick: TickHandler,
    default_period_ms: u32,
}

impl<P: IndicatorPort, T: TimerPort> BlinkController<P, T> {
    /// `on_tick` is the handler attached to the timer for every session; it
    /// must end up calling [`Self::on_tick`] on this instance.
    pub const fn new(pixel: P, timer: T, on_tick: TickHandler) -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                pixel,
                timer,
                session: BlinkSession {
                    period_ms: DEFAULT_PERIOD_MS,
                    total_half_cycles: 0,
                    current_half_cycle: 0,
                    colour: BLACK,
                },
                timer_active: false,
            })),
            on_tick,
            default_period_ms: DEFAULT_PERIOD_MS,
        }
    }

    /// Override the period programmed by [`Self::initialize`].
    #[must_use]
    pub fn with_default_period(mut self, period_ms: u32) -> Self {
        self.default_period_ms = period_ms;
        self
    }

    /// Turn the pixel off and configure the timer, leaving it stopped.
    pub fn initialize(&self) {
        critical_section::with(|cs| {
            let mut s = self.shared.borrow_ref_mut(cs);
            s.pixel.set_colour(BLACK);
            s.pixel.show();
            s.timer.initialize(period_us(self.default_period_ms));
            s.timer.stop();
        });
        info!(
            "blink: initialised (default period {}ms)",
            self.default_period_ms
        );
    }

    /// Blink `repeat_count` times, each on and off phase lasting
    /// `period_ms`. Cancels any running session first.
    ///
    /// With `repeat_count == 0` the first tick finds nothing to do and
    /// stops the timer; the pixel is never lit.
    pub fn start_blink(&self, period_ms: u32, repeat_count: u16, colour: PackedRgb) {
        debug_assert!(period_ms > 0, "blink period must be non-zero");
        critical_section::with(|cs| {
            let mut s = self.shared.borrow_ref_mut(cs);
            if s.timer_active {
                s.cancel();
            }
            s.session = BlinkSession::new(period_ms, repeat_count, colour);
            s.timer.set_period(period_us(period_ms));
            s.timer.attach_handler(self.on_tick);
            s.timer.start();
            s.timer_active = true;
        });
        debug!(
            "blink: {} half-cycles of {}ms, colour=0x{:06X}",
            2 * u32::from(repeat_count),
            period_ms,
            colour
        );
    }

    /// Light the pixel steadily. Cancels any running session without a
    /// completion signal; black turns the pixel off.
    pub fn light_steady(&self, colour: PackedRgb) {
        let cancelled = critical_section::with(|cs| {
            let mut s = self.shared.borrow_ref_mut(cs);
            let was_active = s.timer_active;
            if was_active {
                s.cancel();
            }
            s.pixel.set_colour(colour);
            s.pixel.show();
            was_active
        });
        if cancelled {
            debug!("blink: session cancelled by steady light");
        }
        debug!("blink: steady colour=0x{:06X}", colour);
    }

    /// Advance the running session by one half-cycle.
    ///
    /// Safe to call from the timer callback. Ticks arriving while idle are
    /// ignored.
    pub fn on_tick(&self) {
        critical_section::with(|cs| {
            let mut s = self.shared.borrow_ref_mut(cs);
            if !s.timer_active {
                return;
            }
            if s.session.is_complete() {
                s.cancel();
                trace!("blink: half-cycle limit reached, timer stopped");
                return;
            }
            let colour = s.session.half_cycle_colour();
            s.pixel.set_colour(colour);
            s.pixel.show();
            s.session.current_half_cycle += 1;
            trace!(
                "blink: half-cycle {} of {}",
                s.session.current_half_cycle,
                s.session.total_half_cycles
            );
        });
    }

    pub fn state(&self) -> BlinkState {
        if critical_section::with(|cs| self.shared.borrow_ref(cs).timer_active) {
            BlinkState::Blinking
        } else {
            BlinkState::Idle
        }
    }

    /// Snapshot of the current (or last) session.
    pub fn session(&self) -> BlinkSession {
        critical_section::with(|cs| self.shared.borrow_ref(cs).session)
    }

    /// Tear down: stop the timer and hand the hardware back.
    pub fn release(self) -> (P, T) {
        let mut s = self.shared.into_inner().into_inner();
        if s.timer_active {
            s.cancel();
        }
        (s.pixel, s.timer)
    }
}

impl<P: IndicatorPort, T: TimerPort> BlinkPort for BlinkController<P, T> {
    fn start_blink(&self, period_ms: u32, repeat_count: u16, colour: PackedRgb) {
        BlinkController::start_blink(self, period_ms, repeat_count, colour);
    }

    fn light_steady(&self, colour: PackedRgb) {
        BlinkController::light_steady(self, colour);
    }

    fn is_blinking(&self) -> bool {
        self.state() == BlinkState::Blinking
    }
}

fn period_us(period_ms: u32) -> u32 {
    period_ms.saturating_mul(1000)
}
