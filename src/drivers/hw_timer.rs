//! Blink timer backed by ESP-IDF's esp_timer API.
//!
//! One periodic esp_timer whose callback dispatches to the attached
//! [`TickHandler`]. Callbacks execute in the ESP timer task context (not
//! ISR), so the handler may take the blink controller's critical section
//! and flush the pixel.
//!
//! On host targets the timer only tracks its state; [`BlinkTimer::fire`]
//! stands in for a period elapsing.

use core::cell::Cell;

use critical_section::Mutex;

use crate::app::ports::{TickHandler, TimerPort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Handler the esp_timer callback dispatches to. Only one blink timer
/// exists per process, so a single slot is enough.
static TICK_HANDLER: Mutex<Cell<Option<TickHandler>>> = Mutex::new(Cell::new(None));

fn dispatch_tick() {
    let handler = critical_section::with(|cs| TICK_HANDLER.borrow(cs).get());
    if let Some(handler) = handler {
        handler();
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn blink_timer_cb(_arg: *mut core::ffi::c_void) {
    dispatch_tick();
}

pub struct BlinkTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    period_us: u32,
    running: bool,
}

// SAFETY: the esp_timer handle is an opaque token; every esp_timer_* call
// made through it is thread-safe per the ESP-IDF documentation.
#[cfg(target_os = "espidf")]
unsafe impl Send for BlinkTimer {}

impl Default for BlinkTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkTimer {
    pub const fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            handle: core::ptr::null_mut(),
            period_us: 0,
            running: false,
        }
    }

    pub fn period_us(&self) -> u32 {
        self.period_us
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Simulate one period elapsing: runs the attached handler if the timer
    /// is running.
    #[cfg(not(target_os = "espidf"))]
    pub fn fire(&self) {
        if self.running {
            dispatch_tick();
        }
    }

    #[cfg(target_os = "espidf")]
    fn create(&mut self) {
        if !self.handle.is_null() {
            return;
        }
        let args = esp_timer_create_args_t {
            callback: Some(blink_timer_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"blink".as_ptr(),
            skip_unhandled_events: true,
        };
        // SAFETY: handle is written once here from the owning context; the
        // callback does not touch it.
        let ret = unsafe { esp_timer_create(&args, &mut self.handle) };
        if ret != ESP_OK {
            log::error!("hw_timer: blink timer create failed (rc={})", ret);
            self.handle = core::ptr::null_mut();
        }
    }

    #[cfg(target_os = "espidf")]
    fn arm(&mut self) {
        if self.handle.is_null() {
            return;
        }
        // SAFETY: handle is a live esp_timer created in `create()`.
        let ret = unsafe { esp_timer_start_periodic(self.handle, u64::from(self.period_us)) };
        if ret != ESP_OK {
            log::error!("hw_timer: blink timer start failed (rc={})", ret);
        }
    }

    #[cfg(target_os = "espidf")]
    fn disarm(&mut self) {
        if self.handle.is_null() {
            return;
        }
        // SAFETY: handle is a live esp_timer; stopping an idle timer only
        // returns ESP_ERR_INVALID_STATE.
        let ret = unsafe { esp_timer_stop(self.handle) };
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE as i32 {
            log::warn!("hw_timer: blink timer stop failed (rc={})", ret);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn create(&mut self) {}

    #[cfg(not(target_os = "espidf"))]
    fn arm(&mut self) {}

    #[cfg(not(target_os = "espidf"))]
    fn disarm(&mut self) {}
}

impl TimerPort for BlinkTimer {
    fn initialize(&mut self, period_us: u32) {
        self.create();
        self.period_us = period_us;
        self.disarm();
        self.arm();
        self.running = true;
        log::info!("hw_timer: blink timer ready ({}us)", period_us);
    }

    fn set_period(&mut self, period_us: u32) {
        self.period_us = period_us;
        if self.running {
            self.disarm();
            self.arm();
        }
    }

    fn attach_handler(&mut self, handler: TickHandler) {
        critical_section::with(|cs| TICK_HANDLER.borrow(cs).set(Some(handler)));
    }

    fn detach_handler(&mut self) {
        critical_section::with(|cs| TICK_HANDLER.borrow(cs).set(None));
    }

    fn start(&mut self) {
        self.disarm();
        self.arm();
        self.running = true;
    }

    fn stop(&mut self) {
        self.disarm();
        self.running = false;
    }
}
