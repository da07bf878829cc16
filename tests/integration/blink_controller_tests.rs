//! Integration tests for the blink controller against recording pixel and
//! timer doubles.
//!
//! Ticks are delivered through [`fire`], which only calls into the
//! controller while the mock timer is started with a handler attached.

use crate::mock_hw::{HwCall, controller, fire};

use sketchbook::drivers::blink::{BlinkSession, BlinkState};
use sketchbook::drivers::colour::{BLACK, BLUE, GREEN, RED, compose_colour};

// ── Initialisation ────────────────────────────────────────────

#[test]
fn initialize_blanks_pixel_and_parks_timer() {
    let (c, hw) = controller();
    assert_eq!(
        hw.borrow().calls,
        vec![
            HwCall::Show(BLACK),
            HwCall::TimerInit { period_us: 500_000 },
            HwCall::Stop,
        ]
    );
    assert!(!hw.borrow().armed());
    assert_eq!(c.state(), BlinkState::Idle);
    assert!(!fire(&c, &hw), "no ticks before the first blink");
}

// ── Blink sequence ────────────────────────────────────────────

#[test]
fn red_blink_three_times_at_500ms() {
    let (c, hw) = controller();
    c.start_blink(500, 3, compose_colour(255, 0, 0));
    assert_eq!(hw.borrow().period_us, 500_000);
    assert!(hw.borrow().armed());

    for _ in 0..6 {
        assert!(fire(&c, &hw));
    }
    assert_eq!(
        hw.borrow().shown()[1..],
        [RED, BLACK, RED, BLACK, RED, BLACK]
    );

    // The 7th tick lands on a finished session: no colour change, timer off.
    let shows_before = hw.borrow().shown().len();
    assert!(fire(&c, &hw));
    assert_eq!(hw.borrow().shown().len(), shows_before);
    assert_eq!(hw.borrow().last_shown(), Some(BLACK));
    assert_eq!(c.state(), BlinkState::Idle);
    assert!(!hw.borrow().armed());
    assert!(!fire(&c, &hw), "timer already stopped");
}

#[test]
fn sequence_length_tracks_repeat_count() {
    for repeats in 1..=6u16 {
        let (c, hw) = controller();
        c.start_blink(100, repeats, GREEN);

        let mut ticks = 0;
        while fire(&c, &hw) {
            ticks += 1;
            assert!(ticks <= 100, "timer never stopped for {} repeats", repeats);
        }

        let shown = hw.borrow().shown();
        let blink = &shown[1..];
        assert_eq!(blink.len(), 2 * usize::from(repeats));
        for (i, colour) in blink.iter().enumerate() {
            let expected = if i % 2 == 0 { GREEN } else { BLACK };
            assert_eq!(*colour, expected, "half-cycle {} of {} repeats", i, repeats);
        }
        assert_eq!(ticks, 2 * u32::from(repeats) + 1);
        assert_eq!(c.state(), BlinkState::Idle);
    }
}

#[test]
fn zero_repeats_stop_after_one_tick_without_lighting() {
    let (c, hw) = controller();
    c.start_blink(100, 0, BLUE);
    assert_eq!(c.state(), BlinkState::Blinking);

    assert!(fire(&c, &hw));
    assert_eq!(hw.borrow().shown(), vec![BLACK], "only the init flush");
    assert_eq!(c.state(), BlinkState::Idle);
    assert!(!fire(&c, &hw));
}

// ── Steady light ──────────────────────────────────────────────

#[test]
fn steady_black_cancels_blink_at_any_point() {
    for elapsed in 0..6 {
        let (c, hw) = controller();
        c.start_blink(200, 3, RED);
        for _ in 0..elapsed {
            fire(&c, &hw);
        }
        let stops_before = hw.borrow().stop_count();

        c.light_steady(BLACK);

        assert_eq!(c.state(), BlinkState::Idle, "after {} ticks", elapsed);
        assert!(!hw.borrow().armed());
        assert_eq!(hw.borrow().stop_count(), stops_before + 1);
        assert_eq!(hw.borrow().last_shown(), Some(BLACK));
        assert!(!fire(&c, &hw));
    }
}

#[test]
fn steady_light_while_idle_leaves_timer_alone() {
    let (c, hw) = controller();
    let calls_before = hw.borrow().calls.len();
    c.light_steady(GREEN);

    let hw = hw.borrow();
    assert_eq!(hw.calls[calls_before..], [HwCall::Show(GREEN)]);
    assert_eq!(c.state(), BlinkState::Idle);
}

#[test]
fn stale_tick_after_steady_light_is_ignored() {
    let (c, hw) = controller();
    c.start_blink(100, 4, RED);
    fire(&c, &hw);
    c.light_steady(BLUE);

    // Callback that was already in flight when the timer stopped.
    c.on_tick();
    assert_eq!(hw.borrow().last_shown(), Some(BLUE));
    assert_eq!(c.state(), BlinkState::Idle);
}

// ── Restart ───────────────────────────────────────────────────

#[test]
fn restart_mid_session_replaces_configuration() {
    let (c, hw) = controller();
    c.start_blink(100, 3, RED);
    for _ in 0..3 {
        fire(&c, &hw);
    }
    let mark = hw.borrow().calls.len();

    c.start_blink(200, 2, GREEN);

    assert_eq!(
        hw.borrow().calls[mark..],
        [
            HwCall::Stop,
            HwCall::Detach,
            HwCall::SetPeriod { period_us: 200_000 },
            HwCall::Attach,
            HwCall::Start,
        ]
    );
    assert_eq!(
        c.session(),
        BlinkSession {
            period_ms: 200,
            total_half_cycles: 4,
            current_half_cycle: 0,
            colour: GREEN,
        }
    );

    while fire(&c, &hw) {}
    let shown = hw.borrow().shown();
    assert_eq!(shown[shown.len() - 4..], [GREEN, BLACK, GREEN, BLACK]);
    assert!(!shown[4..].contains(&RED), "no tick used the old colour");
}

// ── Teardown ──────────────────────────────────────────────────

#[test]
fn release_stops_and_detaches_running_timer() {
    let (c, hw) = controller();
    c.start_blink(100, 2, RED);
    fire(&c, &hw);
    let _ = c.release();

    let hw = hw.borrow();
    assert!(!hw.armed());
    assert_eq!(hw.calls[hw.calls.len() - 2..], [HwCall::Stop, HwCall::Detach]);
}
