//! Timer firing behavior: one-shot, periodic cadence, stop, restart and
//! callback re-entrancy.

use osal::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

fn counting_timer() -> (Timer, Arc<AtomicU32>) {
    let count = Arc::new(AtomicU32::new(0));
    let timer_count = Arc::clone(&count);
    let timer = Timer::new(move || {
        timer_count.fetch_add(1, Ordering::SeqCst);
    });
    (timer, count)
}

/// A one-shot timer fires exactly once around its deadline and then stays
/// idle.
#[test]
fn test_one_shot_fires_once() {
    let (timer, count) = counting_timer();
    timer.start(50, 0).unwrap();

    sleep_ms(200);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!timer.is_running());

    sleep_ms(100);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// A periodic timer keeps a steady cadence: roughly one firing per period.
#[test]
fn test_periodic_cadence() {
    let (timer, count) = counting_timer();
    timer.start(50, 50).unwrap();

    sleep_ms(275);
    let fired = count.load(Ordering::SeqCst);
    assert!((4..=6).contains(&fired), "fired {fired} times in 275ms");
    assert!(timer.is_running());
}

/// stop freezes the firing count; no callback runs afterwards.
#[test]
fn test_stop_halts_periodic() {
    let (timer, count) = counting_timer();
    timer.start(30, 30).unwrap();

    sleep_ms(100);
    timer.stop();
    assert!(!timer.is_running());

    let frozen = count.load(Ordering::SeqCst);
    sleep_ms(150);
    assert_eq!(count.load(Ordering::SeqCst), frozen);
}

/// Restarting a pending one-shot discards the first deadline entirely; the
/// callback fires once, at the new deadline only.
#[test]
fn test_restart_supersedes_pending_deadline() {
    let (timer, count) = counting_timer();

    timer.start(100, 0).unwrap();
    sleep_ms(50);
    timer.start(150, 0).unwrap();

    // The original deadline (t=100) passes here without a firing.
    sleep_ms(80);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    // The superseding deadline (t=200) has passed by now.
    sleep_ms(150);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// A callback may stop its own periodic timer; no further firings happen.
#[test]
fn test_callback_stops_own_timer() {
    let count = Arc::new(AtomicU32::new(0));
    let slot: Arc<OnceLock<Timer>> = Arc::new(OnceLock::new());

    let callback_count = Arc::clone(&count);
    let callback_slot = Arc::clone(&slot);
    let timer = Timer::new(move || {
        callback_count.fetch_add(1, Ordering::SeqCst);
        if let Some(own) = callback_slot.get() {
            own.stop();
        }
    });
    timer.start(30, 30).unwrap();
    slot.set(timer).ok().unwrap();

    sleep_ms(200);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!slot.get().unwrap().is_running());
}

/// A one-shot callback may restart its own timer for a follow-up firing.
#[test]
fn test_callback_restarts_own_timer() {
    let count = Arc::new(AtomicU32::new(0));
    let slot: Arc<OnceLock<Timer>> = Arc::new(OnceLock::new());

    let callback_count = Arc::clone(&count);
    let callback_slot = Arc::clone(&slot);
    let timer = Timer::new(move || {
        let fired = callback_count.fetch_add(1, Ordering::SeqCst) + 1;
        if fired == 1 {
            if let Some(own) = callback_slot.get() {
                own.start(40, 0).unwrap();
            }
        }
    });
    timer.start(40, 0).unwrap();
    slot.set(timer).ok().unwrap();

    sleep_ms(250);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

/// Dropping an armed timer must not wait out the pending deadline.
#[test]
fn test_drop_does_not_wait_for_deadline() {
    let (timer, count) = counting_timer();
    timer.start(5_000, 0).unwrap();

    let start = uptime_ms();
    drop(timer);
    let elapsed = uptime_ms() - start;

    assert!(elapsed < 1_000, "drop blocked for {elapsed}ms");
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

/// Starting an already-armed periodic timer reschedules it with the new
/// settings.
#[test]
fn test_restart_changes_period() {
    let (timer, count) = counting_timer();
    timer.start(500, 500).unwrap();

    sleep_ms(30);
    timer.start(40, 0).unwrap();

    sleep_ms(150);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!timer.is_running());
}
