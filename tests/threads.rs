//! Thread lifecycle: spawn, timed join, sleep accuracy and option validation.

use osal::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A spawned entry runs to completion and its writes are visible after join.
#[test]
fn test_spawn_and_join() {
    let counter = Arc::new(AtomicU32::new(0));
    let worker_counter = Arc::clone(&counter);

    let worker = Thread::spawn(ThreadOptions::new("worker"), move || {
        sleep_ms(100);
        worker_counter.store(42, Ordering::SeqCst);
    })
    .unwrap();

    let start = uptime_ms();
    worker.join(Timeout::FOREVER).unwrap();
    let elapsed = uptime_ms() - start;

    assert_eq!(counter.load(Ordering::SeqCst), 42);
    assert!(elapsed >= 90, "join returned after {elapsed}ms");
}

/// join with a short budget reports Timeout while the entry still runs,
/// then a second join with no deadline reaps the thread.
#[test]
fn test_join_timeout_then_success() {
    let sleeper = Thread::spawn(ThreadOptions::new("sleeper"), || sleep_ms(150)).unwrap();

    assert_eq!(sleeper.join(Timeout::millis(20)), Err(Error::Timeout));
    assert!(!sleeper.is_finished());

    sleeper.join(Timeout::FOREVER).unwrap();
    assert!(sleeper.is_finished());
}

/// sleep_ms blocks for at least the requested time and not absurdly longer.
#[test]
fn test_sleep_duration_bound() {
    let start = uptime_ms();
    sleep_ms(100);
    let elapsed = uptime_ms() - start;
    assert!((90..=300).contains(&elapsed), "slept for {elapsed}ms");
}

/// yield_now is a scheduling hint and must return promptly.
#[test]
fn test_yield_returns() {
    for _ in 0..100 {
        yield_now();
    }
}

/// Priorities above the supported range are rejected before any thread is
/// created.
#[test]
fn test_priority_out_of_range_rejected() {
    let options = ThreadOptions::new("invalid").priority(32);
    let result = Thread::spawn(options, || {});
    assert_eq!(result.err(), Some(Error::InvalidParam));
}

/// Several workers share one counter; joining all of them accounts for every
/// increment.
#[test]
fn test_many_workers_all_join() {
    let counter = Arc::new(AtomicU32::new(0));
    let mut workers = Vec::new();

    for index in 0..8 {
        let worker_counter = Arc::clone(&counter);
        let options = ThreadOptions::new(&format!("worker-{index}")).stack_size(32 * 1024);
        workers.push(
            Thread::spawn(options, move || {
                worker_counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap(),
        );
    }
    for worker in workers {
        worker.join(Timeout::FOREVER).unwrap();
    }
    assert_eq!(counter.load(Ordering::SeqCst), 8);
}

/// A panicking entry is contained and surfaces as a backend error from join.
#[test]
fn test_panicking_entry_reported_by_join() {
    let doomed = Thread::spawn(ThreadOptions::new("doomed"), || panic!("boom")).unwrap();
    let result = doomed.join(Timeout::FOREVER);
    assert!(matches!(result, Err(Error::Backend(_))));
}
