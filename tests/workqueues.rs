//! Work item execution on the system queue, custom queues and the delayed
//! submission path.

use osal::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

fn counting_work() -> (Work, Arc<AtomicU32>) {
    let count = Arc::new(AtomicU32::new(0));
    let work_count = Arc::clone(&count);
    let work = Work::new(move || {
        work_count.fetch_add(1, Ordering::SeqCst);
    });
    (work, count)
}

fn counting_delayed_work() -> (DelayedWork, Arc<AtomicU32>) {
    let count = Arc::new(AtomicU32::new(0));
    let work_count = Arc::clone(&count);
    let work = DelayedWork::new(move || {
        work_count.fetch_add(1, Ordering::SeqCst);
    });
    (work, count)
}

/// A submitted item runs exactly once on the shared system queue.
#[test]
fn test_work_runs_on_system_queue() {
    let (work, count) = counting_work();
    work.submit().unwrap();

    sleep_ms(100);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!work.is_pending());
}

/// The closure owns its captures; a captured argument reaches the callback
/// unchanged.
#[test]
fn test_work_closure_carries_argument() {
    let seen = Arc::new(AtomicU32::new(0));
    let work_seen = Arc::clone(&seen);
    let argument: u32 = 77;

    let work = Work::new(move || {
        work_seen.store(argument, Ordering::SeqCst);
    });
    work.submit().unwrap();

    sleep_ms(100);
    assert_eq!(seen.load(Ordering::SeqCst), 77);
}

/// An item may be resubmitted after it has finished running.
#[test]
fn test_work_resubmit_after_completion() {
    let (work, count) = counting_work();

    work.submit().unwrap();
    sleep_ms(100);
    work.submit().unwrap();
    sleep_ms(100);

    assert_eq!(count.load(Ordering::SeqCst), 2);
}

/// Items submitted to a private queue drain on that queue's thread.
#[test]
fn test_work_on_custom_queue() {
    let queue = WorkQueue::new("wq-test", 32 * 1024, 10).unwrap();
    let (work, count) = counting_work();

    work.submit_to(&queue).unwrap();
    sleep_ms(100);

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(queue.pending(), 0);
}

/// Submitting an item that is already waiting in a queue is rejected; the
/// queued submission still runs exactly once.
#[test]
fn test_duplicate_submit_rejected() {
    let queue = WorkQueue::new("wq-dup", 32 * 1024, 10).unwrap();
    let blocker = Work::new(|| sleep_ms(150));
    let (work, count) = counting_work();

    blocker.submit_to(&queue).unwrap();
    sleep_ms(30);

    work.submit_to(&queue).unwrap();
    assert!(work.is_pending());
    assert!(matches!(work.submit_to(&queue), Err(Error::Backend(_))));

    sleep_ms(300);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!work.is_pending());
}

/// A full queue rejects further submissions without corrupting the rejected
/// item's pending flag.
#[test]
fn test_full_queue_rejects_submission() {
    let queue = WorkQueue::new("wq-full", 32 * 1024, 10).unwrap();
    let blocker = Work::new(|| sleep_ms(300));
    blocker.submit_to(&queue).unwrap();
    sleep_ms(30);

    let count = Arc::new(AtomicU32::new(0));
    let mut backlog = Vec::new();
    for _ in 0..16 {
        let work_count = Arc::clone(&count);
        let work = Work::new(move || {
            work_count.fetch_add(1, Ordering::SeqCst);
        });
        work.submit_to(&queue).unwrap();
        backlog.push(work);
    }
    assert_eq!(queue.pending(), 16);

    let (rejected, _) = counting_work();
    assert!(matches!(rejected.submit_to(&queue), Err(Error::Backend(_))));
    assert!(!rejected.is_pending());

    sleep_ms(500);
    assert_eq!(count.load(Ordering::SeqCst), 16);
}

/// A delayed item stays pending through the delay and fires afterwards.
#[test]
fn test_delayed_work_fires_after_delay() {
    let (work, count) = counting_delayed_work();
    work.submit(100).unwrap();
    assert!(work.is_pending());

    sleep_ms(50);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    sleep_ms(150);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!work.is_pending());
}

/// cancel during the delay phase prevents the callback entirely.
#[test]
fn test_delayed_work_cancel_before_deadline() {
    let (work, count) = counting_delayed_work();
    work.submit(200).unwrap();

    sleep_ms(50);
    work.cancel();
    assert!(!work.is_pending());

    sleep_ms(300);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

/// Resubmitting while the delay is pending replaces the old deadline; only
/// the new one fires.
#[test]
fn test_delayed_work_resubmit_supersedes() {
    let (work, count) = counting_delayed_work();

    work.submit(100).unwrap();
    sleep_ms(30);
    work.submit(150).unwrap();

    // The first deadline (t=100) passes without a firing.
    sleep_ms(80);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    // The superseding deadline (t=180) has passed by now.
    sleep_ms(150);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// A zero delay skips the timer and hands the item to the queue immediately.
#[test]
fn test_delayed_work_zero_delay_is_immediate() {
    let (work, count) = counting_delayed_work();
    work.submit(0).unwrap();

    sleep_ms(100);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

/// The delayed path can target a private queue.
#[test]
fn test_delayed_work_to_custom_queue() {
    let queue = WorkQueue::new("wq-delayed", 32 * 1024, 10).unwrap();
    let (work, count) = counting_delayed_work();

    work.submit_to(&queue, 50).unwrap();
    sleep_ms(200);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}
