//! Delayed work: a one-shot timer feeding a work queue.

use std::fmt;
use std::sync::{Arc, Mutex as StdMutex};

use crate::timer::Timer;
use crate::work::item::WorkRecord;
use crate::work::WorkQueue;
use crate::Result;

/// Submits the record to the currently selected target queue.
fn submit_now(target: &StdMutex<Option<WorkQueue>>, record: &WorkRecord) -> Result<()> {
    let queue = lock!(target).clone();
    match queue {
        Some(queue) => queue.submit_record(record),
        None => crate::work::submit_to_system(record),
    }
}

/// A work item that is submitted to a work queue after a delay.
///
/// [`DelayedWork::submit`] arms an internal one-shot [`Timer`]; when the delay
/// elapses, the item is enqueued on the target queue (the system queue by
/// default, or the queue given to [`DelayedWork::submit_to`]) and executes there
/// like any other work item. A delay of zero skips the timer and enqueues
/// immediately.
///
/// Resubmitting while a delay is pending supersedes the old schedule: the old
/// firing is never delivered, and exactly one submission happens, at the new
/// deadline. [`DelayedWork::cancel`] is best-effort — it retracts a pending
/// delay, but a firing that has already handed the item to the queue (or is
/// already executing) proceeds regardless, and the two outcomes are not
/// distinguished. Dropping the item likewise retracts a pending delay; an
/// already-enqueued submission still runs.
///
/// # Examples
///
/// ```rust,no_run
/// use osal::{thread, work::DelayedWork};
/// use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
///
/// let runs = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&runs);
/// let dwork = DelayedWork::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// dwork.submit(100)?;
/// assert!(dwork.is_pending());
/// thread::sleep_ms(150);
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// # Ok::<(), osal::Error>(())
/// ```
pub struct DelayedWork {
    record: WorkRecord,
    target: Arc<StdMutex<Option<WorkQueue>>>,
    timer: Timer,
}

impl DelayedWork {
    /// Creates an idle delayed-work item around `callback`.
    pub fn new<F>(callback: F) -> DelayedWork
    where
        F: Fn() + Send + Sync + 'static,
    {
        let record = WorkRecord::new(callback);
        let target = Arc::new(StdMutex::new(None::<WorkQueue>));

        let fire_record = record.clone();
        let fire_target = Arc::clone(&target);
        let timer = Timer::new(move || {
            if let Err(error) = submit_now(&fire_target, &fire_record) {
                log::error!("delayed work submission failed: {error}");
            }
        });

        DelayedWork {
            record,
            target,
            timer,
        }
    }

    /// Schedules submission to the system work queue after `delay_ms`.
    ///
    /// Supersedes any still-pending delay. With `delay_ms == 0` the item is
    /// enqueued before the call returns.
    ///
    /// # Errors
    ///
    /// Propagates queue-full and already-queued rejections as
    /// [`Error::Backend`](crate::Error::Backend) (immediately for a zero delay,
    /// logged at firing time otherwise) and
    /// [`Error::NoMemory`](crate::Error::NoMemory) when the delay timer's service
    /// thread cannot be spawned.
    pub fn submit(&self, delay_ms: u32) -> Result<()> {
        *lock!(self.target) = None;
        self.schedule(delay_ms)
    }

    /// Schedules submission to an explicit work queue after `delay_ms`.
    ///
    /// Same contract as [`DelayedWork::submit`]; the target sticks until the
    /// next submit call replaces it.
    pub fn submit_to(&self, queue: &WorkQueue, delay_ms: u32) -> Result<()> {
        *lock!(self.target) = Some(queue.clone());
        self.schedule(delay_ms)
    }

    fn schedule(&self, delay_ms: u32) -> Result<()> {
        if delay_ms == 0 {
            self.timer.stop();
            return submit_now(&self.target, &self.record);
        }
        self.timer.start(delay_ms, 0)
    }

    /// Retracts a pending delay, best-effort.
    ///
    /// Nothing fires after the call returns unless the firing was already in
    /// flight; an item already handed to a queue runs regardless. Idempotent,
    /// never blocks on the callback.
    pub fn cancel(&self) {
        self.timer.stop();
    }

    /// `true` while the delay phase is pending (armed but not yet fired).
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.timer.is_running()
    }
}

impl fmt::Debug for DelayedWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayedWork")
            .field("pending", &self.is_pending())
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}
