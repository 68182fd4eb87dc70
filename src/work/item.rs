//! Submittable work items.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::work::WorkQueue;
use crate::Result;

/// What actually flows through a work queue: the callback plus its queued flag.
///
/// Records are cheap to clone — submission enqueues a clone, and every clone
/// shares the same flag, which is how duplicate submission of one item is
/// detected across threads.
#[derive(Clone)]
pub(crate) struct WorkRecord {
    callback: Arc<dyn Fn() + Send + Sync + 'static>,
    queued: Arc<AtomicBool>,
}

impl WorkRecord {
    pub(crate) fn new<F>(callback: F) -> WorkRecord
    where
        F: Fn() + Send + Sync + 'static,
    {
        WorkRecord {
            callback: Arc::new(callback),
            queued: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claims the queued flag; fails if the record is already waiting in a queue.
    pub(crate) fn mark_queued(&self) -> Result<()> {
        if self
            .queued
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(backend_error!("work item already queued"));
        }
        Ok(())
    }

    /// Releases the queued flag; called on dequeue and on failed submission.
    pub(crate) fn clear_queued(&self) {
        self.queued.store(false, Ordering::Release);
    }

    pub(crate) fn is_queued(&self) -> bool {
        self.queued.load(Ordering::Acquire)
    }

    /// Runs the callback, containing panics so a drain loop survives them.
    pub(crate) fn invoke(&self) {
        if panic::catch_unwind(AssertUnwindSafe(|| (self.callback)())).is_err() {
            log::error!("work item callback panicked");
        }
    }
}

impl fmt::Debug for WorkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkRecord")
            .field("queued", &self.is_queued())
            .finish_non_exhaustive()
    }
}

/// A unit of deferred execution: a callback submitted to a work queue.
///
/// Submission enqueues a copy of the internal record; the queue's drain thread
/// invokes the callback later, in submission order. One item can be waiting in at
/// most one queue slot at a time: submitting while a previous submission is still
/// queued fails with [`Error::Backend`](crate::Error::Backend). The guard lifts
/// as soon as the drain thread dequeues the record, so an item may be resubmitted
/// while its callback is executing.
///
/// # Examples
///
/// ```rust,no_run
/// use osal::{thread, work::Work};
/// use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
///
/// let runs = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&runs);
/// let work = Work::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// work.submit()?; // onto the system work queue
/// thread::sleep_ms(50);
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// # Ok::<(), osal::Error>(())
/// ```
#[derive(Debug)]
pub struct Work {
    record: WorkRecord,
}

impl Work {
    /// Creates a work item around `callback`.
    pub fn new<F>(callback: F) -> Work
    where
        F: Fn() + Send + Sync + 'static,
    {
        Work {
            record: WorkRecord::new(callback),
        }
    }

    /// Submits the item to the system work queue, creating that queue on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) when the item is already
    /// queued or the queue is full, and propagates
    /// [`Error::NoMemory`](crate::Error::NoMemory) if the system queue could not
    /// be created (a later submit will retry the creation).
    pub fn submit(&self) -> Result<()> {
        crate::work::submit_to_system(&self.record)
    }

    /// Submits the item to an explicit work queue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`](crate::Error::Backend) when the item is already
    /// queued or the queue is full.
    pub fn submit_to(&self, queue: &WorkQueue) -> Result<()> {
        queue.submit_record(&self.record)
    }

    /// `true` while a submission of this item is waiting in some queue.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.record.is_queued()
    }
}
