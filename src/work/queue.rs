//! Work queues: a record queue drained by a dedicated thread.

use std::sync::Arc;

use crate::sync::Queue;
use crate::thread::{Thread, ThreadOptions};
use crate::work::item::WorkRecord;
use crate::{Result, Timeout};

/// Slots in every work queue's internal record queue.
pub(crate) const QUEUE_DEPTH: usize = 16;

/// A thread that drains a queue of work records, invoking each callback in turn.
///
/// Submissions are non-blocking: a full queue rejects the record rather than
/// stalling the submitter. Records are executed strictly in submission order by
/// the queue's single drain thread, so two items submitted to the same queue
/// never run concurrently with each other.
///
/// `WorkQueue` is cheaply clonable; clones submit to the same drain thread.
/// There is no teardown operation — work queues are process-lifetime the way
/// device firmware uses them, and dropping the last handle merely detaches the
/// drain thread.
///
/// # Examples
///
/// ```rust,no_run
/// use osal::{thread, work::{Work, WorkQueue}};
///
/// let queue = WorkQueue::new("uploads", 32 * 1024, 10)?;
/// let work = Work::new(|| println!("running on the uploads queue"));
/// work.submit_to(&queue)?;
/// thread::sleep_ms(50);
/// # Ok::<(), osal::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct WorkQueue {
    records: Arc<Queue<WorkRecord>>,
    drain: Arc<Thread>,
}

impl WorkQueue {
    /// Creates a work queue whose drain thread uses the given name, stack size
    /// and portable priority.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`](crate::Error::InvalidParam) for a priority
    /// above the portable range and [`Error::NoMemory`](crate::Error::NoMemory)
    /// when the drain thread cannot be spawned.
    pub fn new(name: &str, stack_size: usize, priority: u8) -> Result<WorkQueue> {
        let records = Arc::new(Queue::new(QUEUE_DEPTH)?);
        let feed = Arc::clone(&records);
        let options = ThreadOptions::new(name)
            .stack_size(stack_size)
            .priority(priority);
        let drain = Thread::spawn(options, move || drain_loop(&feed))?;
        Ok(WorkQueue {
            records,
            drain: Arc::new(drain),
        })
    }

    /// Enqueues a record without blocking.
    ///
    /// Claims the record's queued flag first, so one item occupies at most one
    /// slot; the flag is rolled back if the queue turns out to be full.
    pub(crate) fn submit_record(&self, record: &WorkRecord) -> Result<()> {
        record.mark_queued()?;
        match self.records.send(record, Timeout::NO_WAIT) {
            Ok(()) => Ok(()),
            Err(_) => {
                record.clear_queued();
                Err(backend_error!("work queue '{}' is full", self.name()))
            }
        }
    }

    /// The drain thread's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.drain.name()
    }

    /// Records currently waiting to be drained.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.records.len()
    }
}

/// Drain loop: receive forever, release the queued flag, run the callback.
///
/// The flag is released *before* the callback so the item can be resubmitted
/// from within its own execution. Callback panics are contained by the record.
fn drain_loop(records: &Queue<WorkRecord>) {
    loop {
        if let Ok(record) = records.recv(Timeout::FOREVER) {
            record.clear_queued();
            record.invoke();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_out_of_range_rejected() {
        assert!(WorkQueue::new("bad", 16 * 1024, 32).is_err());
    }

    #[test]
    fn test_clones_share_the_queue() {
        let queue = WorkQueue::new("shared", 16 * 1024, 5).unwrap();
        let clone = queue.clone();
        assert_eq!(queue.name(), clone.name());
        assert_eq!(queue.pending(), 0);
    }
}
