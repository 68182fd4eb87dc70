//! Work queues and deferred execution.
//!
//! A [`WorkQueue`] is nothing exotic: one [`Queue`](crate::sync::Queue) of work
//! records and one [`Thread`](crate::thread::Thread) that drains it forever,
//! invoking each record's callback in submission order. [`Work`] items are
//! submitted to an explicit queue or to the process-wide **system work queue**,
//! which is created lazily — and race-free — on first use. [`DelayedWork`]
//! composes a one-shot [`Timer`](crate::timer::Timer) with queue submission to
//! defer an item by a millisecond delay, with best-effort cancellation.
//!
//! The usual consumers are callback contexts that must not block: they package
//! the blocking part as a work item and hand it to a queue owned by a thread
//! that is allowed to.

use std::sync::Mutex as StdMutex;

use crate::Result;

pub mod delayed;
pub mod item;
pub mod queue;

pub use delayed::DelayedWork;
pub use item::Work;
pub use queue::WorkQueue;

use item::WorkRecord;

/// Drain-thread parameters of the system work queue.
const SYSTEM_QUEUE_NAME: &str = "osal-syswq";
const SYSTEM_STACK_SIZE: usize = 64 * 1024;
const SYSTEM_PRIORITY: u8 = 15;

/// Runs `f` against the system work queue, creating it on first use.
///
/// The slot is guarded by a mutex, not a flag: concurrent first users serialize
/// here, exactly one creates the queue, and a failed creation leaves the slot
/// empty so the next caller retries.
fn with_system<R>(f: impl FnOnce(&WorkQueue) -> R) -> Result<R> {
    static SYSTEM: StdMutex<Option<WorkQueue>> = StdMutex::new(None);

    let mut slot = lock!(SYSTEM);
    if let Some(queue) = slot.as_ref() {
        return Ok(f(queue));
    }
    log::debug!("creating the system work queue");
    let queue = WorkQueue::new(SYSTEM_QUEUE_NAME, SYSTEM_STACK_SIZE, SYSTEM_PRIORITY)?;
    Ok(f(slot.insert(queue)))
}

/// Enqueues a record on the system work queue, creating the queue on first use.
pub(crate) fn submit_to_system(record: &WorkRecord) -> Result<()> {
    with_system(|queue| queue.submit_record(record))?
}
