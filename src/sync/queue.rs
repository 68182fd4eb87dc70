//! Fixed-capacity FIFO message queue.

use std::mem;
use std::sync::{Condvar, Mutex as StdMutex};

use crate::time::{Deadline, Wait};
use crate::{Error, Result, Timeout};

/// Circular buffer state behind the internal lock.
#[derive(Debug)]
struct Ring<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    count: usize,
}

/// A fixed-capacity FIFO queue passing messages by value.
///
/// [`Queue::send`] copies the message into the next free slot and blocks (per the
/// [`Timeout`] contract) while the queue is full; [`Queue::recv`] removes the oldest
/// message and blocks while it is empty. Order is strict FIFO across any number of
/// producer and consumer threads: the nth successful `recv` returns the payload of the
/// nth successful `send`.
///
/// Messages are cloned in and moved out, so producer and consumer never share mutable
/// state through the queue. The backing buffer is owned by the queue and sized once at
/// construction.
///
/// # Examples
///
/// ```rust
/// use osal::{Timeout, sync::Queue};
///
/// let queue: Queue<u32> = Queue::new(4)?;
/// queue.send(&10, Timeout::NO_WAIT)?;
/// queue.send(&20, Timeout::NO_WAIT)?;
/// assert_eq!(queue.recv(Timeout::NO_WAIT)?, 10);
/// assert_eq!(queue.recv(Timeout::NO_WAIT)?, 20);
/// # Ok::<(), osal::Error>(())
/// ```
#[derive(Debug)]
pub struct Queue<T> {
    ring: StdMutex<Ring<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T: Clone> Queue<T> {
    /// Creates a queue with room for `capacity` messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] when `capacity` is zero or the message type is
    /// zero-sized (a queue of nothing carries no information).
    pub fn new(capacity: usize) -> Result<Queue<T>> {
        if capacity == 0 || mem::size_of::<T>() == 0 {
            return Err(Error::InvalidParam);
        }
        let slots = (0..capacity).map(|_| None).collect();
        Ok(Queue {
            ring: StdMutex::new(Ring {
                slots,
                head: 0,
                tail: 0,
                count: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        })
    }

    /// Copies `message` into the queue, blocking per the timeout contract while full.
    ///
    /// The clone happens before any blocking, so no caller-provided code runs while
    /// the internal lock is held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when no slot freed up within the budget.
    pub fn send(&self, message: &T, timeout: Timeout) -> Result<()> {
        let message = message.clone();
        let deadline = Deadline::start(timeout);
        let mut ring = lock!(self.ring);
        loop {
            if ring.count < self.capacity {
                let tail = ring.tail;
                ring.slots[tail] = Some(message);
                ring.tail = (tail + 1) % self.capacity;
                ring.count += 1;
                drop(ring);
                self.not_empty.notify_one();
                return Ok(());
            }
            ring = match deadline.check() {
                Wait::Expired => return Err(Error::Timeout),
                Wait::Budget(remaining) => cond_wait_timeout!(self.not_full, ring, remaining),
                Wait::Unbounded => cond_wait!(self.not_full, ring),
            };
        }
    }

    /// Removes and returns the oldest message, blocking per the timeout contract
    /// while the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when no message arrived within the budget.
    pub fn recv(&self, timeout: Timeout) -> Result<T> {
        let deadline = Deadline::start(timeout);
        let mut ring = lock!(self.ring);
        loop {
            if ring.count > 0 {
                let head = ring.head;
                let message = ring.slots[head].take();
                ring.head = (head + 1) % self.capacity;
                ring.count -= 1;
                drop(ring);
                self.not_full.notify_one();
                return message.ok_or_else(|| backend_error!("queue slot empty below count"));
            }
            ring = match deadline.check() {
                Wait::Expired => return Err(Error::Timeout),
                Wait::Budget(remaining) => cond_wait_timeout!(self.not_empty, ring, remaining),
                Wait::Unbounded => cond_wait!(self.not_empty, ring),
            };
        }
    }

    /// Messages currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        lock!(self.ring).count
    }

    /// `true` when no message is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fixed slot count chosen at construction.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
