//! Bit-flag event group.

use std::sync::{Condvar, Mutex as StdMutex};

use bitflags::bitflags;

use crate::time::{Deadline, Wait};
use crate::{Error, Result, Timeout};

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    /// A 32-bit field of application-defined event flags.
    ///
    /// The crate assigns no meaning to individual bits; build masks with
    /// [`EventBits::from_bits_truncate`] or combine them with the usual bit operators.
    pub struct EventBits: u32 {
        /// All 32 flag positions.
        const ALL = u32::MAX;
    }
}

/// How [`Event::wait`] matches the requested bits against the current field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Satisfied when at least one requested bit is set.
    Any,
    /// Satisfied only when every requested bit is set.
    All,
}

/// A group of 32 event flags with wait-any / wait-all semantics.
///
/// [`Event::set`] ORs bits into the field and wakes all waiters; [`Event::clear`]
/// removes bits without waking anyone; [`Event::wait`] blocks per the [`Timeout`]
/// contract until the requested bits are present under the chosen [`WaitMode`].
/// Waiting never consumes bits — they stay set until some thread clears them, and
/// there is no ownership: any thread may set, clear, or wait.
///
/// # Examples
///
/// ```rust
/// use osal::{Timeout, sync::{Event, EventBits, WaitMode}};
///
/// let event = Event::new();
/// let ready = EventBits::from_bits_truncate(0x01);
/// let done = EventBits::from_bits_truncate(0x02);
///
/// event.set(ready);
/// let actual = event.wait(ready | done, WaitMode::Any, Timeout::NO_WAIT)?;
/// assert_eq!(actual, ready);
/// # Ok::<(), osal::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Event {
    bits: StdMutex<EventBits>,
    changed: Condvar,
}

impl Event {
    /// Creates an event group with no flags set.
    #[must_use]
    pub const fn new() -> Event {
        Event {
            bits: StdMutex::new(EventBits::empty()),
            changed: Condvar::new(),
        }
    }

    /// ORs `bits` into the field and wakes every waiter for re-evaluation.
    pub fn set(&self, bits: EventBits) {
        let mut current = lock!(self.bits);
        current.insert(bits);
        drop(current);
        self.changed.notify_all();
    }

    /// Removes `bits` from the field.
    ///
    /// Clearing never unblocks a waiter; only [`Event::set`] does.
    pub fn clear(&self, bits: EventBits) {
        lock!(self.bits).remove(bits);
    }

    /// Blocks until the requested bits are present, then returns `current & bits`.
    ///
    /// With [`WaitMode::Any`] a single requested bit satisfies the wait; with
    /// [`WaitMode::All`] every requested bit must be set at the same observation.
    /// The returned mask is the requested subset that was actually set. Bits are
    /// not cleared by waiting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] for an empty request mask and
    /// [`Error::Timeout`] when the condition was not met within the budget.
    pub fn wait(&self, bits: EventBits, mode: WaitMode, timeout: Timeout) -> Result<EventBits> {
        if bits.is_empty() {
            return Err(Error::InvalidParam);
        }
        let deadline = Deadline::start(timeout);
        let mut current = lock!(self.bits);
        loop {
            let met = match mode {
                WaitMode::Any => current.intersects(bits),
                WaitMode::All => current.contains(bits),
            };
            if met {
                return Ok(*current & bits);
            }
            current = match deadline.check() {
                Wait::Expired => return Err(Error::Timeout),
                Wait::Budget(remaining) => cond_wait_timeout!(self.changed, current, remaining),
                Wait::Unbounded => cond_wait!(self.changed, current),
            };
        }
    }

    /// Snapshot of the current flag field.
    #[must_use]
    pub fn bits(&self) -> EventBits {
        *lock!(self.bits)
    }
}
