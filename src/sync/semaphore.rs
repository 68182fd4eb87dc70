//! Bounded counting semaphore.

use std::sync::{Condvar, Mutex as StdMutex};

use crate::time::{Deadline, Wait};
use crate::{Error, Result, Timeout};

/// A counting semaphore whose count stays within `[0, limit]`.
///
/// [`Semaphore::give`] adds a token and [`Semaphore::take`] removes one, blocking per
/// the [`Timeout`] contract while none is available. A give at the limit is silently
/// absorbed — the count saturates rather than erroring, which keeps a `new(0, 1)`
/// binary semaphore usable as an edge-style signal: any number of gives collapse into
/// one pending token.
///
/// # Examples
///
/// ```rust
/// use osal::{Error, Timeout, sync::Semaphore};
///
/// let sem = Semaphore::new(1, 1)?;
/// sem.give(); // already at the limit: absorbed
/// sem.take(Timeout::NO_WAIT)?; // the single token
/// assert_eq!(sem.take(Timeout::NO_WAIT), Err(Error::Timeout));
/// # Ok::<(), osal::Error>(())
/// ```
#[derive(Debug)]
pub struct Semaphore {
    count: StdMutex<u32>,
    available: Condvar,
    limit: u32,
}

impl Semaphore {
    /// Creates a semaphore holding `initial` tokens, bounded by `limit`.
    ///
    /// An `initial` above the limit is clamped to it, keeping the count invariant
    /// intact from the first observation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] when `limit` is zero.
    pub fn new(initial: u32, limit: u32) -> Result<Semaphore> {
        if limit == 0 {
            return Err(Error::InvalidParam);
        }
        Ok(Semaphore {
            count: StdMutex::new(initial.min(limit)),
            available: Condvar::new(),
            limit,
        })
    }

    /// Adds a token, saturating silently at the limit.
    pub fn give(&self) {
        let mut count = lock!(self.count);
        if *count < self.limit {
            *count += 1;
            drop(count);
            self.available.notify_one();
        }
        // At the limit the give is absorbed, matching FreeRTOS behavior.
    }

    /// Removes a token, blocking per the timeout contract while none is available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when no token became available within the budget.
    pub fn take(&self, timeout: Timeout) -> Result<()> {
        let deadline = Deadline::start(timeout);
        let mut count = lock!(self.count);
        loop {
            if *count > 0 {
                *count -= 1;
                return Ok(());
            }
            count = match deadline.check() {
                Wait::Expired => return Err(Error::Timeout),
                Wait::Budget(remaining) => cond_wait_timeout!(self.available, count, remaining),
                Wait::Unbounded => cond_wait!(self.available, count),
            };
        }
    }

    /// Tokens currently available.
    #[must_use]
    pub fn count(&self) -> u32 {
        *lock!(self.count)
    }

    /// The upper bound the count saturates at.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_rejected() {
        assert!(matches!(Semaphore::new(0, 0), Err(Error::InvalidParam)));
        assert!(matches!(Semaphore::new(3, 0), Err(Error::InvalidParam)));
    }

    #[test]
    fn test_initial_clamped_to_limit() {
        let sem = Semaphore::new(10, 4).unwrap();
        assert_eq!(sem.count(), 4);
        assert_eq!(sem.limit(), 4);
    }

    #[test]
    fn test_binary_signalling() {
        let sem = Semaphore::new(0, 1).unwrap();
        assert_eq!(sem.take(Timeout::NO_WAIT), Err(Error::Timeout));
        sem.give();
        assert_eq!(sem.take(Timeout::NO_WAIT), Ok(()));
        assert_eq!(sem.take(Timeout::NO_WAIT), Err(Error::Timeout));
    }

    #[test]
    fn test_give_saturates_at_limit() {
        let sem = Semaphore::new(1, 1).unwrap();
        sem.give();
        sem.give();
        assert_eq!(sem.count(), 1);
        assert_eq!(sem.take(Timeout::NO_WAIT), Ok(()));
        assert_eq!(sem.take(Timeout::NO_WAIT), Err(Error::Timeout));
    }

    #[test]
    fn test_counting_up_and_down() {
        let sem = Semaphore::new(2, 5).unwrap();
        sem.give();
        assert_eq!(sem.count(), 3);
        for _ in 0..3 {
            sem.take(Timeout::NO_WAIT).unwrap();
        }
        assert_eq!(sem.count(), 0);
        assert_eq!(sem.take(Timeout::NO_WAIT), Err(Error::Timeout));
    }
}
