//! Recursive mutex with timed acquisition.

use std::sync::{Condvar, Mutex as StdMutex};
use std::thread::{self, ThreadId};

use crate::time::{Deadline, Wait};
use crate::{Error, Result, Timeout};

/// Ownership book-keeping behind the internal lock.
#[derive(Debug, Default)]
struct OwnerState {
    owner: Option<ThreadId>,
    depth: u32,
}

/// A recursive mutual-exclusion lock with timed acquisition.
///
/// Unlike [`std::sync::Mutex`], the holder may call [`Mutex::lock`] again without
/// deadlocking: each nested acquisition increments a depth counter, and the lock is
/// only released to other threads once [`Mutex::unlock`] has been called as many times
/// as `lock` succeeded. Acquisition takes a [`Timeout`], so a caller can poll
/// (`NO_WAIT`), wait with a budget, or block indefinitely (`FOREVER`).
///
/// There is no guard type: `lock` and `unlock` are explicit calls, which lets the
/// acquisition survive across scopes the way callers of a portable locking API expect.
/// Unlocking from a thread that is not the current owner fails with
/// [`Error::Backend`] and leaves the lock untouched.
///
/// # Examples
///
/// ```rust
/// use osal::{Timeout, sync::Mutex};
///
/// let lock = Mutex::new();
/// lock.lock(Timeout::FOREVER)?;
/// lock.lock(Timeout::NO_WAIT)?; // recursion: same thread, no deadlock
/// lock.unlock()?;
/// lock.unlock()?; // released for other threads only now
/// # Ok::<(), osal::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Mutex {
    state: StdMutex<OwnerState>,
    freed: Condvar,
}

impl Mutex {
    /// Creates an unowned mutex.
    #[must_use]
    pub const fn new() -> Mutex {
        Mutex {
            state: StdMutex::new(OwnerState {
                owner: None,
                depth: 0,
            }),
            freed: Condvar::new(),
        }
    }

    /// Acquires the lock, blocking per the timeout contract.
    ///
    /// Succeeds immediately when the lock is free or already held by the calling
    /// thread (recursion). Otherwise the caller blocks until the owner releases,
    /// the budget runs out ([`Error::Timeout`]), or — for `NO_WAIT` — returns
    /// [`Error::Timeout`] without blocking at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when the lock could not be acquired within the
    /// budget, and [`Error::Backend`] if the recursion depth counter would overflow.
    pub fn lock(&self, timeout: Timeout) -> Result<()> {
        let me = thread::current().id();
        let deadline = Deadline::start(timeout);
        let mut state = lock!(self.state);
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.depth = 1;
                    return Ok(());
                }
                Some(owner) if owner == me => {
                    state.depth = state
                        .depth
                        .checked_add(1)
                        .ok_or_else(|| backend_error!("mutex recursion depth exhausted"))?;
                    return Ok(());
                }
                Some(_) => {}
            }
            state = match deadline.check() {
                Wait::Expired => return Err(Error::Timeout),
                Wait::Budget(remaining) => cond_wait_timeout!(self.freed, state, remaining),
                Wait::Unbounded => cond_wait!(self.freed, state),
            };
        }
    }

    /// Releases one level of ownership.
    ///
    /// The lock becomes available to other threads once the depth drops to zero;
    /// until then only the nesting unwinds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backend`] when the calling thread is not the owner, including
    /// the case of an unowned mutex. The lock state is left unchanged.
    pub fn unlock(&self) -> Result<()> {
        let me = thread::current().id();
        let mut state = lock!(self.state);
        match state.owner {
            Some(owner) if owner == me => {
                state.depth -= 1;
                if state.depth == 0 {
                    state.owner = None;
                    drop(state);
                    self.freed.notify_one();
                }
                Ok(())
            }
            _ => Err(backend_error!("mutex unlocked by a thread that does not hold it")),
        }
    }

    /// `true` while some thread holds the lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        lock!(self.state).owner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_unlock() {
        let mutex = Mutex::new();
        assert!(!mutex.is_locked());
        mutex.lock(Timeout::FOREVER).unwrap();
        assert!(mutex.is_locked());
        mutex.unlock().unwrap();
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_recursive_lock_requires_matching_unlocks() {
        let mutex = Mutex::new();
        for _ in 0..5 {
            mutex.lock(Timeout::NO_WAIT).unwrap();
        }
        for _ in 0..4 {
            mutex.unlock().unwrap();
            assert!(mutex.is_locked());
        }
        mutex.unlock().unwrap();
        assert!(!mutex.is_locked());
    }

    #[test]
    fn test_unlock_without_owner_fails() {
        let mutex = Mutex::new();
        assert!(matches!(mutex.unlock(), Err(Error::Backend(_))));
    }

    #[test]
    fn test_no_wait_on_held_lock_times_out() {
        let mutex = std::sync::Arc::new(Mutex::new());
        mutex.lock(Timeout::FOREVER).unwrap();

        let contender = std::sync::Arc::clone(&mutex);
        let result = std::thread::spawn(move || contender.lock(Timeout::NO_WAIT))
            .join()
            .unwrap();
        assert_eq!(result, Err(Error::Timeout));

        mutex.unlock().unwrap();
    }

    #[test]
    fn test_unlock_from_other_thread_fails() {
        let mutex = std::sync::Arc::new(Mutex::new());
        mutex.lock(Timeout::FOREVER).unwrap();

        let foreign = std::sync::Arc::clone(&mutex);
        let result = std::thread::spawn(move || foreign.unlock()).join().unwrap();
        assert!(matches!(result, Err(Error::Backend(_))));
        assert!(mutex.is_locked());

        mutex.unlock().unwrap();
    }
}
