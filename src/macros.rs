#![allow(unused_macros)]

/// Helper macro for locking internal state
///
/// Recovers the guard from a poisoned lock: user callbacks never run while an
/// internal lock is held, so a panicking peer cannot leave state half-updated.
///
/// ```rust, ignore
///  let mut state = lock!(self.state);
///  state.count += 1;
/// ```
macro_rules! lock {
    ($lock:expr) => {
        match $lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    };
}

/// Helper macro for blocking on a condition variable
///
/// ```rust, ignore
///  state = cond_wait!(self.changed, state);
/// ```
macro_rules! cond_wait {
    ($cond:expr, $guard:expr) => {
        match $cond.wait($guard) {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    };
}

/// Helper macro for blocking on a condition variable with a wait budget
///
/// The timeout result is intentionally discarded; callers re-check their
/// predicate and their deadline, which also covers spurious wakeups.
///
/// ```rust, ignore
///  state = cond_wait_timeout!(self.changed, state, remaining);
/// ```
macro_rules! cond_wait_timeout {
    ($cond:expr, $guard:expr, $duration:expr) => {
        match $cond.wait_timeout($guard, $duration) {
            Ok((guard, _)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        }
    };
}
