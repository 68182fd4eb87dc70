//! Clock access and the timeout vocabulary shared by every blocking operation.
//!
//! All waiting in this crate is expressed through [`Timeout`]: a millisecond budget with
//! two reserved sentinels, [`Timeout::NO_WAIT`] (poll, never block) and [`Timeout::FOREVER`]
//! (block indefinitely). Any other value is a finite budget measured from call entry —
//! a `lock(Timeout::millis(50))` that has to retry internally still gives up 50ms after
//! the call began, not 50ms after the last retry.
//!
//! The module also exposes the monotonic process clock in two resolutions: milliseconds
//! ([`uptime_ms`]) and microsecond ticks ([`ticks`]), with [`ticks_to_ms`] converting
//! between them.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Ticks per millisecond: one tick is one microsecond.
const TICKS_PER_MS: u64 = 1000;

/// A wait budget in milliseconds.
///
/// Two values are reserved: [`Timeout::NO_WAIT`] checks the condition once and never
/// blocks, [`Timeout::FOREVER`] blocks until the condition holds. Everything in between
/// is a finite budget; when it elapses the operation returns [`crate::Error::Timeout`].
///
/// # Examples
///
/// ```rust
/// use osal::Timeout;
/// use std::time::Duration;
///
/// assert!(Timeout::NO_WAIT.is_no_wait());
/// assert!(Timeout::FOREVER.is_forever());
/// assert_eq!(Timeout::millis(250).as_millis(), 250);
/// assert_eq!(Timeout::from(Duration::from_secs(2)), Timeout::millis(2000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeout(u32);

impl Timeout {
    /// Poll: check the condition once, never block.
    pub const NO_WAIT: Timeout = Timeout(0);

    /// Block until the condition holds, however long that takes.
    pub const FOREVER: Timeout = Timeout(u32::MAX);

    /// A finite wait budget of `ms` milliseconds.
    ///
    /// `0` is [`Timeout::NO_WAIT`] and `u32::MAX` is [`Timeout::FOREVER`]; the sentinel
    /// values and the constructors are interchangeable.
    #[must_use]
    pub const fn millis(ms: u32) -> Timeout {
        Timeout(ms)
    }

    /// The raw millisecond value, sentinels included.
    #[must_use]
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// `true` for the polling sentinel.
    #[must_use]
    pub const fn is_no_wait(self) -> bool {
        self.0 == 0
    }

    /// `true` for the unbounded sentinel.
    #[must_use]
    pub const fn is_forever(self) -> bool {
        self.0 == u32::MAX
    }
}

impl From<Duration> for Timeout {
    /// Converts a [`Duration`] into a finite budget, saturating just below
    /// [`Timeout::FOREVER`] so that no duration aliases the sentinel.
    fn from(duration: Duration) -> Timeout {
        let ms = duration.as_millis().min(u128::from(u32::MAX - 1));
        Timeout(ms as u32)
    }
}

impl Default for Timeout {
    /// The polling sentinel, [`Timeout::NO_WAIT`].
    fn default() -> Timeout {
        Timeout::NO_WAIT
    }
}

/// The running budget of one blocking call.
///
/// Captured once at call entry so that condition-variable retries (and spurious
/// wakeups) burn down a single budget instead of restarting it.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Deadline {
    /// `NO_WAIT`: the first failed predicate check ends the call.
    Poll,
    /// Finite budget, expiring at the captured instant.
    Until(Instant),
    /// `FOREVER`: wait however long the condition takes.
    Unbounded,
}

/// What a waiter should do after a failed predicate check.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Wait {
    /// Budget exhausted (or `NO_WAIT`): give up with `Timeout`.
    Expired,
    /// Block for at most this long, then re-check.
    Budget(Duration),
    /// Block until signalled.
    Unbounded,
}

impl Deadline {
    /// Captures the budget of a call that starts now.
    pub(crate) fn start(timeout: Timeout) -> Deadline {
        if timeout.is_no_wait() {
            Deadline::Poll
        } else if timeout.is_forever() {
            Deadline::Unbounded
        } else {
            Deadline::Until(Instant::now() + Duration::from_millis(u64::from(timeout.as_millis())))
        }
    }

    /// How to proceed after the awaited condition was found not to hold.
    pub(crate) fn check(&self) -> Wait {
        match self {
            Deadline::Poll => Wait::Expired,
            Deadline::Unbounded => Wait::Unbounded,
            Deadline::Until(at) => {
                let now = Instant::now();
                if now < *at {
                    Wait::Budget(*at - now)
                } else {
                    Wait::Expired
                }
            }
        }
    }
}

/// The fixed origin of the process clock, pinned at first use.
fn epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// Milliseconds of monotonic uptime since an arbitrary fixed origin.
///
/// The value is monotonic and unaffected by wall-clock adjustments. It wraps after
/// roughly 49.7 days, matching the width of the portable millisecond counter.
#[must_use]
pub fn uptime_ms() -> u32 {
    epoch().elapsed().as_millis() as u32
}

/// Monotonic tick counter; one tick is one microsecond.
#[must_use]
pub fn ticks() -> u64 {
    epoch().elapsed().as_micros() as u64
}

/// Converts a tick count into whole milliseconds, truncating.
#[must_use]
pub fn ticks_to_ms(ticks: u64) -> u32 {
    (ticks / TICKS_PER_MS) as u32
}
