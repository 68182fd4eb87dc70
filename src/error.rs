use thiserror::Error;

macro_rules! backend_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Backend($msg.to_string())
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Backend(format!($fmt, $($arg)*))
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum is the full status vocabulary of the crate: every fallible operation returns
/// [`crate::Result`], and the error side is always one of the variants below. The set is closed
/// on purpose — callers dispatch on it the way they would on a status code, and [`Error::Timeout`]
/// in particular is an *expected* outcome of any bounded wait, not a failure.
///
/// # Error Categories
///
/// ## Expected, recoverable
/// - [`Error::Timeout`] - A bounded wait elapsed before the condition was met
///
/// ## Programmer error
/// - [`Error::InvalidParam`] - Bad argument, detected synchronously before any blocking
///
/// ## Resource exhaustion
/// - [`Error::NoMemory`] - Creation-time allocation or thread-spawn failure
///
/// ## Underlying-primitive failure
/// - [`Error::Backend`] - Catch-all for native-layer failures and contract violations such as
///   unlocking a mutex the caller does not hold, or submitting a work item that is already queued
///
/// # Examples
///
/// ```rust
/// use osal::{Error, Timeout, sync::Semaphore};
///
/// let sem = Semaphore::new(0, 1)?;
/// match sem.take(Timeout::NO_WAIT) {
///     Ok(()) => println!("token taken"),
///     Err(Error::Timeout) => println!("nothing available right now"),
///     Err(e) => eprintln!("semaphore failure: {}", e),
/// }
/// # Ok::<(), osal::Error>(())
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A bounded wait elapsed before the awaited condition was met.
    ///
    /// Returned by every blocking operation when called with `NO_WAIT` and the condition
    /// is not already true, or with a finite budget that runs out. This is the normal
    /// "not yet" signal of the library and is always recoverable by retrying.
    #[error("Operation timed out")]
    Timeout,

    /// Resource exhaustion while creating a primitive.
    ///
    /// Creation of threads (and of the primitives that spawn one internally, such as work
    /// queues) can fail when the host refuses to provide the resources. The failure is
    /// surfaced from the triggering call; already-created primitives are unaffected.
    #[error("Out of memory or native thread resources")]
    NoMemory,

    /// An argument was rejected before any work was done.
    ///
    /// Checked synchronously at the top of each operation: a zero semaphore limit, a
    /// priority above the portable range, a zero-capacity queue, a zero initial timer
    /// delay, an empty event wait mask, or a second join on the same thread. Never a
    /// timing artifact.
    #[error("Invalid parameter")]
    InvalidParam,

    /// Failure of an underlying native primitive, or a violated usage contract.
    ///
    /// This is the catch-all the other variants do not cover: unlocking from a thread
    /// that is not the owner, a panicking thread entry observed at join, a work record
    /// submitted while still queued, or a full work queue rejecting a non-blocking
    /// submission. The message names the concrete condition.
    #[error("{0}")]
    Backend(String),
}
