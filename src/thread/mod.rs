//! Threads with timed join semantics.
//!
//! [`Thread::spawn`] starts a native thread running a caller-provided closure —
//! there is no separate start step. [`Thread::join`] waits for the entry to return
//! under the usual [`Timeout`](crate::Timeout) contract, something the native join
//! cannot do on its own; a `FOREVER` join additionally reaps the native handle, so
//! it only returns once the thread has fully terminated.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex as StdMutex};
use std::thread::{Builder, JoinHandle};
use std::time::Duration;

use crate::time::{Deadline, Wait};
use crate::{Error, Result, Timeout};

pub mod priority;

/// Stack floor in bytes; smaller requests are raised to it.
pub const MIN_STACK_SIZE: usize = 16 * 1024;

/// Creation parameters for [`Thread::spawn`].
///
/// The name is carried to the native thread (visible in debuggers and panic
/// messages). The stack size is a hint floored at [`MIN_STACK_SIZE`]; the priority
/// must lie in `0..=`[`priority::MAX`] and is mapped through
/// [`priority::to_native`] for the host scheduler to take as a hint.
#[derive(Debug, Clone)]
pub struct ThreadOptions {
    /// Native thread name.
    pub name: String,
    /// Requested stack size in bytes.
    pub stack_size: usize,
    /// Portable priority, `0` (least urgent) to `31` (most urgent).
    pub priority: u8,
}

impl ThreadOptions {
    /// Options with the given name, the stack floor, and the lowest priority.
    #[must_use]
    pub fn new(name: &str) -> ThreadOptions {
        ThreadOptions {
            name: name.to_string(),
            stack_size: MIN_STACK_SIZE,
            priority: 0,
        }
    }

    /// Same options with the priority replaced.
    #[must_use]
    pub fn priority(mut self, priority: u8) -> ThreadOptions {
        self.priority = priority;
        self
    }

    /// Same options with the stack size replaced.
    #[must_use]
    pub fn stack_size(mut self, stack_size: usize) -> ThreadOptions {
        self.stack_size = stack_size;
        self
    }
}

impl Default for ThreadOptions {
    fn default() -> ThreadOptions {
        ThreadOptions::new("osal")
    }
}

/// Exit flag the trampoline raises just before the entry closure's thread ends.
#[derive(Debug, Default)]
struct ExitState {
    finished: bool,
    panicked: bool,
}

#[derive(Debug)]
struct Shared {
    exit: StdMutex<ExitState>,
    finished: Condvar,
}

/// A running thread with timed join semantics.
///
/// The entry closure starts executing immediately on spawn. Join at most once: the
/// first successful [`Thread::join`] consumes the native handle, and any further
/// join reports [`Error::InvalidParam`]. Dropping an unjoined `Thread` detaches it —
/// the entry keeps running to completion on its own.
///
/// A panic in the entry closure is caught by the trampoline; the thread still
/// terminates in an orderly way and the panic is reported as [`Error::Backend`]
/// from `join`.
///
/// # Examples
///
/// ```rust
/// use osal::{Timeout, thread::{Thread, ThreadOptions}};
/// use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
///
/// let counter = Arc::new(AtomicU32::new(0));
/// let seen = Arc::clone(&counter);
/// let worker = Thread::spawn(ThreadOptions::new("counter"), move || {
///     seen.store(42, Ordering::SeqCst);
/// })?;
///
/// worker.join(Timeout::FOREVER)?;
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// # Ok::<(), osal::Error>(())
/// ```
#[derive(Debug)]
pub struct Thread {
    shared: Arc<Shared>,
    native: StdMutex<Option<JoinHandle<()>>>,
    name: String,
}

impl Thread {
    /// Spawns a native thread running `entry`, already executing on return.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] for a priority above [`priority::MAX`] and
    /// [`Error::NoMemory`] when the host refuses to create the thread.
    pub fn spawn<F>(options: ThreadOptions, entry: F) -> Result<Thread>
    where
        F: FnOnce() + Send + 'static,
    {
        if options.priority > priority::MAX {
            return Err(Error::InvalidParam);
        }
        let native_priority = priority::to_native(options.priority);
        let stack_size = options.stack_size.max(MIN_STACK_SIZE);

        let shared = Arc::new(Shared {
            exit: StdMutex::new(ExitState::default()),
            finished: Condvar::new(),
        });
        let trampoline = Arc::clone(&shared);
        let trampoline_name = options.name.clone();

        let handle = Builder::new()
            .name(options.name.clone())
            .stack_size(stack_size)
            .spawn(move || {
                log::debug!(
                    "thread '{trampoline_name}' running (native priority {native_priority})"
                );
                let outcome = panic::catch_unwind(AssertUnwindSafe(entry));
                if outcome.is_err() {
                    log::error!("thread '{trampoline_name}' panicked");
                }
                let mut exit = lock!(trampoline.exit);
                exit.finished = true;
                exit.panicked = outcome.is_err();
                drop(exit);
                trampoline.finished.notify_all();
            })
            .map_err(|_| Error::NoMemory)?;

        Ok(Thread {
            shared,
            native: StdMutex::new(Some(handle)),
            name: options.name,
        })
    }

    /// Waits for the entry closure to return, per the timeout contract.
    ///
    /// A successful join also reaps the native handle, so with
    /// [`Timeout::FOREVER`] the call returns only after the thread has fully
    /// terminated and released its resources.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when the thread was still running at the end of
    /// the budget (the join may be retried), [`Error::InvalidParam`] for a join
    /// after a successful one, and [`Error::Backend`] when the entry panicked.
    pub fn join(&self, timeout: Timeout) -> Result<()> {
        let deadline = Deadline::start(timeout);
        let mut exit = lock!(self.shared.exit);
        loop {
            if exit.finished {
                break;
            }
            exit = match deadline.check() {
                Wait::Expired => return Err(Error::Timeout),
                Wait::Budget(remaining) => cond_wait_timeout!(self.shared.finished, exit, remaining),
                Wait::Unbounded => cond_wait!(self.shared.finished, exit),
            };
        }
        let panicked = exit.panicked;
        drop(exit);

        let Some(handle) = lock!(self.native).take() else {
            return Err(Error::InvalidParam);
        };
        let _ = handle.join();

        if panicked {
            return Err(backend_error!("thread '{}' panicked", self.name));
        }
        Ok(())
    }

    /// `true` once the entry closure has returned (or panicked).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        lock!(self.shared.exit).finished
    }

    /// The name the thread was spawned with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Puts the calling thread to sleep for at least `ms` milliseconds.
pub fn sleep_ms(ms: u32) {
    std::thread::sleep(Duration::from_millis(u64::from(ms)));
}

/// Offers the rest of the calling thread's timeslice to the scheduler.
pub fn yield_now() {
    std::thread::yield_now();
}
