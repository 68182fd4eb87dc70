//! One-shot and periodic callback timers.
//!
//! Each [`Timer`] owns a service thread, spawned lazily on the first
//! [`Timer::start`], that sleeps until the scheduled deadline and invokes the
//! callback with no internal lock held — the callback is free to stop or restart
//! its own timer. Schedules carry a generation counter: every `start`/`stop`
//! invalidates whatever the service thread was waiting on, so a restart while a
//! delay is pending supersedes it cleanly instead of firing early.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex as StdMutex};
use std::thread::{Builder, JoinHandle};
use std::time::{Duration, Instant};

use crate::{Error, Result};

type Callback = Box<dyn FnMut() + Send + 'static>;

/// The pending schedule, plus the service thread's control flags.
#[derive(Debug)]
struct Schedule {
    running: bool,
    shutdown: bool,
    /// Bumped by every `start` and `stop`; an in-flight firing decision is only
    /// honored while its generation is still current.
    generation: u64,
    /// Next firing time; meaningful only while `running`.
    deadline: Instant,
    /// `Some` for periodic timers, `None` for one-shots.
    period: Option<Duration>,
}

struct Shared {
    schedule: StdMutex<Schedule>,
    wakeup: Condvar,
    callback: StdMutex<Callback>,
}

/// A one-shot or periodic timer delivering callbacks from a dedicated thread.
///
/// Created idle; [`Timer::start`] schedules the first firing after `initial_ms`
/// (which must be positive). With `period_ms == 0` the timer is a true one-shot:
/// it returns to idle before the callback runs, so the callback may restart it.
/// Otherwise it re-arms every `period_ms` — measured from the callback's return,
/// so firings of one timer never overlap — until [`Timer::stop`] or drop.
///
/// `stop` is idempotent, callable from the callback itself or any other thread,
/// and never waits for an in-flight firing; it only guarantees no *future* firing
/// is delivered. Dropping the timer shuts the service thread down and does wait
/// for an in-flight callback to return.
///
/// # Examples
///
/// ```rust,no_run
/// use osal::{thread, timer::Timer};
/// use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
///
/// let fired = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&fired);
/// let timer = Timer::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// timer.start(50, 0)?; // one-shot, 50ms from now
/// thread::sleep_ms(100);
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// assert!(!timer.is_running());
/// # Ok::<(), osal::Error>(())
/// ```
pub struct Timer {
    shared: Arc<Shared>,
    service: StdMutex<Option<JoinHandle<()>>>,
}

impl Timer {
    /// Creates an idle timer that will deliver `callback` on each firing.
    pub fn new<F>(callback: F) -> Timer
    where
        F: FnMut() + Send + 'static,
    {
        Timer {
            shared: Arc::new(Shared {
                schedule: StdMutex::new(Schedule {
                    running: false,
                    shutdown: false,
                    generation: 0,
                    deadline: Instant::now(),
                    period: None,
                }),
                wakeup: Condvar::new(),
                callback: StdMutex::new(Box::new(callback)),
            }),
            service: StdMutex::new(None),
        }
    }

    /// Schedules the timer: first firing after `initial_ms`, then every
    /// `period_ms` (one-shot when `period_ms == 0`).
    ///
    /// Starting a timer that is already running supersedes the pending schedule —
    /// the superseded firing is never delivered, early or otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParam`] when `initial_ms` is zero and
    /// [`Error::NoMemory`] when the service thread cannot be spawned (the timer is
    /// left idle and `start` may be retried).
    pub fn start(&self, initial_ms: u32, period_ms: u32) -> Result<()> {
        if initial_ms == 0 {
            return Err(Error::InvalidParam);
        }

        let mut service = lock!(self.service);
        if service.is_none() {
            let shared = Arc::clone(&self.shared);
            let handle = Builder::new()
                .name("osal-timer".to_string())
                .spawn(move || service_loop(&shared))
                .map_err(|_| Error::NoMemory)?;
            log::debug!("timer service thread started");
            *service = Some(handle);
        }
        drop(service);

        let mut schedule = lock!(self.shared.schedule);
        schedule.generation += 1;
        schedule.running = true;
        schedule.deadline = Instant::now() + Duration::from_millis(u64::from(initial_ms));
        schedule.period = (period_ms > 0).then(|| Duration::from_millis(u64::from(period_ms)));
        drop(schedule);
        self.shared.wakeup.notify_all();
        Ok(())
    }

    /// Cancels the pending schedule; idempotent, and a no-op on an idle timer.
    ///
    /// A firing already in flight is not retracted, but nothing fires after the
    /// call returns. Never blocks on the callback.
    pub fn stop(&self) {
        let mut schedule = lock!(self.shared.schedule);
        schedule.generation += 1;
        schedule.running = false;
        drop(schedule);
        self.shared.wakeup.notify_all();
    }

    /// `true` while a firing is scheduled.
    ///
    /// Reflects the schedule only: a one-shot reads idle from the moment its
    /// callback is dispatched, and a currently-executing callback is not visible
    /// here.
    #[must_use]
    pub fn is_running(&self) -> bool {
        lock!(self.shared.schedule).running
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schedule = lock!(self.shared.schedule);
        f.debug_struct("Timer")
            .field("running", &schedule.running)
            .field("period", &schedule.period)
            .finish_non_exhaustive()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        {
            let mut schedule = lock!(self.shared.schedule);
            schedule.shutdown = true;
            schedule.running = false;
        }
        self.shared.wakeup.notify_all();
        if let Some(service) = lock!(self.service).take() {
            let _ = service.join();
        }
    }
}

/// Body of the per-timer service thread.
///
/// Parks while idle, sleeps until the deadline while armed, and re-evaluates the
/// whole schedule on every wakeup — a wakeup only ever means "look again", so
/// spurious signals and superseded schedules cannot cause a firing.
fn service_loop(shared: &Shared) {
    let mut schedule = lock!(shared.schedule);
    loop {
        if schedule.shutdown {
            return;
        }
        if !schedule.running {
            schedule = cond_wait!(shared.wakeup, schedule);
            continue;
        }
        let now = Instant::now();
        if now < schedule.deadline {
            let budget = schedule.deadline - now;
            schedule = cond_wait_timeout!(shared.wakeup, schedule, budget);
            continue;
        }

        // The deadline of the current schedule has passed. Capture its generation
        // so a stop/restart issued from inside the callback is not clobbered below.
        let generation = schedule.generation;
        if schedule.period.is_none() {
            // One-shot: idle before the callback runs, so it may restart the timer.
            schedule.running = false;
        }
        drop(schedule);

        {
            let mut callback = lock!(shared.callback);
            if panic::catch_unwind(AssertUnwindSafe(|| (*callback)())).is_err() {
                log::error!("timer callback panicked");
            }
        }

        schedule = lock!(shared.schedule);
        if schedule.generation == generation && schedule.running {
            if let Some(period) = schedule.period {
                schedule.deadline = Instant::now() + period;
            }
        }
    }
}
