//! Process-wide re-entrant critical section.
//!
//! One global lock serializes every critical section in the process, the hosted
//! stand-in for masking interrupts on a bare-metal target. Sections nest: a thread
//! already inside may enter again without deadlocking, and the section ends when the
//! innermost key is released. On a hosted scheduler this degrades to pure mutual
//! exclusion between threads that use it — it cannot stop preemption itself.

use std::marker::PhantomData;
use std::sync::{Condvar, Mutex as StdMutex};
use std::thread::{self, ThreadId};

/// Nesting book-keeping for the single process-wide section.
struct CriticalState {
    owner: Option<ThreadId>,
    depth: u32,
}

static STATE: StdMutex<CriticalState> = StdMutex::new(CriticalState {
    owner: None,
    depth: 0,
});
static FREED: Condvar = Condvar::new();

/// Proof of being inside the critical section.
///
/// Each [`enter`] produces one key; dropping it (or passing it to [`exit`]) leaves one
/// nesting level. The key cannot move to another thread, so the section is always
/// exited by the thread that entered it. Release keys in reverse order of acquisition.
#[must_use = "the critical section ends when the key is dropped"]
#[derive(Debug)]
pub struct CriticalKey {
    /// Nesting level this key holds, `1` for the outermost.
    level: u32,
    /// Keys are meaningless on any other thread.
    _not_send: PhantomData<*const ()>,
}

impl CriticalKey {
    /// The nesting level this key holds; the outermost key is level 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }
}

impl Drop for CriticalKey {
    fn drop(&mut self) {
        let mut state = lock!(STATE);
        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            FREED.notify_one();
        }
    }
}

/// Enters the process-wide critical section, blocking until it is available.
///
/// Re-entrant: a thread already inside enters immediately at one deeper nesting
/// level. There is no timeout — critical sections are expected to be short.
///
/// # Examples
///
/// ```rust
/// use osal::sync::critical;
///
/// let outer = critical::enter();
/// let inner = critical::enter(); // same thread: nests, no deadlock
/// assert_eq!(inner.level(), outer.level() + 1);
/// critical::exit(inner);
/// critical::exit(outer); // other threads may enter only now
/// ```
pub fn enter() -> CriticalKey {
    let me = thread::current().id();
    let mut state = lock!(STATE);
    loop {
        match state.owner {
            None => {
                state.owner = Some(me);
                state.depth = 1;
                return CriticalKey {
                    level: 1,
                    _not_send: PhantomData,
                };
            }
            Some(owner) if owner == me => {
                state.depth += 1;
                return CriticalKey {
                    level: state.depth,
                    _not_send: PhantomData,
                };
            }
            Some(_) => state = cond_wait!(FREED, state),
        }
    }
}

/// Leaves one nesting level of the critical section.
///
/// Equivalent to dropping the key; provided for call sites that prefer the explicit
/// enter/exit pairing.
pub fn exit(key: CriticalKey) {
    drop(key);
}
