//! Blocking synchronization primitives.
//!
//! Everything in this module follows the same construction: plain state behind one
//! internal lock, condition variables for the waiters, and the shared timeout contract
//! of [`crate::Timeout`] deciding how long a blocked caller stays blocked. All types are
//! safe to share across threads through `&self`.
//!
//! # Primitives
//!
//! - [`Mutex`] — recursive mutual exclusion with timed acquisition
//! - [`Semaphore`] — bounded counting signal
//! - [`Queue`] — fixed-capacity FIFO passing messages by value
//! - [`Event`] — 32-bit flag group with wait-any / wait-all
//! - [`critical`] — process-wide re-entrant critical section

pub mod critical;
pub mod event;
pub mod mutex;
pub mod queue;
pub mod semaphore;

pub use critical::CriticalKey;
pub use event::{Event, EventBits, WaitMode};
pub use mutex::Mutex;
pub use queue::Queue;
pub use semaphore::Semaphore;
