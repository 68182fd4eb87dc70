//! # osal Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! functions from the osal library. Import this module to get quick access to the
//! essential primitives for portable concurrent code.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all osal operations
pub use crate::Error;

/// The result type used throughout osal
pub use crate::Result;

/// The wait budget accepted by every blocking operation
pub use crate::Timeout;

// ================================================================================================
// Synchronization Primitives
// ================================================================================================

/// Recursive mutual exclusion with timed acquisition
pub use crate::sync::Mutex;

/// Bounded counting semaphore
pub use crate::sync::Semaphore;

/// Fixed-capacity FIFO message queue
pub use crate::sync::Queue;

/// Bit-flag event group and its wait vocabulary
pub use crate::sync::{Event, EventBits, WaitMode};

/// Process-wide re-entrant critical section
pub use crate::sync::critical;

// ================================================================================================
// Threads and Time
// ================================================================================================

/// Threads with timed join semantics
pub use crate::thread::{Thread, ThreadOptions};

/// Blocking sleep and cooperative yield
pub use crate::thread::{sleep_ms, yield_now};

/// Monotonic clock access
pub use crate::time::{ticks, ticks_to_ms, uptime_ms};

// ================================================================================================
// Timers and Deferred Execution
// ================================================================================================

/// One-shot / periodic callback timer
pub use crate::timer::Timer;

/// Work items, work queues and delayed work
pub use crate::work::{DelayedWork, Work, WorkQueue};
