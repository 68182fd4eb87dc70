// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # osal
//!
//! [![Crates.io](https://img.shields.io/crates/v/osal.svg)](https://crates.io/crates/osal)
//! [![Documentation](https://docs.rs/osal/badge.svg)](https://docs.rs/osal)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/osal/blob/main/LICENSE-APACHE)
//!
//! Portable concurrency and timing primitives over native threads. `osal` is the kind of
//! abstraction layer device firmware builds once and reuses everywhere: a small, closed set of
//! primitives — recursive mutexes, counting semaphores, message queues, event groups, timers and
//! work queues — with one shared timeout contract and one shared status vocabulary, so code
//! written against it ports across schedulers without touching its concurrency logic.
//!
//! ## Features
//!
//! - **⏱ One timeout contract** - every blocking call takes a [`Timeout`]: poll (`NO_WAIT`),
//!   a millisecond budget, or block indefinitely (`FOREVER`)
//! - **🔁 Recursive locking** - [`sync::Mutex`] lets the holder re-acquire; the process-wide
//!   [`sync::critical`] section nests the same way
//! - **📨 Value-copied messaging** - [`sync::Queue`] moves data by value between threads,
//!   strict FIFO across any number of producers and consumers
//! - **🚩 Event groups** - [`sync::Event`] packs 32 flags with wait-any / wait-all semantics
//! - **⏰ Callback timers** - [`timer::Timer`] delivers one-shot or periodic callbacks from a
//!   dedicated thread, with restart-safe scheduling
//! - **🧵 Deferred execution** - [`work::WorkQueue`], [`work::Work`] and [`work::DelayedWork`]
//!   move blocking operations out of contexts that must not block
//! - **🛡️ No panics for expected conditions** - everything fallible returns [`Result`]
//!
//! ## Quick Start
//!
//! Add `osal` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! osal = "0.3"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use osal::prelude::*;
//! use std::sync::Arc;
//!
//! let queue: Arc<Queue<u32>> = Arc::new(Queue::new(8)?);
//!
//! let producer = Arc::clone(&queue);
//! let worker = Thread::spawn(ThreadOptions::new("producer"), move || {
//!     let _ = producer.send(&7, Timeout::FOREVER);
//! })?;
//!
//! assert_eq!(queue.recv(Timeout::millis(500))?, 7);
//! worker.join(Timeout::FOREVER)?;
//! # Ok::<(), osal::Error>(())
//! ```
//!
//! ### Deferring Work
//!
//! Callback contexts that must not block package the blocking part as a work item:
//!
//! ```rust,no_run
//! use osal::work::{DelayedWork, Work};
//!
//! let flush = Work::new(|| {
//!     // runs on the system work queue's thread
//! });
//! flush.submit()?;
//!
//! let retry = DelayedWork::new(|| {
//!     // runs 250ms from now, unless cancelled first
//! });
//! retry.submit(250)?;
//! # Ok::<(), osal::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `osal` is organized into a handful of small modules:
//!
//! - [`prelude`] - Convenient re-exports of the commonly used types
//! - [`sync`] - Mutex, semaphore, queue, event group and the critical section
//! - [`thread`] - Thread spawning with timed join, sleep and yield
//! - [`time`] - The [`Timeout`] vocabulary and the monotonic clock
//! - [`timer`] - One-shot / periodic callback timers
//! - [`work`] - Work items, work queues and delayed work
//! - [`Error`] and [`Result`] - The closed status vocabulary
//!
//! The layering is deliberate: [`timer`] and [`work`] are built *from* [`thread`] and
//! [`sync::Queue`], not beside them, mirroring how such layers are stacked on an RTOS. The
//! system work queue is a process-wide singleton created on first submission.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) with a closed, matchable error set:
//!
//! ```rust
//! use osal::{Error, Timeout, sync::Semaphore};
//!
//! let tokens = Semaphore::new(0, 4)?;
//! match tokens.take(Timeout::millis(50)) {
//!     Ok(()) => println!("token acquired"),
//!     Err(Error::Timeout) => println!("still busy"), // expected, recoverable
//!     Err(e) => eprintln!("failure: {e}"),
//! }
//! # Ok::<(), osal::Error>(())
//! ```
//!
//! [`Error::Timeout`] is an expected outcome, not a failure; blocking callers are meant to
//! match on it. Programmer errors surface as [`Error::InvalidParam`] synchronously, before
//! any blocking happens.
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and functions.
///
/// # Example
///
/// ```rust
/// use osal::prelude::*;
///
/// let sem = Semaphore::new(1, 1)?;
/// sem.take(Timeout::NO_WAIT)?;
/// # Ok::<(), osal::Error>(())
/// ```
pub mod prelude;

/// Blocking synchronization primitives.
///
/// - [`sync::Mutex`] - recursive mutual exclusion with timed acquisition
/// - [`sync::Semaphore`] - bounded counting signal
/// - [`sync::Queue`] - fixed-capacity FIFO passing messages by value
/// - [`sync::Event`] - 32-bit flag group with wait-any / wait-all
/// - [`sync::critical`] - process-wide re-entrant critical section
pub mod sync;

/// Threads with timed join semantics, plus sleep and yield.
///
/// [`thread::Thread::spawn`] starts a named native thread immediately;
/// [`thread::Thread::join`] waits under the [`Timeout`] contract. The portable
/// priority range and its native mapping live in [`thread::priority`].
pub mod thread;

/// The [`Timeout`] vocabulary and monotonic clock access.
pub mod time;

/// One-shot and periodic callback timers.
///
/// A [`timer::Timer`] delivers its callback from a dedicated service thread with no
/// internal lock held, so callbacks may stop or restart their own timer freely.
pub mod timer;

/// Work queues and deferred execution.
///
/// [`work::Work`] items run on a [`work::WorkQueue`] (or the lazily-created system
/// queue); [`work::DelayedWork`] defers submission by a millisecond delay with
/// best-effort cancellation.
pub mod work;

/// `osal` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `osal` Error type
///
/// The closed status vocabulary of the crate. [`Error::Timeout`] is the expected outcome
/// of a bounded wait that ran out; the other variants mark programmer errors, resource
/// exhaustion and native-layer failures.
pub use error::Error;

/// The wait budget accepted by every blocking operation.
///
/// Construct with [`Timeout::millis`], or use the sentinels [`Timeout::NO_WAIT`] and
/// [`Timeout::FOREVER`].
pub use time::Timeout;
