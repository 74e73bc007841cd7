//! # pushrx: a single-threaded reactive streams core
//!
//! Push-based observables with deterministic, synchronous semantics, a
//! family of multicast subjects, composable operators and explicit teardown.
//!
//! ## Quick Start
//!
//! ```rust
//! use pushrx::prelude::*;
//!
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A cold producer; every `subscribe` runs it again |
//! | [`Subscriber`] | The handle a producer emits through |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | Multicast observable that is also an observer |
//! | [`Scheduler`] | Timer used by time-based operators |
//!
//! ## Feature Flags
//!
//! - **`local-scheduler`** (default): a real-time, single-threaded event loop
//! - **`tokio-scheduler`**: a scheduler running tasks on a tokio `LocalSet`
//!
//! [`Observable`]: observable::Observable
//! [`Subscriber`]: subscriber::Subscriber
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`Scheduler`]: scheduler::Scheduler

pub mod error;
pub mod marble;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;
