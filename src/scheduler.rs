//! Timers for time-based operators.
//!
//! A [`Scheduler`] runs a task once after a delay and hands back a
//! [`TaskHandle`]; unsubscribing the handle cancels the task if it has not
//! run yet. Time-based operators (`debounce_time`, `throttle_time`, `raf`,
//! `interval`, `timer`) take a scheduler by value so tests can inject a
//! [`TestScheduler`] and drive virtual time explicitly.

use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

use crate::subscription::{LocalSubscription, Subscription};

mod debounce_function;
#[cfg(feature = "local-scheduler")]
mod local_scheduler;
mod test_scheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

pub use debounce_function::{debounce_function, Debounced};
#[cfg(feature = "local-scheduler")]
pub use local_scheduler::LocalScheduler;
pub use test_scheduler::TestScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// Cancels a scheduled task when unsubscribed. It reports closed once the
/// task has run or was cancelled.
pub type TaskHandle = LocalSubscription;

/// A Scheduler is an object to order tasks and schedule their execution.
pub trait Scheduler {
  /// Runs `task` once, `delay` from now.
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle;
}

/// A task waiting in a time-ordered queue.
///
/// Ordered so that a `BinaryHeap` pops the earliest deadline first, and
/// tasks with the same deadline in the order they were scheduled.
pub(crate) struct TimedTask<K> {
  pub(crate) at: K,
  pub(crate) id: usize,
  pub(crate) task: Box<dyn FnOnce()>,
  pub(crate) handle: TaskHandle,
}

impl<K: Ord> PartialEq for TimedTask<K> {
  fn eq(&self, other: &Self) -> bool {
    self.at == other.at && self.id == other.id
  }
}

impl<K: Ord> Eq for TimedTask<K> {}

impl<K: Ord> PartialOrd for TimedTask<K> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<K: Ord> Ord for TimedTask<K> {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by id
    other.at.cmp(&self.at).then_with(|| other.id.cmp(&self.id))
  }
}

/// The pending tasks of a single-threaded scheduler.
pub(crate) struct TaskQueue<K> {
  heap: BinaryHeap<TimedTask<K>>,
  next_id: usize,
}

impl<K: Ord> Default for TaskQueue<K> {
  fn default() -> Self { TaskQueue { heap: BinaryHeap::new(), next_id: 0 } }
}

impl<K: Ord + Copy> TaskQueue<K> {
  pub(crate) fn push(&mut self, at: K, task: Box<dyn FnOnce()>) -> TaskHandle {
    let handle = TaskHandle::default();
    let id = self.next_id;
    self.next_id += 1;
    self.heap.push(TimedTask { at, id, task, handle: handle.clone() });
    handle
  }

  /// Removes cancelled tasks from the head and returns the deadline of the
  /// next live task.
  pub(crate) fn peek_at(&mut self) -> Option<K> {
    while let Some(head) = self.heap.peek() {
      if head.handle.is_closed() {
        self.heap.pop();
      } else {
        return Some(head.at);
      }
    }
    None
  }

  /// Pops the next live task if its deadline is not after `limit`.
  pub(crate) fn pop_due(&mut self, limit: K) -> Option<TimedTask<K>> {
    match self.peek_at() {
      Some(at) if at <= limit => self.heap.pop(),
      _ => None,
    }
  }

  pub(crate) fn pop(&mut self) -> Option<TimedTask<K>> {
    self.peek_at()?;
    self.heap.pop()
  }

  pub(crate) fn live_count(&self) -> usize {
    self.heap.iter().filter(|t| !t.handle.is_closed()).count()
  }
}

impl<K> TimedTask<K> {
  /// Marks the handle finished and runs the task.
  pub(crate) fn run(self) {
    self.handle.unsubscribe();
    (self.task)();
  }
}
