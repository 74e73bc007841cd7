//! Test Scheduler for deterministic testing of time-based operators.
//!
//! Provides virtual time that only advances when explicitly instructed,
//! enabling deterministic testing of `debounce_time`, `interval`, etc.
//!
//! Each `TestScheduler` owns its own clock and task queue; clones share
//! them. There is no global state, so tests stay isolated without any
//! initialisation step.
//!
//! ```rust
//! use pushrx::{observable, scheduler::TestScheduler};
//! use std::time::Duration;
//!
//! let scheduler = TestScheduler::new();
//! observable::timer(Duration::from_millis(100), scheduler.clone())
//!   .subscribe(|v| println!("{v}"));
//!
//! // Advance virtual time to trigger the delayed emission
//! scheduler.advance_by(Duration::from_millis(100));
//!
//! // Or execute all pending tasks
//! scheduler.flush();
//! ```

use std::{cell::RefCell, rc::Rc, time::Duration};

use super::{Scheduler, TaskHandle, TaskQueue};

/// Upper bound on the tasks a single `flush` runs, so self-rescheduling
/// sources such as `interval` can't spin forever.
const MAX_FLUSH_TASKS: usize = 10_000;

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  queue: TaskQueue<Duration>,
}

/// A virtual time scheduler for deterministic testing.
#[derive(Clone, Default)]
pub struct TestScheduler(Rc<RefCell<TestSchedulerState>>);

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// Get the current virtual time.
  pub fn now(&self) -> Duration { self.0.borrow().virtual_time }

  /// Get the number of tasks still waiting to run. Cancelled tasks are not
  /// counted.
  pub fn pending_count(&self) -> usize { self.0.borrow().queue.live_count() }

  /// Advance virtual time by `duration`, running every task that falls due on
  /// the way, in deadline order.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.now() + duration;
    self.advance_to(target);
  }

  /// Advance virtual time to `target`. Does nothing if `target` is in the
  /// past.
  pub fn advance_to(&self, target: Duration) {
    loop {
      let task = self.0.borrow_mut().queue.pop_due(target);
      let Some(task) = task else { break };
      self.set_time(task.at);
      task.run();
    }
    self.set_time(target);
  }

  /// Run all pending tasks, jumping the clock to each task's deadline.
  ///
  /// Stops after an internal cap on the number of tasks; a source that keeps
  /// rescheduling itself is left pending.
  pub fn flush(&self) {
    for _ in 0..MAX_FLUSH_TASKS {
      let task = self.0.borrow_mut().queue.pop();
      let Some(task) = task else { return };
      self.set_time(task.at);
      task.run();
    }
    tracing::warn!(
      limit = MAX_FLUSH_TASKS,
      "test scheduler flush hit its task limit"
    );
  }

  /// Runs the tasks that are due at the current virtual time without
  /// advancing the clock.
  pub fn run_due(&self) { self.advance_by(Duration::ZERO) }

  /// Resets the clock to zero and drops every pending task.
  pub fn reset(&self) {
    let dropped = std::mem::take(&mut *self.0.borrow_mut());
    drop(dropped);
  }

  fn set_time(&self, at: Duration) {
    let mut state = self.0.borrow_mut();
    if at > state.virtual_time {
      state.virtual_time = at;
    }
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
    let mut state = self.0.borrow_mut();
    let at = state.virtual_time + delay;
    tracing::trace!(?at, "test scheduler task scheduled");
    state.queue.push(at, task)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::subscription::Subscription;
  use std::cell::Cell;

  #[test]
  fn virtual_time_basics() {
    let scheduler = TestScheduler::new();
    assert_eq!(scheduler.now(), Duration::ZERO);
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(scheduler.now(), Duration::from_millis(100));
  }

  #[test]
  fn tasks_run_when_due() {
    // Given
    let scheduler = TestScheduler::new();
    let executed = Rc::new(Cell::new(false));
    let c_executed = executed.clone();
    scheduler.schedule(
      Duration::from_millis(100),
      Box::new(move || c_executed.set(true)),
    );

    // When
    scheduler.advance_by(Duration::from_millis(50));

    // Then
    assert!(!executed.get());
    assert_eq!(scheduler.pending_count(), 1);

    scheduler.advance_by(Duration::from_millis(50));
    assert!(executed.get());
    assert_eq!(scheduler.pending_count(), 0);
  }

  #[test]
  fn same_deadline_runs_fifo() {
    let scheduler = TestScheduler::new();
    let order = Rc::new(RefCell::new(vec![]));
    for i in 0..3 {
      let order = order.clone();
      scheduler.schedule(
        Duration::from_millis(10),
        Box::new(move || order.borrow_mut().push(i)),
      );
    }
    scheduler.flush();
    assert_eq!(*order.borrow(), vec![0, 1, 2]);
  }

  #[test]
  fn nested_scheduling_sees_task_time() {
    let scheduler = TestScheduler::new();
    let fired_at = Rc::new(Cell::new(Duration::ZERO));
    let (c_scheduler, c_fired_at) = (scheduler.clone(), fired_at.clone());
    scheduler.schedule(
      Duration::from_millis(10),
      Box::new(move || {
        let (inner_scheduler, fired_at) =
          (c_scheduler.clone(), c_fired_at.clone());
        c_scheduler.schedule(
          Duration::from_millis(5),
          Box::new(move || fired_at.set(inner_scheduler.now())),
        );
      }),
    );
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(fired_at.get(), Duration::from_millis(15));
  }

  #[test]
  fn cancelled_task_does_not_advance_time() {
    let scheduler = TestScheduler::new();
    let handle = scheduler.schedule(
      Duration::from_millis(100),
      Box::new(|| panic!("cancelled")),
    );
    assert!(!handle.is_closed());
    handle.unsubscribe();
    scheduler.flush();
    assert_eq!(scheduler.now(), Duration::ZERO);
  }

  #[test]
  fn handle_closes_after_run() {
    let scheduler = TestScheduler::new();
    let handle = scheduler.schedule(Duration::ZERO, Box::new(|| {}));
    scheduler.run_due();
    assert!(handle.is_closed());
  }

  #[test]
  fn reset_rewinds_clock_and_drops_tasks() {
    let scheduler = TestScheduler::new();
    scheduler.advance_by(Duration::from_millis(7));
    scheduler.schedule(
      Duration::from_millis(1),
      Box::new(|| panic!("dropped")),
    );
    scheduler.reset();
    assert_eq!(scheduler.now(), Duration::ZERO);
    assert_eq!(scheduler.pending_count(), 0);
    scheduler.flush();
  }

  #[test]
  fn instances_are_isolated() {
    let a = TestScheduler::new();
    let b = TestScheduler::new();
    a.advance_by(Duration::from_millis(5));
    assert_eq!(b.now(), Duration::ZERO);
  }
}
