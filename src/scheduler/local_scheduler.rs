use std::{
  cell::RefCell,
  rc::Rc,
  time::{Duration, Instant},
};

use super::{Scheduler, TaskHandle, TaskQueue};

/// A real-time scheduler driving a single-threaded event loop.
///
/// Tasks are queued by deadline; `run` executes them in order on the calling
/// thread, sleeping until the next deadline, and returns once no task is left.
///
/// ```rust
/// use pushrx::{observable, scheduler::LocalScheduler};
/// use std::time::Duration;
///
/// let scheduler = LocalScheduler::new();
/// observable::interval(Duration::from_millis(1), scheduler.clone())
///   .take(3)
///   .subscribe(|v| println!("{v}"));
/// scheduler.run();
/// ```
#[derive(Clone, Default)]
pub struct LocalScheduler(Rc<RefCell<TaskQueue<Instant>>>);

impl LocalScheduler {
  pub fn new() -> Self { Self::default() }

  /// Runs tasks until the queue is empty.
  pub fn run(&self) {
    loop {
      let next = self.0.borrow_mut().peek_at();
      let Some(at) = next else { return };
      let now = Instant::now();
      if at > now {
        std::thread::sleep(at - now);
      }
      self.run_due();
    }
  }

  /// Runs the tasks whose deadline has passed, without blocking.
  pub fn run_due(&self) {
    let now = Instant::now();
    loop {
      let task = self.0.borrow_mut().pop_due(now);
      let Some(task) = task else { return };
      task.run();
    }
  }

  pub fn pending_count(&self) -> usize { self.0.borrow().live_count() }
}

impl Scheduler for LocalScheduler {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
    tracing::trace!(?delay, "local scheduler task scheduled");
    self.0.borrow_mut().push(Instant::now() + delay, task)
  }
}
