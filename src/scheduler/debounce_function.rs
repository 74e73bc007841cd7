use std::{cell::RefCell, rc::Rc, time::Duration};

use super::{Scheduler, TaskHandle};
use crate::subscription::Subscription;

/// A debounced wrapper around a function, created by [`debounce_function`].
///
/// Clones share the pending call.
pub struct Debounced<A, S> {
  inner: Rc<DebouncedInner<A, S>>,
}

struct DebouncedInner<A, S> {
  f: Rc<dyn Fn(A)>,
  delay: Duration,
  scheduler: S,
  pending: RefCell<Option<TaskHandle>>,
}

impl<A, S> Clone for Debounced<A, S> {
  fn clone(&self) -> Self { Debounced { inner: self.inner.clone() } }
}

/// Wraps `f` so that a burst of calls results in a single invocation with the
/// latest arguments, `delay` after the last call of the burst.
///
/// ```
/// use pushrx::scheduler::{debounce_function, TestScheduler};
/// use std::{cell::Cell, rc::Rc, time::Duration};
///
/// let scheduler = TestScheduler::new();
/// let last = Rc::new(Cell::new(0));
/// let c_last = last.clone();
/// let save = debounce_function(
///   move |v: i32| c_last.set(v),
///   Duration::from_millis(10),
///   scheduler.clone(),
/// );
/// save.call(1);
/// save.call(2);
/// scheduler.advance_by(Duration::from_millis(10));
/// assert_eq!(last.get(), 2);
/// ```
pub fn debounce_function<A, S>(
  f: impl Fn(A) + 'static,
  delay: Duration,
  scheduler: S,
) -> Debounced<A, S>
where
  A: 'static,
  S: Scheduler,
{
  Debounced {
    inner: Rc::new(DebouncedInner {
      f: Rc::new(f),
      delay,
      scheduler,
      pending: RefCell::new(None),
    }),
  }
}

impl<A: 'static, S: Scheduler> Debounced<A, S> {
  /// Schedules a call with `args`, replacing any call still pending.
  pub fn call(&self, args: A) {
    self.cancel();
    let f = self.inner.f.clone();
    let handle = self.inner.scheduler.schedule(
      self.inner.delay,
      Box::new(move || f(args)),
    );
    *self.inner.pending.borrow_mut() = Some(handle);
  }

  /// Drops the pending call, if any.
  pub fn cancel(&self) {
    let pending = self.inner.pending.borrow_mut().take();
    if let Some(handle) = pending {
      handle.unsubscribe();
    }
  }

  /// Whether a call is waiting to run.
  pub fn is_pending(&self) -> bool {
    self.inner.pending.borrow().as_ref().is_some_and(|h| !h.is_closed())
  }
}
