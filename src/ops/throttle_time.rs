use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
  observable::Observable,
  ops::lift,
  scheduler::{Scheduler, TaskHandle},
  subscription::Subscription,
};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Emits a value, then ignores subsequent source values for `duration`.
  ///
  /// Only the leading value of each window is emitted; values dropped inside
  /// a window are not replayed when it closes.
  pub fn throttle_time<S>(
    self,
    duration: Duration,
    scheduler: S,
  ) -> Observable<T, E>
  where
    S: Scheduler + Clone + 'static,
  {
    Observable::new(move |subscriber| {
      let window: Rc<RefCell<Option<TaskHandle>>> = Rc::default();
      let c_window = window.clone();
      subscriber.signal().add_teardown(move || {
        let handle = c_window.borrow_mut().take();
        if let Some(handle) = handle {
          handle.unsubscribe();
        }
      });

      let scheduler = scheduler.clone();
      lift(&self, subscriber, move |d, v| {
        let open = window.borrow().as_ref().is_some_and(|h| !h.is_closed());
        if open {
          return;
        }
        // the window closes when this no-op task has run
        let handle = scheduler.schedule(duration, Box::new(|| {}));
        *window.borrow_mut() = Some(handle);
        d.next(v);
      });
    })
  }
}

pub fn throttle_time<T, E, S>(
  duration: Duration,
  scheduler: S,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: 'static,
  S: Scheduler + Clone + 'static,
{
  move |source| source.throttle_time(duration, scheduler)
}
