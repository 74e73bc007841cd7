use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
  observable::Observable,
  ops::lift_with,
  scheduler::{Scheduler, TaskHandle},
  subscription::Subscription,
};

type RcHandler = Rc<RefCell<Option<TaskHandle>>>;

fn cancel(task_handler: &RcHandler) {
  let handle = task_handler.borrow_mut().take();
  if let Some(handle) = handle {
    handle.unsubscribe();
  }
}

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Emits a value only after `duration` has passed without another source
  /// emission.
  ///
  /// A value still waiting when the source completes is emitted before the
  /// completion; an error discards it.
  pub fn debounce_time<S>(
    self,
    duration: Duration,
    scheduler: S,
  ) -> Observable<T, E>
  where
    S: Scheduler + Clone + 'static,
  {
    Observable::new(move |subscriber| {
      let trailing_value: Rc<RefCell<Option<T>>> = Rc::default();
      let task_handler: RcHandler = Rc::default();
      let c_task_handler = task_handler.clone();
      subscriber.signal().add_teardown(move || cancel(&c_task_handler));

      let scheduler = scheduler.clone();
      let (n_value, c_value) = (trailing_value.clone(), trailing_value);
      let (n_handler, c_handler) = (task_handler.clone(), task_handler);
      lift_with(
        &self,
        subscriber,
        move |d, v| {
          cancel(&n_handler);
          *n_value.borrow_mut() = Some(v);
          let (d, value) = (d.clone(), n_value.clone());
          let handle = scheduler.schedule(
            duration,
            Box::new(move || {
              let value = value.borrow_mut().take();
              if let Some(value) = value {
                d.next(value);
              }
            }),
          );
          *n_handler.borrow_mut() = Some(handle);
        },
        move |d| {
          cancel(&c_handler);
          let value = c_value.borrow_mut().take();
          if let Some(value) = value {
            d.next(value);
          }
          d.complete();
        },
      );
    })
  }
}

pub fn debounce_time<T, E, S>(
  duration: Duration,
  scheduler: S,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: 'static,
  S: Scheduler + Clone + 'static,
{
  move |source| source.debounce_time(duration, scheduler)
}
