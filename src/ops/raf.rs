use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
  observable::Observable,
  ops::lift_with,
  scheduler::{Scheduler, TaskHandle},
  subscription::Subscription,
};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Defers values to the next turn of `scheduler`, emitting only the latest
  /// value received during the current turn. Typically paired with a
  /// scheduler that runs once per rendered frame.
  ///
  /// A value still waiting when the source completes is emitted before the
  /// completion.
  pub fn raf<S>(self, scheduler: S) -> Observable<T, E>
  where
    S: Scheduler + Clone + 'static,
  {
    Observable::new(move |subscriber| {
      let latest: Rc<RefCell<Option<T>>> = Rc::default();
      let frame: Rc<RefCell<Option<TaskHandle>>> = Rc::default();
      let c_frame = frame.clone();
      subscriber.signal().add_teardown(move || {
        let handle = c_frame.borrow_mut().take();
        if let Some(handle) = handle {
          handle.unsubscribe();
        }
      });

      let scheduler = scheduler.clone();
      let (n_latest, c_latest) = (latest.clone(), latest);
      lift_with(
        &self,
        subscriber,
        move |d, v| {
          *n_latest.borrow_mut() = Some(v);
          let scheduled = frame
            .borrow()
            .as_ref()
            .is_some_and(|h| !h.is_closed());
          if scheduled {
            return;
          }
          let (d, latest) = (d.clone(), n_latest.clone());
          let handle = scheduler.schedule(
            Duration::ZERO,
            Box::new(move || {
              let value = latest.borrow_mut().take();
              if let Some(value) = value {
                d.next(value);
              }
            }),
          );
          *frame.borrow_mut() = Some(handle);
        },
        move |d| {
          let value = c_latest.borrow_mut().take();
          if let Some(value) = value {
            d.next(value);
          }
          d.complete();
        },
      );
    })
  }
}

pub fn raf<T, E, S>(
  scheduler: S,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: 'static,
  S: Scheduler + Clone + 'static,
{
  move |source| source.raf(scheduler)
}
