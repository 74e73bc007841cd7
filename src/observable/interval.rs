use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{
  observable::Observable,
  scheduler::{Scheduler, TaskHandle},
  subscriber::Subscriber,
  subscription::Subscription,
};

/// Creates an observable which emits sequential numbers every `period` on
/// `scheduler`, starting with 0 after the first period.
///
/// The timer is cancelled when the subscription ends.
///
/// # Panics
///
/// Panics if `period` is zero.
pub fn interval<S>(period: Duration, scheduler: S) -> Observable<usize>
where
  S: Scheduler + Clone + 'static,
{
  assert!(!period.is_zero(), "interval period must be greater than zero");
  Observable::new(move |subscriber| {
    tracing::debug!(?period, "interval started");
    let current = Rc::new(RefCell::new(TaskHandle::default()));
    let c_current = current.clone();
    subscriber.signal().add_teardown(move || {
      tracing::debug!("interval stopped");
      c_current.borrow().unsubscribe();
    });
    tick(subscriber, scheduler.clone(), period, 0, current);
  })
}

fn tick<S>(
  subscriber: Subscriber<usize>,
  scheduler: S,
  period: Duration,
  count: usize,
  current: Rc<RefCell<TaskHandle>>,
) where
  S: Scheduler + Clone + 'static,
{
  if subscriber.is_closed() {
    return;
  }
  let c_scheduler = scheduler.clone();
  let c_current = current.clone();
  let handle = scheduler.schedule(
    period,
    Box::new(move || {
      subscriber.next(count);
      tick(subscriber, c_scheduler, period, count + 1, c_current);
    }),
  );
  *current.borrow_mut() = handle;
}

/// Creates an observable that emits 0 once after `delay` and completes.
pub fn timer<S>(delay: Duration, scheduler: S) -> Observable<usize>
where
  S: Scheduler + 'static,
{
  Observable::new(move |subscriber| {
    let c_subscriber = subscriber.clone();
    let handle = scheduler.schedule(
      delay,
      Box::new(move || {
        c_subscriber.next(0);
        c_subscriber.complete();
      }),
    );
    subscriber.signal().add(handle);
  })
}
