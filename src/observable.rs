use std::{fmt::Debug, rc::Rc};

use crate::{
  error::RxError,
  observer::{unhandled_error, FnObserver, Observer},
  subscriber::Subscriber,
  subscription::{LocalSubscription, SubscriptionWrapper},
};

mod factory;
mod from_async;
mod interval;
mod into_future;
pub use factory::*;
pub use from_async::*;
pub use interval::*;
pub use into_future::*;

/// A representation of any set of values over any amount of time. This is the
/// most basic building block of pushrx.
///
/// An observable is a cheap, cloneable wrapper around a producer function.
/// Nothing runs until `subscribe` is called, and every subscription runs the
/// producer again from scratch.
pub struct Observable<T, E = RxError> {
  producer: Rc<dyn Fn(Subscriber<T, E>)>,
}

impl<T, E> Clone for Observable<T, E> {
  fn clone(&self) -> Self { Observable { producer: self.producer.clone() } }
}

impl<T: 'static, E: 'static> Observable<T, E> {
  /// param `producer`: the function that is called when the Observable is
  /// subscribed to. It is given a Subscriber, to which new values can be
  /// `next`ed, or an `error` method can be called to raise an error, or
  /// `complete` can be called to notify of a successful completion. Cleanup
  /// logic goes onto `subscriber.signal()`.
  pub fn new(producer: impl Fn(Subscriber<T, E>) + 'static) -> Self {
    Observable { producer: Rc::new(producer) }
  }

  /// Like `new`, but an `Err` returned by the producer is delivered to the
  /// subscriber as an error notification.
  pub fn try_new(
    producer: impl Fn(&Subscriber<T, E>) -> Result<(), E> + 'static,
  ) -> Self {
    Observable::new(move |subscriber| {
      if let Err(err) = producer(&subscriber) {
        subscriber.error(err);
      }
    })
  }

  /// Returns true when both observables run the same producer.
  pub fn ptr_eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.producer, &other.producer)
  }

  /// Runs the producer against an existing subscriber. Operators use this to
  /// chain subscribers together.
  #[inline]
  pub fn subscribe_with(&self, subscriber: Subscriber<T, E>) {
    (self.producer)(subscriber)
  }

  pub fn subscribe_observer(
    &self,
    observer: impl Observer<T, E> + 'static,
  ) -> SubscriptionWrapper<LocalSubscription> {
    let signal = LocalSubscription::default();
    self.subscribe_with(Subscriber::new(observer, signal.clone()));
    SubscriptionWrapper(signal)
  }

  /// Subscribes with a value handler only. An error reaching this subscriber
  /// has nowhere to go.
  ///
  /// # Panics
  ///
  /// Panics when the observable errors.
  pub fn subscribe(
    &self,
    next: impl Fn(T) + 'static,
  ) -> SubscriptionWrapper<LocalSubscription>
  where
    E: Debug,
  {
    self.subscribe_observer(FnObserver::new(next, unhandled_error::<E>, || {}))
  }

  pub fn subscribe_err(
    &self,
    next: impl Fn(T) + 'static,
    error: impl Fn(E) + 'static,
  ) -> SubscriptionWrapper<LocalSubscription> {
    self.subscribe_observer(FnObserver::new(next, error, || {}))
  }

  /// # Panics
  ///
  /// Panics when the observable errors.
  pub fn subscribe_complete(
    &self,
    next: impl Fn(T) + 'static,
    complete: impl Fn() + 'static,
  ) -> SubscriptionWrapper<LocalSubscription>
  where
    E: Debug,
  {
    self.subscribe_observer(
      FnObserver::new(next, unhandled_error::<E>, complete),
    )
  }

  pub fn subscribe_err_complete(
    &self,
    next: impl Fn(T) + 'static,
    error: impl Fn(E) + 'static,
    complete: impl Fn() + 'static,
  ) -> SubscriptionWrapper<LocalSubscription> {
    self.subscribe_observer(FnObserver::new(next, error, complete))
  }

  /// Applies an operator to this observable.
  ///
  /// ```
  /// use pushrx::{observable, ops};
  ///
  /// let doubled =
  ///   observable::from_iter([1, 2, 3]).pipe(ops::map(|v: i32| v * 2));
  /// doubled.subscribe(|v| println!("{v}"));
  /// ```
  #[inline]
  pub fn pipe<U, E2>(
    self,
    op: impl FnOnce(Self) -> Observable<U, E2>,
  ) -> Observable<U, E2> {
    op(self)
  }
}

/// Composes operators left to right into a single operator.
///
/// `pipe!()` is the identity operator.
///
/// ```
/// use pushrx::{observable, ops, pipe};
///
/// let source = observable::from_iter([1, 2, 3]);
/// source
///   .pipe(pipe!(ops::map(|v: i32| v * 2), ops::filter(|v: &i32| *v > 2)))
///   .subscribe(|v| println!("{v}"));
/// ```
#[macro_export]
macro_rules! pipe {
  () => {
    |source| source
  };
  ($($op:expr),+ $(,)?) => {
    move |source| {
      $(let source = $crate::observable::Observable::pipe(source, $op);)+
      source
    }
  };
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ops, prelude::*};
  use std::cell::{Cell, RefCell};

  #[test]
  fn proxy_call() {
    let next = Rc::new(Cell::new(0));
    let err = Rc::new(Cell::new(0));
    let complete = Rc::new(Cell::new(0));
    let (c_next, c_err, c_complete) =
      (next.clone(), err.clone(), complete.clone());

    Observable::new(|subscriber: Subscriber<i32, &str>| {
      subscriber.next(1);
      subscriber.next(2);
      subscriber.next(3);
      subscriber.complete();
      subscriber.next(3);
      subscriber.error("never dispatch error");
    })
    .subscribe_err_complete(
      move |_| c_next.set(c_next.get() + 1),
      move |_| c_err.set(c_err.get() + 1),
      move || c_complete.set(c_complete.get() + 1),
    );

    assert_eq!(next.get(), 3);
    assert_eq!(complete.get(), 1);
    assert_eq!(err.get(), 0);
  }

  #[test]
  fn cold_subscriptions_rerun_producer() {
    let runs = Rc::new(Cell::new(0));
    let c_runs = runs.clone();
    let obs = Observable::<i32>::new(move |s| {
      c_runs.set(c_runs.get() + 1);
      s.complete();
    });
    obs.subscribe(|_| {});
    obs.subscribe(|_| {});
    assert_eq!(runs.get(), 2);
  }

  #[test]
  fn try_new_routes_error() {
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    Observable::<i32>::try_new(|s| {
      s.next(1);
      Err(RxError::from("producer failed"))
    })
    .subscribe_err(|_| {}, move |e| c_errors.borrow_mut().push(e));
    assert_eq!(*errors.borrow(), vec![RxError::from("producer failed")]);
  }

  #[test]
  #[should_panic(expected = "unhandled error in observable")]
  fn unhandled_error_is_raised() {
    observable::throw_error::<i32, _>(RxError::from("boom")).subscribe(|_| {});
  }

  #[test]
  fn unsubscribe_runs_teardown_once() {
    let teardowns = Rc::new(Cell::new(0));
    let c_teardowns = teardowns.clone();
    let subscription = Observable::<i32>::new(move |s| {
      let c_teardowns = c_teardowns.clone();
      s.signal().add_teardown(move || c_teardowns.set(c_teardowns.get() + 1));
    })
    .subscribe(|_| {});

    subscription.unsubscribe();
    subscription.unsubscribe();
    assert_eq!(teardowns.get(), 1);
    assert!(subscription.is_closed());
  }

  #[test]
  fn pipe_composes_operators() {
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());

    observable::from_iter([1, 2, 3])
      .pipe(pipe!(ops::map(|v: i32| v * 2), ops::filter(|v: &i32| *v > 2)))
      .subscribe_complete(
        move |v| c_values.borrow_mut().push(v),
        move || c_completed.set(true),
      );

    assert_eq!(*values.borrow(), vec![4, 6]);
    assert!(completed.get());
  }

  #[test]
  fn empty_pipe_is_identity() {
    let source = observable::of(1);
    let piped = source.clone().pipe(pipe!());
    assert!(piped.ptr_eq(&source));
  }
}
