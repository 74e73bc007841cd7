use std::{cell::RefCell, rc::Rc};

use crate::{
  error::RxError,
  observer::Observer,
  subscription::{LocalSubscription, Subscription},
};

/// The handle a producer emits through.
///
/// A subscriber wraps an observer and enforces the observable contract: no
/// notification is delivered once the subscriber is closed, and at most one
/// of `error`/`complete` ever reaches the observer. Clones share the same
/// state.
pub struct Subscriber<T, E = RxError>(Rc<SubscriberInner<T, E>>);

struct SubscriberInner<T, E> {
  observer: RefCell<Option<Rc<dyn Observer<T, E>>>>,
  signal: LocalSubscription,
}

impl<T, E> Clone for Subscriber<T, E> {
  fn clone(&self) -> Self { Subscriber(self.0.clone()) }
}

impl<T, E> Subscriber<T, E> {
  pub fn new(
    observer: impl Observer<T, E> + 'static,
    signal: LocalSubscription,
  ) -> Self {
    Subscriber(Rc::new(SubscriberInner {
      observer: RefCell::new(Some(Rc::new(observer))),
      signal,
    }))
  }

  pub fn next(&self, value: T) {
    if self.0.signal.is_closed() {
      return;
    }
    let observer = self.0.observer.borrow().clone();
    if let Some(observer) = observer {
      observer.next(value);
    }
  }

  pub fn error(&self, err: E) {
    if let Some(observer) = self.take_observer() {
      observer.error(err);
      self.0.signal.unsubscribe();
    }
  }

  pub fn complete(&self) {
    if let Some(observer) = self.take_observer() {
      observer.complete();
      self.0.signal.unsubscribe();
    }
  }

  /// True after a terminal event or once the signal was unsubscribed.
  pub fn is_closed(&self) -> bool {
    self.0.observer.borrow().is_none() || self.0.signal.is_closed()
  }

  /// The teardown bag released when this subscriber ends for any reason.
  #[inline]
  pub fn signal(&self) -> &LocalSubscription { &self.0.signal }

  fn take_observer(&self) -> Option<Rc<dyn Observer<T, E>>> {
    if self.0.signal.is_closed() {
      return None;
    }
    self.0.observer.borrow_mut().take()
  }
}

impl<T, E> Observer<T, E> for Subscriber<T, E> {
  #[inline]
  fn next(&self, value: T) { Subscriber::next(self, value) }

  #[inline]
  fn error(&self, err: E) { Subscriber::error(self, err) }

  #[inline]
  fn complete(&self) { Subscriber::complete(self) }
}

impl<T, E> Subscription for Subscriber<T, E> {
  #[inline]
  fn unsubscribe(&self) { self.0.signal.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { Subscriber::is_closed(self) }
}
