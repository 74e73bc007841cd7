use std::{cell::RefCell, rc::Rc};

use crate::{error::RxError, observable::Observable, observer::Observer};

use super::Subject;

/// A subject holding a current value, which every new subscriber receives
/// synchronously before any later value.
pub struct BehaviorSubject<T, E = RxError> {
  subject: Subject<T, E>,
  value: Rc<RefCell<T>>,
}

impl<T, E> Clone for BehaviorSubject<T, E> {
  fn clone(&self) -> Self {
    BehaviorSubject { subject: self.subject.clone(), value: self.value.clone() }
  }
}

impl<T: Clone, E: Clone> BehaviorSubject<T, E> {
  #[inline]
  pub fn new(value: T) -> Self {
    BehaviorSubject {
      subject: Subject::new(),
      value: Rc::new(RefCell::new(value)),
    }
  }

  /// The current value.
  pub fn value(&self) -> T { self.value.borrow().clone() }

  pub fn next(&self, value: T) {
    if self.subject.is_closed() {
      return;
    }
    *self.value.borrow_mut() = value.clone();
    self.subject.next(value)
  }

  #[inline]
  pub fn error(&self, err: E) { self.subject.error(err) }

  #[inline]
  pub fn complete(&self) { self.subject.complete() }

  #[inline]
  pub fn observer_count(&self) -> usize { self.subject.observer_count() }

  #[inline]
  pub fn is_closed(&self) -> bool { self.subject.is_closed() }
}

impl<T: Clone + 'static, E: Clone + 'static> BehaviorSubject<T, E> {
  pub fn observable(&self) -> Observable<T, E> {
    let this = self.clone();
    Observable::new(move |subscriber| {
      this.subject.add_subscriber(subscriber.clone());
      if !subscriber.is_closed() {
        subscriber.next(this.value());
      }
    })
  }
}

impl<T: Clone, E: Clone> Observer<T, E> for BehaviorSubject<T, E> {
  #[inline]
  fn next(&self, value: T) { BehaviorSubject::next(self, value) }

  #[inline]
  fn error(&self, err: E) { BehaviorSubject::error(self, err) }

  #[inline]
  fn complete(&self) { BehaviorSubject::complete(self) }
}
