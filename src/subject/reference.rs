use std::{cell::RefCell, rc::Rc};

use crate::{error::RxError, observable::Observable, observer::Observer};

use super::Subject;

/// A single-value holder: a behavior subject without an initial value.
///
/// Subscribers receive the current value on subscribe once one was set.
pub struct Reference<T, E = RxError> {
  subject: Subject<T, E>,
  value: Rc<RefCell<Option<T>>>,
}

impl<T, E> Clone for Reference<T, E> {
  fn clone(&self) -> Self {
    Reference { subject: self.subject.clone(), value: self.value.clone() }
  }
}

impl<T, E> Default for Reference<T, E> {
  fn default() -> Self {
    Reference { subject: Subject::new(), value: Rc::default() }
  }
}

impl<T: Clone, E: Clone> Reference<T, E> {
  pub fn new() -> Self { Self::default() }

  pub fn has_value(&self) -> bool { self.value.borrow().is_some() }

  /// The current value, or [`RxError::NoValue`] before the first `next`.
  pub fn value(&self) -> Result<T, RxError> {
    self.value.borrow().clone().ok_or(RxError::NoValue)
  }

  pub fn next(&self, value: T) {
    if self.subject.is_closed() {
      return;
    }
    *self.value.borrow_mut() = Some(value.clone());
    self.subject.next(value)
  }

  #[inline]
  pub fn error(&self, err: E) { self.subject.error(err) }

  #[inline]
  pub fn complete(&self) { self.subject.complete() }

  #[inline]
  pub fn is_closed(&self) -> bool { self.subject.is_closed() }
}

impl<T: Clone + 'static, E: Clone + 'static> Reference<T, E> {
  pub fn observable(&self) -> Observable<T, E> {
    let this = self.clone();
    Observable::new(move |subscriber| {
      this.subject.add_subscriber(subscriber.clone());
      if subscriber.is_closed() {
        return;
      }
      let current = this.value.borrow().clone();
      if let Some(value) = current {
        subscriber.next(value);
      }
    })
  }
}

impl<T: Clone, E: Clone> Observer<T, E> for Reference<T, E> {
  #[inline]
  fn next(&self, value: T) { Reference::next(self, value) }

  #[inline]
  fn error(&self, err: E) { Reference::error(self, err) }

  #[inline]
  fn complete(&self) { Reference::complete(self) }
}
