use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{error::RxError, observable::Observable, observer::Observer};

use super::Subject;

/// A subject that records emitted values and replays them to every new
/// subscriber, followed by the terminal notification once terminated.
pub struct ReplaySubject<T, E = RxError> {
  subject: Subject<T, E>,
  buffer: Rc<RefCell<VecDeque<T>>>,
  capacity: Option<usize>,
}

impl<T, E> Clone for ReplaySubject<T, E> {
  fn clone(&self) -> Self {
    ReplaySubject {
      subject: self.subject.clone(),
      buffer: self.buffer.clone(),
      capacity: self.capacity,
    }
  }
}

impl<T, E> Default for ReplaySubject<T, E> {
  fn default() -> Self {
    ReplaySubject {
      subject: Subject::new(),
      buffer: Rc::default(),
      capacity: None,
    }
  }
}

impl<T: Clone, E: Clone> ReplaySubject<T, E> {
  /// A subject replaying every value it has seen.
  pub fn new() -> Self { Self::default() }

  /// A subject replaying at most the last `capacity` values.
  pub fn with_capacity(capacity: usize) -> Self {
    ReplaySubject {
      subject: Subject::new(),
      buffer: Rc::new(RefCell::new(VecDeque::with_capacity(capacity))),
      capacity: Some(capacity),
    }
  }

  pub fn next(&self, value: T) {
    if self.subject.is_closed() {
      return;
    }
    {
      let mut buffer = self.buffer.borrow_mut();
      buffer.push_back(value.clone());
      if let Some(capacity) = self.capacity {
        while buffer.len() > capacity {
          buffer.pop_front();
        }
      }
    }
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

  /// Values a new subscriber would receive, oldest first.
  pub fn buffered(&self) -> Vec<T> {
    self.buffer.borrow().iter().cloned().collect()
  }
}

impl<T: Clone + 'static, E: Clone + 'static> ReplaySubject<T, E> {
  pub fn observable(&self) -> Observable<T, E> {
    let this = self.clone();
    Observable::new(move |subscriber| {
      let replay = this.buffered();
      if this.subject.is_closed() {
        for value in replay {
          subscriber.next(value);
        }
        this.subject.add_subscriber(subscriber);
      } else {
        this.subject.add_subscriber(subscriber.clone());
        for value in replay {
          subscriber.next(value);
        }
      }
    })
  }
}

impl<T: Clone, E: Clone> Observer<T, E> for ReplaySubject<T, E> {
  #[inline]
  fn next(&self, value: T) { ReplaySubject::next(self, value) }

  #[inline]
  fn error(&self, err: E) { ReplaySubject::error(self, err) }

  #[inline]
  fn complete(&self) { ReplaySubject::complete(self) }
}
