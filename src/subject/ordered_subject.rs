use std::{
  cell::{Cell, RefCell},
  collections::VecDeque,
  rc::Rc,
};

use crate::{error::RxError, observable::Observable, observer::Observer};

use super::Subject;

enum Notification<T, E> {
  Next(T),
  Error(E),
  Complete,
}

struct Queue<T, E> {
  pending: RefCell<VecDeque<Notification<T, E>>>,
  dispatching: Cell<bool>,
  terminated: Cell<bool>,
}

/// Ends a dispatch loop. When a handler panics, the notifications queued
/// behind it are dropped with the loop.
struct DispatchGuard<'a, T, E>(&'a Queue<T, E>);

impl<T, E> Drop for DispatchGuard<'_, T, E> {
  fn drop(&mut self) {
    if std::thread::panicking() {
      self.0.pending.borrow_mut().clear();
    }
    self.0.dispatching.set(false);
  }
}

/// A subject that never interleaves notifications.
///
/// A notification raised while another one is being delivered (for example
/// a handler calling `next` on the subject it listens to) is queued and
/// delivered once the current fan-out has reached every subscriber.
/// Values pushed after `complete` or `error` are dropped.
pub struct OrderedSubject<T, E = RxError> {
  subject: Subject<T, E>,
  queue: Rc<Queue<T, E>>,
}

impl<T, E> Clone for OrderedSubject<T, E> {
  fn clone(&self) -> Self {
    OrderedSubject {
      subject: self.subject.clone(),
      queue: self.queue.clone(),
    }
  }
}

impl<T, E> Default for OrderedSubject<T, E> {
  fn default() -> Self {
    OrderedSubject {
      subject: Subject::new(),
      queue: Rc::new(Queue {
        pending: RefCell::new(VecDeque::new()),
        dispatching: Cell::new(false),
        terminated: Cell::new(false),
      }),
    }
  }
}

impl<T: Clone, E: Clone> OrderedSubject<T, E> {
  pub fn new() -> Self { Self::default() }

  pub fn next(&self, value: T) {
    if self.queue.terminated.get() {
      return;
    }
    self.push(Notification::Next(value));
  }

  pub fn error(&self, err: E) {
    if !self.queue.terminated.replace(true) {
      self.push(Notification::Error(err));
    }
  }

  pub fn complete(&self) {
    if !self.queue.terminated.replace(true) {
      self.push(Notification::Complete);
    }
  }

  #[inline]
  pub fn observer_count(&self) -> usize { self.subject.observer_count() }

  #[inline]
  pub fn is_closed(&self) -> bool { self.queue.terminated.get() }

  fn push(&self, notification: Notification<T, E>) {
    self.queue.pending.borrow_mut().push_back(notification);
    if self.queue.dispatching.replace(true) {
      return;
    }
    let _guard = DispatchGuard(&*self.queue);
    loop {
      let notification = self.queue.pending.borrow_mut().pop_front();
      match notification {
        Some(Notification::Next(v)) => self.subject.next(v),
        Some(Notification::Error(e)) => self.subject.error(e),
        Some(Notification::Complete) => self.subject.complete(),
        None => break,
      }
    }
  }
}

impl<T: Clone + 'static, E: Clone + 'static> OrderedSubject<T, E> {
  pub fn observable(&self) -> Observable<T, E> { self.subject.observable() }
}

impl<T: Clone, E: Clone> Observer<T, E> for OrderedSubject<T, E> {
  #[inline]
  fn next(&self, value: T) { OrderedSubject::next(self, value) }

  #[inline]
  fn error(&self, err: E) { OrderedSubject::error(self, err) }

  #[inline]
  fn complete(&self) { OrderedSubject::complete(self) }
}
