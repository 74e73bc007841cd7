//! Multicast observables that are also observers.
//!
//! Every subject shares one state machine: `Active` until the first `error`
//! or `complete`, then terminated for good. Terminating notifies and drops
//! every registered subscriber; later subscribers get the recorded terminal
//! notification and are never registered.

use std::{
  cell::RefCell,
  rc::{Rc, Weak},
};

use smallvec::SmallVec;

use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::DynamicSubscriptions,
};

mod behavior_subject;
mod ordered_subject;
mod reference;
mod replay_subject;
pub use behavior_subject::BehaviorSubject;
pub use ordered_subject::OrderedSubject;
pub use reference::Reference;
pub use replay_subject::ReplaySubject;

enum SubjectState<E> {
  Active,
  Completed,
  Errored(E),
}

struct SubjectCore<T, E> {
  observers: RefCell<DynamicSubscriptions<Subscriber<T, E>>>,
  state: RefCell<SubjectState<E>>,
}

/// A plain multicast subject.
///
/// `next` fans out synchronously to the registered subscribers in
/// registration order. A reentrant `next` (issued from inside a handler) is
/// delivered inline; use [`OrderedSubject`] when that ordering matters.
///
/// Clones are handles to the same subject.
pub struct Subject<T, E = RxError>(Rc<SubjectCore<T, E>>);

impl<T, E> Clone for Subject<T, E> {
  fn clone(&self) -> Self { Subject(self.0.clone()) }
}

impl<T, E> Default for Subject<T, E> {
  fn default() -> Self {
    Subject(Rc::new(SubjectCore {
      observers: RefCell::new(DynamicSubscriptions::default()),
      state: RefCell::new(SubjectState::Active),
    }))
  }
}

impl<T, E> Subject<T, E> {
  pub fn new() -> Self { Self::default() }

  /// Number of subscribers currently registered.
  pub fn observer_count(&self) -> usize { self.0.observers.borrow().len() }

  /// True once the subject completed or errored.
  pub fn is_closed(&self) -> bool {
    !matches!(*self.0.state.borrow(), SubjectState::Active)
  }

  fn snapshot(&self) -> SmallVec<[Subscriber<T, E>; 2]> {
    self.0.observers.borrow().iter().cloned().collect()
  }

  /// Moves to a terminal state and returns the subscribers to notify, or
  /// `None` when already terminated.
  fn terminate(
    &self,
    state: SubjectState<E>,
  ) -> Option<SmallVec<[Subscriber<T, E>; 2]>> {
    {
      let mut current = self.0.state.borrow_mut();
      if !matches!(*current, SubjectState::Active) {
        return None;
      }
      *current = state;
    }
    Some(self.0.observers.borrow_mut().drain().collect())
  }
}

impl<T: Clone, E: Clone> Subject<T, E> {
  pub fn next(&self, value: T) {
    if self.is_closed() {
      return;
    }
    for subscriber in self.snapshot() {
      subscriber.next(value.clone());
    }
  }

  /// Errors every registered subscriber. A panic raised by an error handler
  /// propagates to the caller.
  pub fn error(&self, err: E) {
    let errored = SubjectState::Errored(err.clone());
    if let Some(observers) = self.terminate(errored) {
      tracing::trace!(observers = observers.len(), "subject errored");
      for subscriber in observers {
        subscriber.error(err.clone());
      }
    }
  }

  pub fn complete(&self) {
    if let Some(observers) = self.terminate(SubjectState::Completed) {
      tracing::trace!(observers = observers.len(), "subject completed");
      for subscriber in observers {
        subscriber.complete();
      }
    }
  }
}

impl<T: Clone + 'static, E: Clone + 'static> Subject<T, E> {
  /// Registers `subscriber` for future notifications, or hands it the
  /// recorded terminal notification when the subject already terminated.
  pub(crate) fn add_subscriber(&self, subscriber: Subscriber<T, E>) {
    let terminal = match &*self.0.state.borrow() {
      SubjectState::Active => None,
      SubjectState::Completed => Some(None),
      SubjectState::Errored(err) => Some(Some(err.clone())),
    };
    match terminal {
      None => {
        if subscriber.is_closed() {
          return;
        }
        let id = self.0.observers.borrow_mut().add(subscriber.clone());
        let core: Weak<SubjectCore<T, E>> = Rc::downgrade(&self.0);
        subscriber.signal().add_teardown(move || {
          if let Some(core) = core.upgrade() {
            core.observers.borrow_mut().remove(id);
          }
        });
      }
      Some(None) => subscriber.complete(),
      Some(Some(err)) => subscriber.error(err),
    }
  }

  /// An observable view of this subject; every subscription registers a new
  /// subscriber.
  pub fn observable(&self) -> Observable<T, E> {
    let subject = self.clone();
    Observable::new(move |subscriber| subject.add_subscriber(subscriber))
  }
}

impl<T: Clone, E: Clone> Observer<T, E> for Subject<T, E> {
  #[inline]
  fn next(&self, value: T) { Subject::next(self, value) }

  #[inline]
  fn error(&self, err: E) { Subject::error(self, err) }

  #[inline]
  fn complete(&self) { Subject::complete(self) }
}
