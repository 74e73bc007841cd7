//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use std::{fmt::Debug, rc::Rc};

/// Observer trait: The consumer of data in reactive programming
///
/// All methods take `&self`: observers are shared handles and may be called
/// reentrantly (a value handler pushing into the subject it listens to), so
/// implementations keep their state in `Cell`/`RefCell` and never hold a
/// borrow while calling out.
pub trait Observer<T, E> {
  fn next(&self, value: T);

  fn error(&self, err: E);

  fn complete(&self);
}

impl<T, E, O> Observer<T, E> for Rc<O>
where
  O: Observer<T, E> + ?Sized,
{
  #[inline]
  fn next(&self, value: T) { (**self).next(value) }

  #[inline]
  fn error(&self, err: E) { (**self).error(err) }

  #[inline]
  fn complete(&self) { (**self).complete() }
}

/// An observer assembled from three closures.
pub struct FnObserver<N, R, C> {
  next: N,
  error: R,
  complete: C,
}

impl<N, R, C> FnObserver<N, R, C> {
  pub fn new(next: N, error: R, complete: C) -> Self {
    FnObserver { next, error, complete }
  }
}

impl<T, E, N, R, C> Observer<T, E> for FnObserver<N, R, C>
where
  N: Fn(T),
  R: Fn(E),
  C: Fn(),
{
  #[inline]
  fn next(&self, value: T) { (self.next)(value) }

  #[inline]
  fn error(&self, err: E) { (self.error)(err) }

  #[inline]
  fn complete(&self) { (self.complete)() }
}

/// Error handler used when the caller supplied none: the error is logged and
/// raised as a panic so it can't vanish silently.
pub(crate) fn unhandled_error<E: Debug>(err: E) {
  tracing::error!(error = ?err, "unhandled error in observable");
  panic!("unhandled error in observable: {:?}", err);
}
