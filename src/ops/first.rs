use std::{cell::Cell, rc::Rc};

use crate::{error::EmptyError, observable::Observable, ops::lift_with};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Emits only the first value, then completes and unsubscribes from the
  /// source. A source that completes without emitting produces an
  /// `EmptyError` instead.
  pub fn first(self) -> Observable<T, E>
  where
    E: From<EmptyError>,
  {
    Observable::new(move |subscriber| {
      let taken = Cell::new(false);
      lift_with(
        &self,
        subscriber,
        move |d, v| {
          if !taken.replace(true) {
            d.next(v);
            d.complete();
          }
        },
        |d| d.error(EmptyError.into()),
      );
    })
  }

  /// Emits the first value, or `default` if the source completes empty.
  pub fn first_or(self, default: T) -> Observable<T, E>
  where
    T: Clone,
  {
    Observable::new(move |subscriber| {
      let default = default.clone();
      let taken = Rc::new(Cell::new(false));
      let c_taken = taken.clone();
      lift_with(
        &self.clone().take(1),
        subscriber,
        move |d, v| {
          taken.set(true);
          d.next(v);
        },
        move |d| {
          if !c_taken.get() {
            d.next(default.clone());
          }
          d.complete();
        },
      );
    })
  }
}

pub fn first<T, E>() -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: From<EmptyError> + 'static,
{
  move |source| source.first()
}

pub fn first_or<T, E>(
  default: T,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: Clone + 'static,
  E: 'static,
{
  move |source| source.first_or(default)
}
