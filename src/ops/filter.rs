use std::rc::Rc;

use crate::{observable::Observable, ops::lift};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Emit only those items from an Observable that pass a predicate test.
  pub fn filter(
    self,
    predicate: impl Fn(&T) -> bool + 'static,
  ) -> Observable<T, E> {
    let predicate = Rc::new(predicate);
    Observable::new(move |subscriber| {
      let predicate = predicate.clone();
      lift(&self, subscriber, move |d, v| {
        if predicate(&v) {
          d.next(v)
        }
      });
    })
  }

  /// Like `filter`, with a predicate that may fail. An `Err` is sent
  /// downstream as an error.
  pub fn try_filter(
    self,
    predicate: impl Fn(&T) -> Result<bool, E> + 'static,
  ) -> Observable<T, E> {
    let predicate = Rc::new(predicate);
    Observable::new(move |subscriber| {
      let predicate = predicate.clone();
      lift(&self, subscriber, move |d, v| match predicate(&v) {
        Ok(true) => d.next(v),
        Ok(false) => {}
        Err(e) => d.error(e),
      });
    })
  }
}

pub fn filter<T, E>(
  predicate: impl Fn(&T) -> bool + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: 'static,
{
  move |source| source.filter(predicate)
}

pub fn try_filter<T, E>(
  predicate: impl Fn(&T) -> Result<bool, E> + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: 'static,
{
  move |source| source.try_filter(predicate)
}
