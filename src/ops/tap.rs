use std::rc::Rc;

use crate::{observable::Observable, ops::lift};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Calls `f` with a reference to every value before passing it on
  /// unchanged.
  pub fn tap(self, f: impl Fn(&T) + 'static) -> Observable<T, E> {
    let f = Rc::new(f);
    Observable::new(move |subscriber| {
      let f = f.clone();
      lift(&self, subscriber, move |d, v| {
        f(&v);
        d.next(v);
      });
    })
  }
}

pub fn tap<T, E>(
  f: impl Fn(&T) + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: 'static,
{
  move |source| source.tap(f)
}
