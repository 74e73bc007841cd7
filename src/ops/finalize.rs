use std::rc::Rc;

use crate::{observable::Observable, ops::lift};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Calls `f` once when the subscription ends, whether by completion, error
  /// or unsubscribe.
  pub fn finalize(self, f: impl Fn() + 'static) -> Observable<T, E> {
    let f = Rc::new(f);
    Observable::new(move |subscriber| {
      let f = f.clone();
      subscriber.signal().add_teardown(move || f());
      lift(&self, subscriber, |d, v| d.next(v));
    })
  }
}

pub fn finalize<T, E>(
  f: impl Fn() + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: 'static,
{
  move |source| source.finalize(f)
}
