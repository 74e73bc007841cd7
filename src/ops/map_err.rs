use std::rc::Rc;

use crate::{
  observable::Observable, observer::FnObserver, subscriber::Subscriber,
};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Converts the error type.
  pub fn map_err<E2: 'static>(
    self,
    f: impl Fn(E) -> E2 + 'static,
  ) -> Observable<T, E2> {
    let f = Rc::new(f);
    Observable::new(move |downstream: Subscriber<T, E2>| {
      let f = f.clone();
      let signal = downstream.signal().clone();
      let (d_next, d_error) = (downstream.clone(), downstream.clone());
      self.subscribe_with(Subscriber::new(
        FnObserver::new(
          move |v| d_next.next(v),
          move |e| d_error.error(f(e)),
          move || downstream.complete(),
        ),
        signal,
      ));
    })
  }
}

pub fn map_err<T, E, E2>(
  f: impl Fn(E) -> E2 + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E2>
where
  T: 'static,
  E: 'static,
  E2: 'static,
{
  move |source| source.map_err(f)
}
