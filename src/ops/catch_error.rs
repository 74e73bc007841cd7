use std::rc::Rc;

use crate::{
  observable::Observable, observer::FnObserver, subscriber::Subscriber,
};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Recovers from an error by switching to the observable returned by
  /// `selector`.
  ///
  /// The replacement takes over the same downstream subscriber, so values
  /// already emitted stay emitted and the replacement's own terminal event
  /// ends the stream.
  pub fn catch_error<E2: 'static>(
    self,
    selector: impl Fn(E) -> Observable<T, E2> + 'static,
  ) -> Observable<T, E2> {
    let selector = Rc::new(selector);
    Observable::new(move |downstream: Subscriber<T, E2>| {
      let selector = selector.clone();
      let (d_next, d_error) = (downstream.clone(), downstream.clone());
      let source_signal = downstream.signal().child();
      self.subscribe_with(Subscriber::new(
        FnObserver::new(
          move |v| d_next.next(v),
          move |e| selector(e).subscribe_with(d_error.clone()),
          move || downstream.complete(),
        ),
        source_signal,
      ));
    })
  }
}

pub fn catch_error<T, E, E2>(
  selector: impl Fn(E) -> Observable<T, E2> + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E2>
where
  T: 'static,
  E: 'static,
  E2: 'static,
{
  move |source| source.catch_error(selector)
}

#[cfg(test)]
mod test {
  use crate::{error::RxError, observable, subject::Subject};
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  #[test]
  fn switches_to_fallback() {
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());

    observable::from_iter([1, 2])
      .concat_with(observable::throw_error(RxError::from("boom")))
      .catch_error(|_| observable::from_iter([8, 9]))
      .subscribe_complete(
        move |v| c_values.borrow_mut().push(v),
        move || c_completed.set(true),
      );

    assert_eq!(*values.borrow(), vec![1, 2, 8, 9]);
    assert!(completed.get());
  }

  #[test]
  fn selector_sees_error() {
    let seen = Rc::new(RefCell::new(None));
    let c_seen = seen.clone();
    observable::throw_error::<i32, _>(RxError::from("bad"))
      .catch_error(move |e| {
        *c_seen.borrow_mut() = Some(e);
        observable::empty()
      })
      .subscribe(|_| {});
    assert_eq!(*seen.borrow(), Some(RxError::from("bad")));
  }

  #[test]
  fn failed_source_is_released() {
    let source = Subject::<i32>::new();
    let fallback = Subject::<i32>::new();
    let c_fallback = fallback.clone();
    source
      .observable()
      .catch_error(move |_| c_fallback.observable())
      .subscribe(|_| {});
    source.error(RxError::Empty);
    assert_eq!(source.observer_count(), 0);
    assert_eq!(fallback.observer_count(), 1);
  }
}
