use std::{cell::Cell, rc::Rc};

use crate::{
  observable::Observable, observer::FnObserver, subscriber::Subscriber,
};

/// Subscribes to every source at once and forwards all their values.
///
/// Completes once every source has completed; the first error is forwarded
/// and unsubscribes the remaining sources. A single source is returned as is.
pub fn merge<T: 'static, E: 'static>(
  sources: impl IntoIterator<Item = Observable<T, E>>,
) -> Observable<T, E> {
  let mut sources: Vec<_> = sources.into_iter().collect();
  if sources.len() == 1 {
    if let Some(source) = sources.pop() {
      return source;
    }
  }
  let sources: Rc<[Observable<T, E>]> = sources.into();
  Observable::new(move |downstream| {
    if sources.is_empty() {
      downstream.complete();
      return;
    }
    let active = Rc::new(Cell::new(sources.len()));
    for source in sources.iter() {
      if downstream.is_closed() {
        break;
      }
      let (d_next, d_error, d_complete) =
        (downstream.clone(), downstream.clone(), downstream.clone());
      let active = active.clone();
      source.subscribe_with(Subscriber::new(
        FnObserver::new(
          move |v| d_next.next(v),
          move |e| d_error.error(e),
          move || {
            active.set(active.get() - 1);
            if active.get() == 0 {
              d_complete.complete();
            }
          },
        ),
        downstream.signal().child(),
      ));
    }
  })
}

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Merges `other` into this observable. See [`merge`].
  pub fn merge_with(self, other: Observable<T, E>) -> Observable<T, E> {
    merge([self, other])
  }
}

pub fn merge_with<T: 'static, E: 'static>(
  other: Observable<T, E>,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E> {
  move |source| source.merge_with(other)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    error::RxError, observable, subject::Subject, subscription::Subscription,
  };
  use std::cell::RefCell;

  #[test]
  fn odd_even_merge() {
    // Given
    let numbers = Subject::<i32>::new();
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());
    let even = numbers.observable().filter(|v| v % 2 == 0);
    let odd = numbers.observable().filter(|v| v % 2 != 0);

    // When
    merge([even, odd]).subscribe_complete(
      move |v| c_values.borrow_mut().push(v),
      move || c_completed.set(true),
    );
    (0..10).for_each(|v| numbers.next(v));

    // Then
    assert_eq!(*values.borrow(), (0..10).collect::<Vec<_>>());
    assert!(!completed.get());
    numbers.complete();
    assert!(completed.get());
  }

  #[test]
  fn completes_after_all_sources() {
    let a = Subject::<i32>::new();
    let b = Subject::<i32>::new();
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    a.observable()
      .merge_with(b.observable())
      .subscribe_complete(|_| {}, move || c_completed.set(true));
    a.complete();
    assert!(!completed.get());
    b.complete();
    assert!(completed.get());
  }

  #[test]
  fn error_unsubscribes_siblings() {
    let a = Subject::<i32>::new();
    let b = Subject::<i32>::new();
    let error = Rc::new(RefCell::new(None));
    let c_error = error.clone();
    merge([a.observable(), b.observable()])
      .subscribe_err(|_| {}, move |e| *c_error.borrow_mut() = Some(e));
    a.error(RxError::from("a failed"));
    assert_eq!(*error.borrow(), Some(RxError::from("a failed")));
    assert_eq!(b.observer_count(), 0);
  }

  #[test]
  fn unsubscribe_releases_all_sources() {
    let a = Subject::<i32>::new();
    let b = Subject::<i32>::new();
    let subscription = merge([a.observable(), b.observable()])
      .subscribe(|_| {});
    subscription.unsubscribe();
    assert_eq!(a.observer_count(), 0);
    assert_eq!(b.observer_count(), 0);
  }

  #[test]
  fn single_source_is_returned_unchanged() {
    let source = observable::of(1);
    assert!(merge([source.clone()]).ptr_eq(&source));
  }

  #[test]
  fn empty_merge_completes() {
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    merge(Vec::<Observable<i32>>::new())
      .subscribe_complete(|_| {}, move || c_completed.set(true));
    assert!(completed.get());
  }
}
