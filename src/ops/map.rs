use std::rc::Rc;

use crate::{observable::Observable, ops::lift};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  pub fn map<U: 'static>(
    self,
    f: impl Fn(T) -> U + 'static,
  ) -> Observable<U, E> {
    let f = Rc::new(f);
    Observable::new(move |subscriber| {
      let f = f.clone();
      lift(&self, subscriber, move |d, v| d.next(f(v)));
    })
  }

  /// Like `map`, but the closure may fail; an `Err` is sent downstream as an
  /// error and the source is unsubscribed.
  pub fn try_map<U: 'static>(
    self,
    f: impl Fn(T) -> Result<U, E> + 'static,
  ) -> Observable<U, E> {
    let f = Rc::new(f);
    Observable::new(move |subscriber| {
      let f = f.clone();
      lift(&self, subscriber, move |d, v| match f(v) {
        Ok(v) => d.next(v),
        Err(e) => d.error(e),
      });
    })
  }
}

pub fn map<T, U, E>(
  f: impl Fn(T) -> U + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<U, E>
where
  T: 'static,
  U: 'static,
  E: 'static,
{
  move |source| source.map(f)
}

pub fn try_map<T, U, E>(
  f: impl Fn(T) -> Result<U, E> + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<U, E>
where
  T: 'static,
  U: 'static,
  E: 'static,
{
  move |source| source.try_map(f)
}

#[cfg(test)]
mod test {
  use crate::{error::RxError, observable, ops, subject::Subject};
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  #[test]
  fn primitive_type() {
    let sum = Rc::new(Cell::new(0));
    let c_sum = sum.clone();
    observable::from_iter(100..101)
      .map(|v| v * 2)
      .subscribe(move |v| c_sum.set(c_sum.get() + v));
    assert_eq!(sum.get(), 200);
  }

  #[test]
  fn map_types_mixed() {
    let lengths = Rc::new(RefCell::new(vec![]));
    let c_lengths = lengths.clone();
    observable::from_iter(["a", "bb", "ccc"])
      .map(str::len)
      .pipe(ops::map(|len: usize| len * 10))
      .subscribe(move |v| c_lengths.borrow_mut().push(v));
    assert_eq!(*lengths.borrow(), vec![10, 20, 30]);
  }

  #[test]
  fn try_map_error_unsubscribes_source() {
    // Given
    let subject = Subject::<i32>::new();
    let values = Rc::new(RefCell::new(vec![]));
    let error = Rc::new(RefCell::new(None));
    let (c_values, c_error) = (values.clone(), error.clone());

    // When
    subject
      .observable()
      .try_map(|v| {
        if v < 3 {
          Ok(v * 10)
        } else {
          Err(RxError::from(format!("too big: {v}")))
        }
      })
      .subscribe_err(
        move |v| c_values.borrow_mut().push(v),
        move |e| *c_error.borrow_mut() = Some(e),
      );
    subject.next(1);
    subject.next(2);
    subject.next(3);
    subject.next(4);

    // Then
    assert_eq!(*values.borrow(), vec![10, 20]);
    assert_eq!(*error.borrow(), Some(RxError::from("too big: 3")));
    assert_eq!(subject.observer_count(), 0);
  }
}
