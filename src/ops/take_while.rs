use std::rc::Rc;

use crate::{observable::Observable, ops::lift};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Emits values while `predicate` holds and completes on the first value
  /// that fails it. The failing value is not emitted.
  pub fn take_while(
    self,
    predicate: impl Fn(&T) -> bool + 'static,
  ) -> Observable<T, E> {
    let predicate = Rc::new(predicate);
    Observable::new(move |subscriber| {
      let predicate = predicate.clone();
      lift(&self, subscriber, move |d, v| {
        if predicate(&v) {
          d.next(v);
        } else {
          d.complete();
        }
      });
    })
  }
}

pub fn take_while<T, E>(
  predicate: impl Fn(&T) -> bool + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: 'static,
{
  move |source| source.take_while(predicate)
}

#[cfg(test)]
mod test {
  use crate::observable;
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  #[test]
  fn stops_at_first_failure() {
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());
    observable::from_iter([1, 2, 5, 1])
      .take_while(|v| *v < 3)
      .subscribe_complete(
        move |v| c_values.borrow_mut().push(v),
        move || c_completed.set(true),
      );
    assert_eq!(*values.borrow(), vec![1, 2]);
    assert!(completed.get());
  }
}
