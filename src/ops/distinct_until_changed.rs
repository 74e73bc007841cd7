use std::{cell::RefCell, rc::Rc};

use crate::{observable::Observable, ops::lift};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Only emit when the current value is different from the last.
  ///
  /// The comparison state belongs to each subscription; a new subscription
  /// starts fresh.
  pub fn distinct_until_changed(self) -> Observable<T, E>
  where
    T: PartialEq + Clone,
  {
    self.distinct_until_changed_by(|a, b| a == b)
  }

  /// Like `distinct_until_changed` with a custom equality.
  pub fn distinct_until_changed_by(
    self,
    eq: impl Fn(&T, &T) -> bool + 'static,
  ) -> Observable<T, E>
  where
    T: Clone,
  {
    let eq = Rc::new(eq);
    Observable::new(move |subscriber| {
      let eq = eq.clone();
      let last: RefCell<Option<T>> = RefCell::new(None);
      lift(&self, subscriber, move |d, v| {
        let changed = last.borrow().as_ref().map_or(true, |last| !eq(last, &v));
        if changed {
          *last.borrow_mut() = Some(v.clone());
          d.next(v);
        }
      });
    })
  }
}

pub fn distinct_until_changed<T, E>(
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: PartialEq + Clone + 'static,
  E: 'static,
{
  move |source| source.distinct_until_changed()
}

pub fn distinct_until_changed_by<T, E>(
  eq: impl Fn(&T, &T) -> bool + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: Clone + 'static,
  E: 'static,
{
  move |source| source.distinct_until_changed_by(eq)
}

#[cfg(test)]
mod test {
  use crate::observable;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn smoke_distinct_until_changed() {
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    observable::from_iter([1, 1, 2, 2, 1, 3])
      .distinct_until_changed()
      .subscribe(move |v| c_values.borrow_mut().push(v));
    assert_eq!(*values.borrow(), vec![1, 2, 1, 3]);
  }

  #[test]
  fn smoke_distinct_until_key_changed() {
    let values = Rc::new(RefCell::new(vec![]));
    let c_values = values.clone();
    observable::from_iter([(1, "a"), (1, "b"), (2, "c")])
      .distinct_until_changed_by(|a, b| a.0 == b.0)
      .subscribe(move |v| c_values.borrow_mut().push(v.1));
    assert_eq!(*values.borrow(), vec!["a", "c"]);
  }

  #[test]
  fn state_is_per_subscription() {
    let values = Rc::new(RefCell::new(vec![]));
    let (v1, v2) = (values.clone(), values.clone());
    let distinct = observable::from_iter([7, 7]).distinct_until_changed();
    distinct.subscribe(move |v| v1.borrow_mut().push(v));
    distinct.subscribe(move |v| v2.borrow_mut().push(v));
    assert_eq!(*values.borrow(), vec![7, 7]);
  }
}
