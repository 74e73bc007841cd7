use std::{cell::RefCell, rc::Rc};

use crate::{observable::Observable, ops::lift_with};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Folds the source into a single value emitted on completion. An empty
  /// source emits `initial`.
  pub fn reduce<Acc>(
    self,
    initial: Acc,
    f: impl Fn(Acc, T) -> Acc + 'static,
  ) -> Observable<Acc, E>
  where
    Acc: Clone + 'static,
  {
    let f = Rc::new(f);
    Observable::new(move |subscriber| {
      let f = f.clone();
      let acc = Rc::new(RefCell::new(Some(initial.clone())));
      let c_acc = acc.clone();
      lift_with(
        &self,
        subscriber,
        move |_, v| {
          let prev = acc.borrow_mut().take();
          let next = prev.map(|prev| f(prev, v));
          *acc.borrow_mut() = next;
        },
        move |d| {
          let result = c_acc.borrow_mut().take();
          if let Some(result) = result {
            d.next(result);
          }
          d.complete();
        },
      );
    })
  }
}

pub fn reduce<T, Acc, E>(
  initial: Acc,
  f: impl Fn(Acc, T) -> Acc + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<Acc, E>
where
  T: 'static,
  Acc: Clone + 'static,
  E: 'static,
{
  move |source| source.reduce(initial, f)
}
