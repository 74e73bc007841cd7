use std::{cell::RefCell, rc::Rc};

use crate::{observable::Observable, ops::lift};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Applies an accumulator over the source and emits each intermediate
  /// result, starting from `initial`.
  pub fn scan<Acc>(
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
      let acc = RefCell::new(Some(initial.clone()));
      lift(&self, subscriber, move |d, v| {
        let prev = acc.borrow_mut().take();
        if let Some(prev) = prev {
          let next = f(prev, v);
          *acc.borrow_mut() = Some(next.clone());
          d.next(next);
        }
      });
    })
  }
}

pub fn scan<T, Acc, E>(
  initial: Acc,
  f: impl Fn(Acc, T) -> Acc + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<Acc, E>
where
  T: 'static,
  Acc: Clone + 'static,
  E: 'static,
{
  move |source| source.scan(initial, f)
}
