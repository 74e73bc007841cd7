use std::{cell::Cell, rc::Rc};

use crate::{
  observable::Observable, observer::FnObserver, subscriber::Subscriber,
};

struct Concat<T, E> {
  sources: Rc<[Observable<T, E>]>,
  downstream: Subscriber<T, E>,
  index: Cell<usize>,
  subscribing: Cell<bool>,
  completed_inline: Cell<bool>,
}

impl<T: 'static, E: 'static> Concat<T, E> {
  /// Subscribes the next source. A source completing while it is being
  /// subscribed only sets a flag, and the loop moves on, so a long run of
  /// synchronous sources does not grow the stack.
  fn subscribe_next(self: &Rc<Self>) {
    if self.subscribing.get() {
      self.completed_inline.set(true);
      return;
    }
    self.subscribing.set(true);
    loop {
      if self.downstream.is_closed() {
        break;
      }
      let index = self.index.get();
      let Some(source) = self.sources.get(index).cloned() else {
        self.downstream.complete();
        break;
      };
      self.index.set(index + 1);
      self.completed_inline.set(false);

      let (d_next, d_error) =
        (self.downstream.clone(), self.downstream.clone());
      let this = self.clone();
      source.subscribe_with(Subscriber::new(
        FnObserver::new(
          move |v| d_next.next(v),
          move |e| d_error.error(e),
          move || this.subscribe_next(),
        ),
        self.downstream.signal().child(),
      ));
      if !self.completed_inline.get() {
        break;
      }
    }
    self.subscribing.set(false);
  }
}

/// Subscribes to the sources one after another, each only once the previous
/// one has completed. An error ends the whole sequence.
pub fn concat<T: 'static, E: 'static>(
  sources: impl IntoIterator<Item = Observable<T, E>>,
) -> Observable<T, E> {
  let sources: Rc<[Observable<T, E>]> = sources.into_iter().collect();
  Observable::new(move |downstream| {
    Rc::new(Concat {
      sources: sources.clone(),
      downstream,
      index: Cell::new(0),
      subscribing: Cell::new(false),
      completed_inline: Cell::new(false),
    })
    .subscribe_next()
  })
}

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Emits the values of `other` after this observable completes.
  pub fn concat_with(self, other: Observable<T, E>) -> Observable<T, E> {
    concat([self, other])
  }
}

pub fn concat_with<T: 'static, E: 'static>(
  other: Observable<T, E>,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E> {
  move |source| source.concat_with(other)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{observable, subject::Subject};
  use std::cell::{Cell, RefCell};

  #[test]
  fn sequential_order() {
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());
    concat([observable::from_iter([1, 2]), observable::from_iter([3, 4])])
      .subscribe_complete(
        move |v| c_values.borrow_mut().push(v),
        move || c_completed.set(true),
      );
    assert_eq!(*values.borrow(), vec![1, 2, 3, 4]);
    assert!(completed.get());
  }

  #[test]
  fn next_source_waits_for_completion() {
    let first = Subject::<i32>::new();
    let second = Subject::<i32>::new();
    first
      .observable()
      .concat_with(second.observable())
      .subscribe(|_| {});
    assert_eq!(second.observer_count(), 0);
    first.complete();
    assert_eq!(second.observer_count(), 1);
  }

  #[test]
  fn never_ending_source_blocks() {
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    concat([observable::never(), observable::of(1)])
      .subscribe_complete(|_| {}, move || c_completed.set(true));
    assert!(!completed.get());
  }

  #[test]
  fn empty_concat_completes() {
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    concat(Vec::<Observable<i32>>::new())
      .subscribe_complete(|_| {}, move || c_completed.set(true));
    assert!(completed.get());
  }

  #[test]
  fn many_synchronous_sources_run_in_a_loop() {
    let count = Rc::new(Cell::new(0));
    let completed = Rc::new(Cell::new(false));
    let (c_count, c_completed) = (count.clone(), completed.clone());
    concat((0..100_000).map(observable::of)).subscribe_complete(
      move |_| c_count.set(c_count.get() + 1),
      move || c_completed.set(true),
    );
    assert_eq!(count.get(), 100_000);
    assert!(completed.get());
  }

  #[test]
  fn synchronous_sources_mixed_with_async_ones() {
    let gate = Subject::<i32>::new();
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());
    concat([
      observable::of(1),
      gate.observable(),
      observable::of(2),
      observable::of(3),
    ])
    .subscribe_complete(
      move |v| c_values.borrow_mut().push(v),
      move || c_completed.set(true),
    );
    assert_eq!(*values.borrow(), vec![1]);

    gate.next(10);
    gate.complete();

    assert_eq!(*values.borrow(), vec![1, 10, 2, 3]);
    assert!(completed.get());
  }
}
