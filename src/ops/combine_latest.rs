use std::{cell::RefCell, rc::Rc};

use crate::{
  observable::Observable,
  observer::FnObserver,
  ops::{lift, merge},
  subscriber::Subscriber,
};

struct CombineState<T> {
  latest: Vec<Option<T>>,
  missing: usize,
  active: usize,
}

/// Combines the latest value of every source.
///
/// Nothing is emitted until each source has emitted at least once; after
/// that every emission produces the full vector of latest values in source
/// order. Completes once all sources have completed, and immediately for an
/// empty source list. Errors are forwarded at once and unsubscribe all
/// sources.
pub fn combine_latest<T, E>(
  sources: impl IntoIterator<Item = Observable<T, E>>,
) -> Observable<Vec<T>, E>
where
  T: Clone + 'static,
  E: 'static,
{
  let sources: Rc<[Observable<T, E>]> = sources.into_iter().collect();
  Observable::new(move |downstream: Subscriber<Vec<T>, E>| {
    let n = sources.len();
    if n == 0 {
      downstream.complete();
      return;
    }
    let state = Rc::new(RefCell::new(CombineState {
      latest: vec![None; n],
      missing: n,
      active: n,
    }));
    for (index, source) in sources.iter().enumerate() {
      if downstream.is_closed() {
        break;
      }
      let (d_next, d_error, d_complete) =
        (downstream.clone(), downstream.clone(), downstream.clone());
      let (n_state, c_state) = (state.clone(), state.clone());
      source.subscribe_with(Subscriber::new(
        FnObserver::new(
          move |v| {
            let combined = {
              let mut state = n_state.borrow_mut();
              if state.latest[index].is_none() {
                state.missing -= 1;
              }
              state.latest[index] = Some(v);
              (state.missing == 0)
                .then(|| state.latest.iter().flatten().cloned().collect())
            };
            if let Some(combined) = combined {
              d_next.next(combined);
            }
          },
          move |e| d_error.error(e),
          move || {
            let done = {
              let mut state = c_state.borrow_mut();
              state.active -= 1;
              state.active == 0
            };
            if done {
              d_complete.complete();
            }
          },
        ),
        downstream.signal().child(),
      ));
    }
  })
}

enum CombineItem<A, B> {
  ItemA(A),
  ItemB(B),
}

impl<T: Clone + 'static, E: 'static> Observable<T, E> {
  /// Combines the latest values of this observable and `other`, which may
  /// have a different element type, through `binary_op`.
  ///
  /// Emits once both sides have emitted, then on every emission of either
  /// side. Completes when both complete; an error from either side ends the
  /// stream.
  pub fn combine_latest_with<U, R>(
    self,
    other: Observable<U, E>,
    binary_op: impl Fn(T, U) -> R + 'static,
  ) -> Observable<R, E>
  where
    U: Clone + 'static,
    R: 'static,
  {
    let binary_op = Rc::new(binary_op);
    let items = merge([
      self.map(CombineItem::ItemA),
      other.map(CombineItem::ItemB),
    ]);
    Observable::new(move |subscriber| {
      let binary_op = binary_op.clone();
      let latest: RefCell<(Option<T>, Option<U>)> = RefCell::default();
      lift(&items, subscriber, move |d, item| {
        let pair = {
          let mut latest = latest.borrow_mut();
          match item {
            CombineItem::ItemA(a) => latest.0 = Some(a),
            CombineItem::ItemB(b) => latest.1 = Some(b),
          }
          match &*latest {
            (Some(a), Some(b)) => Some((a.clone(), b.clone())),
            _ => None,
          }
        };
        if let Some((a, b)) = pair {
          d.next(binary_op(a, b));
        }
      });
    })
  }
}

pub fn combine_latest_with<T, U, R, E>(
  other: Observable<U, E>,
  binary_op: impl Fn(T, U) -> R + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<R, E>
where
  T: Clone + 'static,
  U: Clone + 'static,
  R: 'static,
  E: 'static,
{
  move |source| source.combine_latest_with(other, binary_op)
}
