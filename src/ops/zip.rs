use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{
  observable::Observable, observer::FnObserver, subscriber::Subscriber,
};

struct ZipState<T> {
  queues: Vec<VecDeque<T>>,
  completed: Vec<bool>,
}

impl<T> ZipState<T> {
  fn take_row(&mut self) -> Option<Vec<T>> {
    if self.queues.iter().any(VecDeque::is_empty) {
      return None;
    }
    Some(self.queues.iter_mut().filter_map(VecDeque::pop_front).collect())
  }

  /// A completed source with nothing buffered can never contribute again.
  fn exhausted(&self) -> bool {
    self
      .completed
      .iter()
      .zip(&self.queues)
      .any(|(done, queue)| *done && queue.is_empty())
  }
}

/// Pairs up the values of all sources by index.
///
/// Values are buffered per source; a vector is emitted whenever every source
/// has a buffered value. Completes as soon as a completed source has an
/// empty buffer, and immediately for an empty source list. Errors are
/// forwarded at once.
pub fn zip<T, E>(
  sources: impl IntoIterator<Item = Observable<T, E>>,
) -> Observable<Vec<T>, E>
where
  T: 'static,
  E: 'static,
{
  let sources: Rc<[Observable<T, E>]> = sources.into_iter().collect();
  Observable::new(move |downstream: Subscriber<Vec<T>, E>| {
    let n = sources.len();
    if n == 0 {
      downstream.complete();
      return;
    }
    let state = Rc::new(RefCell::new(ZipState {
      queues: (0..n).map(|_| VecDeque::new()).collect(),
      completed: vec![false; n],
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
            let (row, exhausted) = {
              let mut state = n_state.borrow_mut();
              state.queues[index].push_back(v);
              let row = state.take_row();
              (row, state.exhausted())
            };
            if let Some(row) = row {
              d_next.next(row);
            }
            if exhausted {
              d_next.complete();
            }
          },
          move |e| d_error.error(e),
          move || {
            let exhausted = {
              let mut state = c_state.borrow_mut();
              state.completed[index] = true;
              state.exhausted()
            };
            if exhausted {
              d_complete.complete();
            }
          },
        ),
        downstream.signal().child(),
      ));
    }
  })
}

struct PairState<A, B> {
  a: VecDeque<A>,
  b: VecDeque<B>,
  a_done: bool,
  b_done: bool,
}

impl<A, B> PairState<A, B> {
  fn take_pair(&mut self) -> Option<(A, B)> {
    if self.a.is_empty() || self.b.is_empty() {
      return None;
    }
    self.a.pop_front().zip(self.b.pop_front())
  }

  fn exhausted(&self) -> bool {
    (self.a_done && self.a.is_empty()) || (self.b_done && self.b.is_empty())
  }
}

type RcPair<A, B> = Rc<RefCell<PairState<A, B>>>;

fn subscribe_side<V, A, B, E>(
  source: &Observable<V, E>,
  downstream: &Subscriber<(A, B), E>,
  state: &RcPair<A, B>,
  push: fn(&mut PairState<A, B>, V),
  finish: fn(&mut PairState<A, B>),
) where
  V: 'static,
  A: 'static,
  B: 'static,
  E: 'static,
{
  let (d_next, d_error, d_complete) =
    (downstream.clone(), downstream.clone(), downstream.clone());
  let (n_state, c_state) = (state.clone(), state.clone());
  source.subscribe_with(Subscriber::new(
    FnObserver::new(
      move |v| {
        let (pair, exhausted) = {
          let mut state = n_state.borrow_mut();
          push(&mut *state, v);
          let pair = state.take_pair();
          (pair, state.exhausted())
        };
        if let Some(pair) = pair {
          d_next.next(pair);
        }
        if exhausted {
          d_next.complete();
        }
      },
      move |e| d_error.error(e),
      move || {
        let exhausted = {
          let mut state = c_state.borrow_mut();
          finish(&mut *state);
          state.exhausted()
        };
        if exhausted {
          d_complete.complete();
        }
      },
    ),
    downstream.signal().child(),
  ));
}

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Pairs this observable's values with those of `other` by index. The
  /// element types may differ. Completion and errors follow [`zip`].
  pub fn zip_with<U: 'static>(
    self,
    other: Observable<U, E>,
  ) -> Observable<(T, U), E> {
    Observable::new(move |downstream: Subscriber<(T, U), E>| {
      let state = Rc::new(RefCell::new(PairState {
        a: VecDeque::new(),
        b: VecDeque::new(),
        a_done: false,
        b_done: false,
      }));
      subscribe_side(
        &self,
        &downstream,
        &state,
        |s, v| s.a.push_back(v),
        |s| s.a_done = true,
      );
      if !downstream.is_closed() {
        subscribe_side(
          &other,
          &downstream,
          &state,
          |s, v| s.b.push_back(v),
          |s| s.b_done = true,
        );
      }
    })
  }
}

pub fn zip_with<T, U, E>(
  other: Observable<U, E>,
) -> impl FnOnce(Observable<T, E>) -> Observable<(T, U), E>
where
  T: 'static,
  U: 'static,
  E: 'static,
{
  move |source| source.zip_with(other)
}
