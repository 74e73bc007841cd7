use std::{
  cell::{Cell, RefCell},
  collections::VecDeque,
  rc::Rc,
};

use crate::{
  observable::Observable,
  observer::FnObserver,
  subscriber::Subscriber,
  subscription::{DynamicSubscriptions, LocalSubscription},
};

struct MergeMap<T, U, E> {
  project: Rc<dyn Fn(T) -> Observable<U, E>>,
  concurrency: usize,
  downstream: Subscriber<U, E>,
  state: RefCell<MergeMapState<T>>,
  draining: Cell<bool>,
}

struct MergeMapState<T> {
  inners: DynamicSubscriptions<LocalSubscription>,
  buffer: VecDeque<T>,
  outer_done: bool,
}

impl<T: 'static, U: 'static, E: 'static> MergeMap<T, U, E> {
  fn on_outer_next(self: &Rc<Self>, value: T) {
    self.state.borrow_mut().buffer.push_back(value);
    self.drain();
  }

  fn on_outer_complete(self: &Rc<Self>) {
    self.state.borrow_mut().outer_done = true;
    self.drain();
  }

  fn on_inner_complete(self: &Rc<Self>, id: usize) {
    self.state.borrow_mut().inners.remove(id);
    self.drain();
  }

  /// Starts buffered values while there is room, then completes when nothing
  /// is left to run. Only the outermost call does the work: an inner that
  /// completes while it is being subscribed is picked up by the running
  /// loop instead of recursing.
  fn drain(self: &Rc<Self>) {
    if self.draining.replace(true) {
      return;
    }
    loop {
      if self.downstream.is_closed() {
        break;
      }
      let next = {
        let mut state = self.state.borrow_mut();
        if state.inners.len() < self.concurrency {
          state.buffer.pop_front()
        } else {
          None
        }
      };
      match next {
        Some(value) => self.subscribe_inner(value),
        None => break,
      }
    }
    self.draining.set(false);

    let done = {
      let state = self.state.borrow();
      state.outer_done && state.inners.is_empty() && state.buffer.is_empty()
    };
    if done {
      self.downstream.complete();
    }
  }

  fn subscribe_inner(self: &Rc<Self>, value: T) {
    let signal = self.downstream.signal().child();
    let id = self.state.borrow_mut().inners.add(signal.clone());
    let inner = (self.project)(value);
    let (d_next, d_error) = (self.downstream.clone(), self.downstream.clone());
    let this = self.clone();
    inner.subscribe_with(Subscriber::new(
      FnObserver::new(
        move |v| d_next.next(v),
        move |e| d_error.error(e),
        move || this.on_inner_complete(id),
      ),
      signal,
    ));
  }
}

fn merge_map_with<T, U, E>(
  source: Observable<T, E>,
  project: Rc<dyn Fn(T) -> Observable<U, E>>,
  concurrency: usize,
) -> Observable<U, E>
where
  T: 'static,
  U: 'static,
  E: 'static,
{
  let concurrency = concurrency.max(1);
  Observable::new(move |downstream: Subscriber<U, E>| {
    let ctx = Rc::new(MergeMap {
      project: project.clone(),
      concurrency,
      downstream: downstream.clone(),
      state: RefCell::new(MergeMapState {
        inners: DynamicSubscriptions::new(),
        buffer: VecDeque::new(),
        outer_done: false,
      }),
      draining: Cell::new(false),
    });
    let (n_ctx, c_ctx) = (ctx.clone(), ctx);
    let d_error = downstream.clone();
    source.subscribe_with(Subscriber::new(
      FnObserver::new(
        move |v| n_ctx.on_outer_next(v),
        move |e| d_error.error(e),
        move || c_ctx.on_outer_complete(),
      ),
      downstream.signal().child(),
    ));
  })
}

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Maps each value to an observable and merges all of them into the output.
  ///
  /// Inner observables run concurrently. Completes once the source and every
  /// inner observable have completed; any error ends everything.
  pub fn merge_map<U: 'static>(
    self,
    project: impl Fn(T) -> Observable<U, E> + 'static,
  ) -> Observable<U, E> {
    merge_map_with(self, Rc::new(project), usize::MAX)
  }

  /// Like `merge_map`, running at most `concurrency` inner observables at a
  /// time. Further source values wait in a buffer, in arrival order. A
  /// concurrency of zero is treated as one.
  pub fn merge_map_with_concurrency<U: 'static>(
    self,
    project: impl Fn(T) -> Observable<U, E> + 'static,
    concurrency: usize,
  ) -> Observable<U, E> {
    merge_map_with(self, Rc::new(project), concurrency)
  }

  /// Maps each value to an observable and subscribes to them one at a time,
  /// in source order.
  pub fn concat_map<U: 'static>(
    self,
    project: impl Fn(T) -> Observable<U, E> + 'static,
  ) -> Observable<U, E> {
    merge_map_with(self, Rc::new(project), 1)
  }
}

pub fn merge_map<T, U, E>(
  project: impl Fn(T) -> Observable<U, E> + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<U, E>
where
  T: 'static,
  U: 'static,
  E: 'static,
{
  move |source| source.merge_map(project)
}

pub fn merge_map_with_concurrency<T, U, E>(
  project: impl Fn(T) -> Observable<U, E> + 'static,
  concurrency: usize,
) -> impl FnOnce(Observable<T, E>) -> Observable<U, E>
where
  T: 'static,
  U: 'static,
  E: 'static,
{
  move |source| source.merge_map_with_concurrency(project, concurrency)
}

pub fn concat_map<T, U, E>(
  project: impl Fn(T) -> Observable<U, E> + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<U, E>
where
  T: 'static,
  U: 'static,
  E: 'static,
{
  move |source| source.concat_map(project)
}
