use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::{
  observable::Observable,
  observer::FnObserver,
  subscriber::Subscriber,
  subscription::{LocalSubscription, Subscription},
};

struct SwitchState {
  inner: RefCell<Option<LocalSubscription>>,
  outer_done: Cell<bool>,
}

impl SwitchState {
  fn inner_active(&self) -> bool {
    self.inner.borrow().as_ref().is_some_and(|s| !s.is_closed())
  }
}

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Maps each value to an observable and mirrors only the most recent one.
  ///
  /// A new source value unsubscribes the previous inner observable before the
  /// next one is subscribed. Completes once the source and the current inner
  /// observable have completed.
  pub fn switch_map<U: 'static>(
    self,
    project: impl Fn(T) -> Observable<U, E> + 'static,
  ) -> Observable<U, E> {
    let project = Rc::new(project);
    Observable::new(move |downstream: Subscriber<U, E>| {
      let state = Rc::new(SwitchState {
        inner: RefCell::new(None),
        outer_done: Cell::new(false),
      });
      let project = project.clone();
      let (n_state, c_state) = (state.clone(), state);
      let (n_downstream, d_error, c_downstream) =
        (downstream.clone(), downstream.clone(), downstream.clone());
      self.subscribe_with(Subscriber::new(
        FnObserver::new(
          move |v| {
            let previous = n_state.inner.borrow_mut().take();
            if let Some(previous) = previous {
              previous.unsubscribe();
            }
            let signal = n_downstream.signal().child();
            *n_state.inner.borrow_mut() = Some(signal.clone());
            let (d_next, d_error, d_complete) = (
              n_downstream.clone(),
              n_downstream.clone(),
              n_downstream.clone(),
            );
            let i_state = n_state.clone();
            project(v).subscribe_with(Subscriber::new(
              FnObserver::new(
                move |v| d_next.next(v),
                move |e| d_error.error(e),
                move || {
                  if i_state.outer_done.get() {
                    d_complete.complete();
                  }
                },
              ),
              signal,
            ));
          },
          move |e| d_error.error(e),
          move || {
            c_state.outer_done.set(true);
            if !c_state.inner_active() {
              c_downstream.complete();
            }
          },
        ),
        downstream.signal().child(),
      ));
    })
  }
}

pub fn switch_map<T, U, E>(
  project: impl Fn(T) -> Observable<U, E> + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<U, E>
where
  T: 'static,
  U: 'static,
  E: 'static,
{
  move |source| source.switch_map(project)
}
