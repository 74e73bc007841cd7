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

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Maps a value to an observable only while no inner observable is
  /// running; source values arriving in the meantime are dropped.
  pub fn exhaust_map<U: 'static>(
    self,
    project: impl Fn(T) -> Observable<U, E> + 'static,
  ) -> Observable<U, E> {
    let project = Rc::new(project);
    Observable::new(move |downstream: Subscriber<U, E>| {
      let project = project.clone();
      let inner: Rc<RefCell<Option<LocalSubscription>>> = Rc::default();
      let outer_done = Rc::new(Cell::new(false));
      let is_busy = |inner: &RefCell<Option<LocalSubscription>>| {
        inner.borrow().as_ref().is_some_and(|s| !s.is_closed())
      };

      let (n_inner, c_inner) = (inner.clone(), inner);
      let (n_done, c_done) = (outer_done.clone(), outer_done);
      let (n_downstream, d_error, c_downstream) =
        (downstream.clone(), downstream.clone(), downstream.clone());
      self.subscribe_with(Subscriber::new(
        FnObserver::new(
          move |v| {
            if is_busy(&n_inner) {
              return;
            }
            let signal = n_downstream.signal().child();
            *n_inner.borrow_mut() = Some(signal.clone());
            let (d_next, d_error, d_complete) = (
              n_downstream.clone(),
              n_downstream.clone(),
              n_downstream.clone(),
            );
            let i_done = n_done.clone();
            project(v).subscribe_with(Subscriber::new(
              FnObserver::new(
                move |v| d_next.next(v),
                move |e| d_error.error(e),
                move || {
                  if i_done.get() {
                    d_complete.complete();
                  }
                },
              ),
              signal,
            ));
          },
          move |e| d_error.error(e),
          move || {
            c_done.set(true);
            if !is_busy(&c_inner) {
              c_downstream.complete();
            }
          },
        ),
        downstream.signal().child(),
      ));
    })
  }
}

pub fn exhaust_map<T, U, E>(
  project: impl Fn(T) -> Observable<U, E> + 'static,
) -> impl FnOnce(Observable<T, E>) -> Observable<U, E>
where
  T: 'static,
  U: 'static,
  E: 'static,
{
  move |source| source.exhaust_map(project)
}
