use std::future::Future;

use futures::{
  future::abortable,
  task::{LocalSpawn, LocalSpawnExt, SpawnError},
};

use crate::observable::Observable;

/// Creates an observable from an async computation.
///
/// Every subscription calls `factory` and spawns the returned future on
/// `spawner`. `Ok(v)` is emitted followed by completion, `Err(e)` becomes an
/// error notification. Unsubscribing aborts the running future. A spawner
/// that refuses the future errors the subscriber with the `SpawnError`.
///
/// ```
/// use futures::executor::LocalPool;
/// use pushrx::{error::RxError, observable};
///
/// let mut pool = LocalPool::new();
/// observable::from_async(|| async { Ok::<_, RxError>(42) }, pool.spawner())
///   .subscribe(|v| println!("{v}"));
/// pool.run();
/// ```
pub fn from_async<T, E, F, Fut, S>(factory: F, spawner: S) -> Observable<T, E>
where
  T: 'static,
  E: From<SpawnError> + 'static,
  F: Fn() -> Fut + 'static,
  Fut: Future<Output = Result<T, E>> + 'static,
  S: LocalSpawn + 'static,
{
  Observable::new(move |subscriber| {
    let (task, handle) = abortable(factory());
    let c_subscriber = subscriber.clone();
    let spawned = spawner.spawn_local(async move {
      if let Ok(result) = task.await {
        match result {
          Ok(v) => {
            c_subscriber.next(v);
            c_subscriber.complete();
          }
          Err(e) => c_subscriber.error(e),
        }
      }
    });
    match spawned {
      Ok(()) => subscriber.signal().add_teardown(move || handle.abort()),
      Err(err) => {
        tracing::error!(%err, "failed to spawn async source");
        subscriber.error(err.into());
      }
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{error::RxError, subscription::Subscription};
  use futures::{executor::LocalPool, task::LocalFutureObj};
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  #[test]
  fn resolves_then_completes() {
    let mut pool = LocalPool::new();
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());

    from_async(|| async { Ok::<_, RxError>(42) }, pool.spawner())
      .subscribe_complete(
        move |v| c_values.borrow_mut().push(v),
        move || c_completed.set(true),
      );
    assert!(values.borrow().is_empty());

    pool.run();
    assert_eq!(*values.borrow(), vec![42]);
    assert!(completed.get());
  }

  #[test]
  fn rejection_becomes_error() {
    let mut pool = LocalPool::new();
    let error = Rc::new(RefCell::new(None));
    let c_error = error.clone();
    from_async(
      || async { Err::<i32, _>(RxError::from("failed")) },
      pool.spawner(),
    )
    .subscribe_err(|_| {}, move |e| *c_error.borrow_mut() = Some(e));
    pool.run();
    assert_eq!(*error.borrow(), Some(RxError::from("failed")));
  }

  #[test]
  fn unsubscribe_aborts() {
    let mut pool = LocalPool::new();
    let hit = Rc::new(Cell::new(false));
    let c_hit = hit.clone();
    let subscription =
      from_async(|| async { Ok::<_, RxError>(1) }, pool.spawner())
        .subscribe(move |_| c_hit.set(true));
    subscription.unsubscribe();
    pool.run();
    assert!(!hit.get());
  }

  struct ShutDown;

  impl LocalSpawn for ShutDown {
    fn spawn_local_obj(
      &self,
      _: LocalFutureObj<'static, ()>,
    ) -> Result<(), SpawnError> {
      Err(SpawnError::shutdown())
    }
  }

  #[test]
  fn refused_spawn_becomes_error() {
    let error = Rc::new(RefCell::new(None));
    let c_error = error.clone();
    let subscription = from_async(|| async { Ok::<_, RxError>(1) }, ShutDown)
      .subscribe_err(|_| {}, move |e| *c_error.borrow_mut() = Some(e));
    assert_eq!(
      *error.borrow(),
      Some(RxError::Message(SpawnError::shutdown().to_string()))
    );
    assert!(subscription.is_closed());
  }
}
