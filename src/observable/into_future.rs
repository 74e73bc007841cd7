//! Awaiting an observable.
//!
//! An observable converts into a future that resolves with its first value:
//!
//! - first value: `Ok(value)`, and the source is unsubscribed
//! - error before any value: `Err(error)`
//! - completion without values: `Err(EmptyError.into())`
//!
//! Dropping the future before it resolves unsubscribes from the source.

use std::{
  future::{Future, IntoFuture},
  pin::Pin,
  task::{Context, Poll},
};

use futures::{channel::oneshot, ready};
use pin_project_lite::pin_project;

use crate::{
  error::EmptyError,
  observable::Observable,
  subscription::{LocalSubscription, SubscriptionGuard},
};

pin_project! {
  /// A future that resolves with the first value emitted by an observable.
  pub struct ObservableFuture<T, E> {
    #[pin]
    receiver: oneshot::Receiver<Result<T, E>>,
    _guard: SubscriptionGuard<LocalSubscription>,
  }
}

impl<T, E> Future for ObservableFuture<T, E> {
  type Output = Result<T, E>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    match ready!(self.project().receiver.poll(cx)) {
      Ok(result) => Poll::Ready(result),
      // The source dropped its subscriber without a terminal event, so
      // nothing can ever arrive.
      Err(oneshot::Canceled) => Poll::Pending,
    }
  }
}

impl<T, E> Observable<T, E>
where
  T: 'static,
  E: From<EmptyError> + 'static,
{
  /// Subscribes and returns a future of the first value.
  pub fn to_future(&self) -> ObservableFuture<T, E> {
    let (sender, receiver) = oneshot::channel();
    let sender = std::rc::Rc::new(std::cell::RefCell::new(Some(sender)));
    let c_sender = sender.clone();
    let subscription = self.clone().first().subscribe_err(
      move |v| send(&sender, Ok(v)),
      move |e| send(&c_sender, Err(e)),
    );
    ObservableFuture {
      receiver,
      _guard: subscription.unsubscribe_when_dropped(),
    }
  }
}

fn send<T, E>(
  sender: &std::cell::RefCell<Option<oneshot::Sender<Result<T, E>>>>,
  msg: Result<T, E>,
) {
  let sender = sender.borrow_mut().take();
  if let Some(sender) = sender {
    // The receiver may already be gone; nothing is waiting then.
    let _ = sender.send(msg);
  }
}

impl<T, E> IntoFuture for Observable<T, E>
where
  T: 'static,
  E: From<EmptyError> + 'static,
{
  type Output = Result<T, E>;
  type IntoFuture = ObservableFuture<T, E>;

  fn into_future(self) -> Self::IntoFuture { self.to_future() }
}
