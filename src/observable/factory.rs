use crate::{error::RxError, observable::Observable};

/// Creates an observable that emits `value` once and completes.
pub fn of<T: Clone + 'static>(value: T) -> Observable<T> {
  Observable::new(move |subscriber| {
    subscriber.next(value.clone());
    subscriber.complete();
  })
}

/// Creates an observable that emits every item of `iter`, then completes.
///
/// Emission stops early once the subscriber is closed, so `take` and `first`
/// don't drain the whole iterator.
///
/// ```
/// use pushrx::observable;
///
/// observable::from_iter(0..10).take(5).subscribe(|v| println!("{v}"));
/// ```
pub fn from_iter<I>(iter: I) -> Observable<I::Item>
where
  I: IntoIterator + Clone + 'static,
  I::Item: 'static,
{
  Observable::new(move |subscriber| {
    for v in iter.clone() {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  })
}

/// Creates an observable that completes without emitting.
pub fn empty<T: 'static>() -> Observable<T> {
  Observable::new(|subscriber| subscriber.complete())
}

/// Creates an observable that never emits and never completes.
pub fn never<T: 'static>() -> Observable<T> { Observable::new(|_| {}) }

/// Creates an observable that errors with `err` as soon as it is subscribed.
pub fn throw_error<T: 'static, E: Clone + 'static>(err: E) -> Observable<T, E> {
  Observable::new(move |subscriber| subscriber.error(err.clone()))
}

/// Creates an observable that calls `factory` on every subscription and
/// subscribes to the observable it returns.
pub fn defer<T: 'static, E: 'static>(
  factory: impl Fn() -> Observable<T, E> + 'static,
) -> Observable<T, E> {
  Observable::new(move |subscriber| factory().subscribe_with(subscriber))
}

/// Creates an observable of `RxError` type from a producer returning a
/// `Result`, a shorthand over `Observable::try_new` for the default error.
pub fn create<T: 'static>(
  producer: impl Fn(&crate::subscriber::Subscriber<T>) -> Result<(), RxError>
    + 'static,
) -> Observable<T> {
  Observable::try_new(producer)
}
