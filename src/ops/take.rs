use std::cell::Cell;

use crate::{observable::Observable, ops::lift};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Emits only the first `count` values emitted by the source Observable.
  ///
  /// If the source emits fewer than `count` values then all of its values
  /// are emitted. After that, it completes, regardless if the source
  /// completes. `take(0)` completes as soon as it is subscribed.
  ///
  /// ```
  /// use pushrx::observable;
  ///
  /// observable::from_iter(0..10).take(5).subscribe(|v| println!("{v}"));
  ///
  /// // print logs:
  /// // 0
  /// // 1
  /// // 2
  /// // 3
  /// // 4
  /// ```
  pub fn take(self, count: usize) -> Observable<T, E> {
    Observable::new(move |subscriber| {
      if count == 0 {
        subscriber.complete();
        return;
      }
      let hit = Cell::new(0);
      lift(&self, subscriber, move |d, v| {
        // counted before forwarding, so a reentrant emission can't overshoot
        let n = hit.get() + 1;
        if n > count {
          return;
        }
        hit.set(n);
        d.next(v);
        if n == count {
          d.complete();
        }
      });
    })
  }
}

pub fn take<T, E>(
  count: usize,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: 'static,
  E: 'static,
{
  move |source| source.take(count)
}
