use crate::{observable::Observable, ops::lift};

impl<T: 'static, E: 'static> Observable<T, E> {
  /// Ignores all values, passing only error and completion through.
  pub fn ignore_elements(self) -> Observable<T, E> {
    Observable::new(move |subscriber| lift(&self, subscriber, |_, _| {}))
  }
}

pub fn ignore_elements<T: 'static, E: 'static>(
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E> {
  move |source| source.ignore_elements()
}
