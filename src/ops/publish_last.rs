use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::{
  observable::Observable,
  observer::FnObserver,
  subject::ReplaySubject,
  subscriber::Subscriber,
  subscription::LocalSubscription,
};

impl<T: Clone + 'static, E: Clone + 'static> Observable<T, E> {
  /// Multicasts only the last value of the source, delivered to every
  /// subscriber when the source completes.
  ///
  /// The first subscriber connects to the source. The source subscription is
  /// kept until the source terminates so the last value is always recorded;
  /// subscribers arriving afterwards receive that value and the completion.
  pub fn publish_last(self) -> Observable<T, E> {
    let subject = ReplaySubject::with_capacity(1);
    let connected = Rc::new(Cell::new(false));
    Observable::new(move |subscriber| {
      subject.observable().subscribe_with(subscriber);
      if connected.replace(true) {
        return;
      }
      let last: Rc<RefCell<Option<T>>> = Rc::default();
      let (e_subject, c_subject) = (subject.clone(), subject.clone());
      let c_last = last.clone();
      self.subscribe_with(Subscriber::new(
        FnObserver::new(
          move |v| *last.borrow_mut() = Some(v),
          move |e| e_subject.error(e),
          move || {
            let value = c_last.borrow_mut().take();
            if let Some(value) = value {
              c_subject.next(value);
            }
            c_subject.complete();
          },
        ),
        LocalSubscription::default(),
      ));
    })
  }
}

pub fn publish_last<T, E>() -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: Clone + 'static,
  E: Clone + 'static,
{
  |source| source.publish_last()
}

#[cfg(test)]
mod test {
  use crate::{error::RxError, observable, subject::Subject};
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  #[test]
  fn emits_last_value_to_all_subscribers() {
    // Given
    let source = Subject::<i32>::new();
    let published = source.observable().publish_last();
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    published.subscribe(move |v| l1.borrow_mut().push(format!("a{v}")));
    published.subscribe(move |v| l2.borrow_mut().push(format!("b{v}")));

    // When
    source.next(1);
    source.next(2);
    assert!(log.borrow().is_empty());
    source.complete();

    // Then
    assert_eq!(*log.borrow(), vec!["a2", "b2"]);
    assert_eq!(source.observer_count(), 0);
  }

  #[test]
  fn late_subscriber_gets_recorded_value() {
    let subscribes = Rc::new(Cell::new(0));
    let c_subscribes = subscribes.clone();
    let published = observable::defer(move || {
      c_subscribes.set(c_subscribes.get() + 1);
      observable::from_iter([1, 2, 3])
    })
    .publish_last();
    published.subscribe(|_| {});

    let log = Rc::new(RefCell::new(vec![]));
    let (n, c) = (log.clone(), log.clone());
    published.subscribe_complete(
      move |v| n.borrow_mut().push(v.to_string()),
      move || c.borrow_mut().push("|".into()),
    );

    assert_eq!(*log.borrow(), vec!["3", "|"]);
    assert_eq!(subscribes.get(), 1);
  }

  #[test]
  fn error_reaches_every_subscriber() {
    let published = observable::throw_error::<i32, _>(RxError::Empty)
      .publish_last();
    let errors = Rc::new(Cell::new(0));
    let (e1, e2) = (errors.clone(), errors.clone());
    published.subscribe_err(|_| {}, move |_| e1.set(e1.get() + 1));
    published.subscribe_err(|_| {}, move |_| e2.set(e2.get() + 1));
    assert_eq!(errors.get(), 2);
  }
}
