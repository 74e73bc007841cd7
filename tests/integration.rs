use std::{
  cell::{Cell, RefCell},
  panic::{catch_unwind, AssertUnwindSafe},
  rc::Rc,
};

use pushrx::prelude::*;

#[test]
fn map_filter_pipeline() {
  let values = Rc::new(RefCell::new(vec![]));
  let completed = Rc::new(Cell::new(false));
  let errored = Rc::new(Cell::new(false));
  let (c_values, c_completed, c_errored) =
    (values.clone(), completed.clone(), errored.clone());

  observable::from_iter([1, 2, 3])
    .pipe(ops::map(|x: i32| x * 2))
    .pipe(ops::filter(|x: &i32| *x > 2))
    .subscribe_err_complete(
      move |v| c_values.borrow_mut().push(v),
      move |_| c_errored.set(true),
      move || c_completed.set(true),
    );

  assert_eq!(*values.borrow(), vec![4, 6]);
  assert!(completed.get());
  assert!(!errored.get());
}

#[test]
fn pipe_macro_chains_operators() {
  let values = Rc::new(RefCell::new(vec![]));
  let c_values = values.clone();
  observable::from_iter(1..=6)
    .pipe(pipe!(ops::filter(|x: &i32| x % 2 == 1), ops::map(|x: i32| x * 10)))
    .subscribe(move |v| c_values.borrow_mut().push(v));
  assert_eq!(*values.borrow(), vec![10, 30, 50]);
}

#[test]
fn unsubscribe_runs_teardown_once() {
  let teardowns = Rc::new(Cell::new(0));
  let c_teardowns = teardowns.clone();
  let source = Observable::<i32>::new(move |subscriber| {
    let t = c_teardowns.clone();
    subscriber.signal().add_teardown(move || t.set(t.get() + 1));
  });

  let subscription = source.subscribe(|_| {});
  assert!(!subscription.is_closed());
  subscription.unsubscribe();
  subscription.unsubscribe();

  assert!(subscription.is_closed());
  assert_eq!(teardowns.get(), 1);
}

#[test]
fn guard_unsubscribes_on_drop() {
  let subject = Subject::<i32>::new();
  {
    let _guard = subject
      .observable()
      .subscribe(|_| {})
      .unsubscribe_when_dropped();
    assert_eq!(subject.observer_count(), 1);
  }
  assert_eq!(subject.observer_count(), 0);
}

#[test]
fn subject_fans_out_in_registration_order() {
  let subject = Subject::<i32>::new();
  let log = Rc::new(RefCell::new(vec![]));
  let (l1, l2) = (log.clone(), log.clone());
  subject.observable().subscribe(move |v| l1.borrow_mut().push(("o1", v)));
  subject.observable().subscribe(move |v| l2.borrow_mut().push(("o2", v)));

  for v in 1..=3 {
    subject.next(v);
  }

  assert_eq!(
    *log.borrow(),
    vec![("o1", 1), ("o2", 1), ("o1", 2), ("o2", 2), ("o1", 3), ("o2", 3)]
  );
}

#[test]
fn completed_subject_ignores_values_and_completes_newcomers() {
  let subject = Subject::<i32>::new();
  subject.complete();
  subject.next(1);

  let completed = Rc::new(Cell::new(false));
  let c_completed = completed.clone();
  subject.observable().subscribe_complete(
    |_| panic!("no value expected"),
    move || c_completed.set(true),
  );

  assert!(completed.get());
  assert_eq!(subject.observer_count(), 0);
}

#[test]
fn panicking_error_handler_escapes_subject() {
  let subject = Subject::<i32>::new();
  subject.observable().subscribe_err(|_| {}, |_| panic!("handler failed"));
  let result = catch_unwind(
    AssertUnwindSafe(|| subject.error(RxError::from("boom"))),
  );
  assert!(result.is_err());
}

#[test]
fn behavior_subject_replays_current_value_synchronously() {
  let subject = BehaviorSubject::<&str>::new("initial");
  let seen = Rc::new(RefCell::new(vec![]));
  let c_seen = seen.clone();
  subject.observable().subscribe(move |v| c_seen.borrow_mut().push(v));
  assert_eq!(*seen.borrow(), vec!["initial"]);

  subject.next("changed");
  assert_eq!(subject.value(), "changed");
  assert_eq!(*seen.borrow(), vec!["initial", "changed"]);
}

#[test]
fn replay_subject_replays_before_live_values() {
  let subject = ReplaySubject::<i32>::with_capacity(2);
  for v in 1..=5 {
    subject.next(v);
  }
  let seen = Rc::new(RefCell::new(vec![]));
  let c_seen = seen.clone();
  subject.observable().subscribe(move |v| c_seen.borrow_mut().push(v));
  subject.next(6);
  assert_eq!(*seen.borrow(), vec![4, 5, 6]);
}

#[test]
fn reference_reports_missing_value() {
  let reference = Reference::<i32>::new();
  assert_eq!(reference.value(), Err(RxError::NoValue));
  reference.next(7);
  assert_eq!(reference.value(), Ok(7));
}

#[test]
fn ordered_subject_queues_reentrant_values() {
  let subject = OrderedSubject::<i32>::new();
  let seen = Rc::new(RefCell::new(vec![]));
  let (c_seen, c_subject) = (seen.clone(), subject.clone());
  subject.observable().subscribe(move |v| {
    c_seen.borrow_mut().push(v);
    if v == 2 {
      c_subject.next(4);
    }
  });

  subject.next(1);
  subject.next(2);
  subject.next(3);

  assert_eq!(*seen.borrow(), vec![1, 2, 4, 3]);
}

#[test]
fn concat_of_synchronous_sources() {
  let seen = Rc::new(RefCell::new(vec![]));
  let completed = Rc::new(Cell::new(false));
  let (c_seen, c_completed) = (seen.clone(), completed.clone());
  ops::concat([observable::from_iter([1, 2]), observable::from_iter([3, 4])])
    .subscribe_complete(
      move |v| c_seen.borrow_mut().push(v),
      move || c_completed.set(true),
    );
  assert_eq!(*seen.borrow(), vec![1, 2, 3, 4]);
  assert!(completed.get());
}

#[test]
fn combine_latest_with_silent_source_never_emits() {
  let emitted = Rc::new(Cell::new(false));
  let completed = Rc::new(Cell::new(false));
  let (c_emitted, c_completed) = (emitted.clone(), completed.clone());
  ops::combine_latest([observable::of(1), observable::never()])
    .subscribe_complete(
      move |_| c_emitted.set(true),
      move || c_completed.set(true),
    );
  assert!(!emitted.get());
  assert!(!completed.get());
}

#[test]
fn zip_is_bounded_by_shorter_source() {
  let rows = Rc::new(RefCell::new(vec![]));
  let completed = Rc::new(Cell::new(false));
  let (c_rows, c_completed) = (rows.clone(), completed.clone());
  ops::zip([
    observable::from_iter(["1", "2", "3"]),
    observable::from_iter(["a", "b"]),
  ])
  .subscribe_complete(
    move |row| c_rows.borrow_mut().push(row),
    move || c_completed.set(true),
  );
  assert_eq!(*rows.borrow(), vec![vec!["1", "a"], vec!["2", "b"]]);
  assert!(completed.get());
}

#[test]
fn distinct_until_changed_sequence() {
  let seen = Rc::new(RefCell::new(vec![]));
  let c_seen = seen.clone();
  observable::from_iter([1, 1, 2, 2, 1, 3])
    .distinct_until_changed()
    .subscribe(move |v| c_seen.borrow_mut().push(v));
  assert_eq!(*seen.borrow(), vec![1, 2, 1, 3]);
}

#[test]
fn share_keeps_a_single_upstream_subscription() {
  let active = Rc::new(Cell::new(0));
  let c_active = active.clone();
  let shared = Observable::<i32>::new(move |subscriber| {
    c_active.set(c_active.get() + 1);
    let t = c_active.clone();
    subscriber.signal().add_teardown(move || t.set(t.get() - 1));
  })
  .pipe(ops::share());

  let first = shared.subscribe(|_| {});
  let second = shared.subscribe(|_| {});
  assert_eq!(active.get(), 1);

  first.unsubscribe();
  assert_eq!(active.get(), 1);
  second.unsubscribe();
  assert_eq!(active.get(), 0);
}

#[test]
fn first_of_empty_source_is_an_error() {
  let error = Rc::new(RefCell::new(None));
  let completed = Rc::new(Cell::new(false));
  let (c_error, c_completed) = (error.clone(), completed.clone());
  observable::empty::<i32>()
    .first()
    .subscribe_err_complete(
      |_| {},
      move |e| *c_error.borrow_mut() = Some(e),
      move || c_completed.set(true),
    );
  assert_eq!(*error.borrow(), Some(RxError::Empty));
  assert!(!completed.get());
}

#[test]
fn catch_error_switches_to_fallback() {
  let seen = Rc::new(RefCell::new(vec![]));
  let c_seen = seen.clone();
  observable::from_iter([1, 2])
    .concat_with(observable::throw_error(RxError::from("boom")))
    .catch_error(|_| observable::of(-1))
    .subscribe(move |v| c_seen.borrow_mut().push(v));
  assert_eq!(*seen.borrow(), vec![1, 2, -1]);
}

#[test]
fn virtual_clock_drives_interval() {
  let scheduler = TestScheduler::new();
  let seen = Rc::new(RefCell::new(vec![]));
  let c_seen = seen.clone();
  let period = std::time::Duration::from_millis(10);
  let subscription = observable::interval(period, scheduler.clone())
    .take(3)
    .subscribe(move |v| c_seen.borrow_mut().push(v));

  scheduler.advance_by(std::time::Duration::from_millis(25));
  assert_eq!(*seen.borrow(), vec![0, 1]);
  scheduler.flush();
  assert_eq!(*seen.borrow(), vec![0, 1, 2]);
  assert!(subscription.is_closed());
  assert_eq!(scheduler.pending_count(), 0);
}
