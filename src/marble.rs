//! Marble diagrams over virtual time.
//!
//! Each character of a diagram is one frame (one millisecond on the
//! harness's [`TestScheduler`]): `-` is an idle frame, `|` completes, `#`
//! errors, `( )` groups events into a single frame and any other character is
//! emitted as a one-character `String`.
//!
//! ```rust
//! use pushrx::{marble::Marbles, ops};
//!
//! let marbles = Marbles::new();
//! let a = marbles.cold("---a-----b-|");
//! let b = marbles.cold("-x---y-----|");
//! let merged = ops::merge([a.observable(), b.observable()]);
//! assert_eq!(marbles.expect_log(&merged), "-x-a-y---b-|");
//! ```

use std::{
  cell::{Cell, RefCell},
  fmt::Display,
  rc::Rc,
  time::Duration,
};

use crate::{
  error::RxError,
  observable::Observable,
  scheduler::{Scheduler, TaskHandle, TestScheduler},
  subscriber::Subscriber,
  subscription::Subscription,
};

const FRAME: Duration = Duration::from_millis(1);

/// Frames `expect_log` runs at most before giving up on a source that never
/// terminates.
const MAX_FRAMES: usize = 100;

fn frame_of(time: Duration) -> i64 { time.as_millis() as i64 }

/// Owns the virtual clock shared by cold observables and the event log.
#[derive(Default)]
pub struct Marbles {
  scheduler: TestScheduler,
}

impl Marbles {
  pub fn new() -> Self { Self::default() }

  /// The clock driving this harness; pass it to time-based operators under
  /// test.
  pub fn scheduler(&self) -> TestScheduler { self.scheduler.clone() }

  /// A cold observable playing `diagram` from the moment it is subscribed.
  /// `#` errors with a generic message.
  pub fn cold(&self, diagram: &str) -> ColdObservable {
    self.cold_with_error(diagram, RxError::from("error"))
  }

  pub fn cold_with_error(
    &self,
    diagram: &str,
    error: RxError,
  ) -> ColdObservable {
    let frames: Rc<[Vec<char>]> = parse(diagram).into();
    let log = Rc::new(RefCell::new(SubscriptionLog {
      text: String::new(),
      time: self.scheduler.now(),
      last_pos: 0,
    }));
    let (c_log, scheduler) = (log.clone(), self.scheduler.clone());
    let observable = Observable::new(move |subscriber: Subscriber<String>| {
      c_log.borrow_mut().record(scheduler.now(), '^');
      let run = Rc::new(ColdRun {
        frames: frames.clone(),
        error: error.clone(),
        pos: Cell::new(0),
        done: Cell::new(false),
        handle: RefCell::new(None),
      });
      let (t_run, t_log, t_scheduler) =
        (run.clone(), c_log.clone(), scheduler.clone());
      subscriber.signal().add_teardown(move || {
        if !t_run.done.get() {
          t_log.borrow_mut().record(t_scheduler.now(), '!');
        }
        let handle = t_run.handle.borrow_mut().take();
        if let Some(handle) = handle {
          handle.unsubscribe();
        }
      });
      tick(&run, &subscriber, &scheduler);
    });
    ColdObservable { observable, log }
  }

  /// Subscribes to `observable`, runs the clock until nothing is scheduled
  /// any more, and renders what was observed as a diagram.
  ///
  /// Values are rendered with `Display`; several events in one frame are
  /// grouped in parentheses. The clock is rewound to zero afterwards.
  pub fn expect_log<T: Display + 'static, E: 'static>(
    &self,
    observable: &Observable<T, E>,
  ) -> String {
    let start = self.scheduler.now();
    let log: Rc<RefCell<EventLog>> = Rc::default();
    let (n_log, e_log, c_log) = (log.clone(), log.clone(), log.clone());
    let (n_clock, e_clock, c_clock) =
      (self.scheduler.clone(), self.scheduler.clone(), self.scheduler.clone());
    let subscription = observable.subscribe_err_complete(
      move |v| {
        let frame = frame_of(n_clock.now() - start);
        n_log.borrow_mut().push(frame, v.to_string())
      },
      move |_| {
        let frame = frame_of(e_clock.now() - start);
        e_log.borrow_mut().terminate(frame, '#')
      },
      move || {
        let frame = frame_of(c_clock.now() - start);
        c_log.borrow_mut().terminate(frame, '|')
      },
    );

    let mut frames = 0;
    while self.scheduler.pending_count() > 0 && frames < MAX_FRAMES {
      self.scheduler.advance_by(FRAME);
      frames += 1;
    }
    let eof = frame_of(self.scheduler.now() - start);
    subscription.unsubscribe();
    self.scheduler.reset();

    let rendered = log.borrow().render(eof);
    rendered
  }
}

/// A cold observable built from a diagram that also records when it was
/// subscribed (`^`) and unsubscribed (`!`).
pub struct ColdObservable {
  observable: Observable<String>,
  log: Rc<RefCell<SubscriptionLog>>,
}

impl ColdObservable {
  pub fn observable(&self) -> Observable<String> { self.observable.clone() }

  /// Subscription diagram: `^` at each subscribe frame, `!` where a
  /// subscription was cancelled before the diagram ran out.
  pub fn subscriptions(&self) -> String { self.log.borrow().text.clone() }
}

struct ColdRun {
  frames: Rc<[Vec<char>]>,
  error: RxError,
  pos: Cell<usize>,
  done: Cell<bool>,
  handle: RefCell<Option<TaskHandle>>,
}

fn tick(
  run: &Rc<ColdRun>,
  subscriber: &Subscriber<String>,
  scheduler: &TestScheduler,
) {
  let Some(frame) = run.frames.get(run.pos.get()) else {
    run.done.set(true);
    return;
  };
  run.pos.set(run.pos.get() + 1);

  // the next frame is scheduled first so a terminal event below cancels it
  let (n_run, n_subscriber, n_scheduler) =
    (run.clone(), subscriber.clone(), scheduler.clone());
  let handle = scheduler.schedule(
    FRAME,
    Box::new(move || tick(&n_run, &n_subscriber, &n_scheduler)),
  );
  *run.handle.borrow_mut() = Some(handle);

  for c in frame {
    match c {
      '|' => subscriber.complete(),
      '#' => subscriber.error(run.error.clone()),
      '-' | ' ' => {}
      c => subscriber.next(c.to_string()),
    }
  }
}

fn parse(diagram: &str) -> Vec<Vec<char>> {
  let mut frames = vec![];
  let mut chars = diagram.chars();
  while let Some(c) = chars.next() {
    if c == '(' {
      frames.push(chars.by_ref().take_while(|c| *c != ')').collect());
    } else {
      frames.push(vec![c]);
    }
  }
  frames
}

struct SubscriptionLog {
  text: String,
  time: Duration,
  last_pos: usize,
}

impl SubscriptionLog {
  fn record(&mut self, now: Duration, event: char) {
    let diff = frame_of(now) - frame_of(self.time);
    if diff == 0 && !self.text.is_empty() {
      if self.text[self.last_pos..].starts_with('(') {
        self.text.pop();
      } else {
        self.text.insert(self.last_pos, '(');
      }
      self.text.push(event);
      self.text.push(')');
    } else {
      if diff > 0 {
        let pad = diff as usize - usize::from(!self.text.is_empty());
        self.text.extend(std::iter::repeat(' ').take(pad));
      }
      self.last_pos = self.text.len();
      self.text.push(event);
    }
    self.time = now;
  }
}

#[derive(Default)]
struct EventLog {
  events: Vec<(i64, String)>,
  terminated: bool,
}

impl EventLog {
  fn push(&mut self, frame: i64, event: String) {
    self.events.push((frame, event))
  }

  fn terminate(&mut self, frame: i64, event: char) {
    self.push(frame, event.to_string());
    self.terminated = true;
  }

  fn render(&self, eof: i64) -> String {
    let mut out = String::new();
    let mut next_frame = 0;
    let mut events = self.events.iter().peekable();
    while let Some((frame, first)) = events.next() {
      out.extend(
        std::iter::repeat('-').take((frame - next_frame).max(0) as usize),
      );
      let mut group = vec![first.as_str()];
      while let Some((_, event)) = events.next_if(|(f, _)| f == frame) {
        group.push(event);
      }
      if group.len() > 1 {
        out.push('(');
        out.push_str(&group.concat());
        out.push(')');
      } else {
        out.push_str(first);
      }
      next_frame = frame + 1;
    }
    if !self.terminated {
      out.extend(
        std::iter::repeat('-').take((eof - next_frame).max(0) as usize),
      );
    }
    out
  }
}
