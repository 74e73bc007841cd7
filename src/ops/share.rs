use std::{cell::RefCell, rc::Rc};

use crate::{
  observable::Observable,
  observer::FnObserver,
  subject::Subject,
  subscriber::Subscriber,
  subscription::{LocalSubscription, Subscription},
};

/// Controls when a shared observable drops its internal subject so that the
/// next subscriber starts a fresh execution of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareConfig {
  /// Resubscribe to the source after it errored instead of replaying the
  /// error.
  pub reset_on_error: bool,
  /// Resubscribe to the source after it completed instead of replaying the
  /// completion.
  pub reset_on_complete: bool,
  /// Disconnect from the source when the last subscriber leaves.
  pub reset_on_ref_count_zero: bool,
}

impl Default for ShareConfig {
  fn default() -> Self {
    ShareConfig {
      reset_on_error: false,
      reset_on_complete: false,
      reset_on_ref_count_zero: true,
    }
  }
}

struct ShareState<T, E> {
  subject: Option<Subject<T, E>>,
  connection: Option<LocalSubscription>,
  ref_count: usize,
}

type RcState<T, E> = Rc<RefCell<ShareState<T, E>>>;

fn reset<T, E>(state: &RcState<T, E>) {
  let mut state = state.borrow_mut();
  state.subject = None;
  state.connection = None;
}

fn release<T: Clone, E: Clone>(state: &RcState<T, E>, config: ShareConfig) {
  let connection = {
    let mut state = state.borrow_mut();
    state.ref_count -= 1;
    let live = state.subject.as_ref().is_some_and(|s| !s.is_closed());
    if state.ref_count > 0 || !live || !config.reset_on_ref_count_zero {
      return;
    }
    state.subject = None;
    state.connection.take()
  };
  if let Some(connection) = connection {
    tracing::debug!("share disconnected");
    connection.unsubscribe();
  }
}

fn connect<T, E>(
  source: &Observable<T, E>,
  state: &RcState<T, E>,
  subject: Subject<T, E>,
  config: ShareConfig,
)
where
  T: Clone + 'static,
  E: Clone + 'static,
{
  let connection = LocalSubscription::default();
  state.borrow_mut().connection = Some(connection.clone());
  tracing::debug!("share connected");

  let (n_subject, e_subject, c_subject) =
    (subject.clone(), subject.clone(), subject);
  let (e_state, c_state) = (state.clone(), state.clone());
  source.subscribe_with(Subscriber::new(
    FnObserver::new(
      move |v| n_subject.next(v),
      move |e| {
        if config.reset_on_error {
          reset(&e_state);
        }
        e_subject.error(e);
      },
      move || {
        if config.reset_on_complete {
          reset(&c_state);
        }
        c_subject.complete();
      },
    ),
    connection,
  ));
}

impl<T: Clone + 'static, E: Clone + 'static> Observable<T, E> {
  /// Multicasts the source to every concurrent subscriber.
  ///
  /// The first subscriber connects to the source; later subscribers join the
  /// running execution. When the last subscriber leaves, the source is
  /// unsubscribed. Once the source has terminated, new subscribers receive
  /// the recorded terminal notification without resubscribing.
  pub fn share(self) -> Observable<T, E> {
    self.share_with(ShareConfig::default())
  }

  pub fn share_with(self, config: ShareConfig) -> Observable<T, E> {
    let state: RcState<T, E> = Rc::new(RefCell::new(ShareState {
      subject: None,
      connection: None,
      ref_count: 0,
    }));
    Observable::new(move |subscriber| {
      let subject = {
        let mut state = state.borrow_mut();
        state.ref_count += 1;
        state.subject.get_or_insert_with(Subject::new).clone()
      };
      subject.add_subscriber(subscriber.clone());
      let c_state = state.clone();
      subscriber.signal().add_teardown(move || release(&c_state, config));

      let connected = state.borrow().connection.is_some();
      if !connected && !subject.is_closed() {
        connect(&self, &state, subject, config);
      }
    })
  }
}

pub fn share<T, E>() -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: Clone + 'static,
  E: Clone + 'static,
{
  |source| source.share()
}

pub fn share_with<T, E>(
  config: ShareConfig,
) -> impl FnOnce(Observable<T, E>) -> Observable<T, E>
where
  T: Clone + 'static,
  E: Clone + 'static,
{
  move |source| source.share_with(config)
}
