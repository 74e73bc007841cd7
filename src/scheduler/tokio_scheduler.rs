use std::time::Duration;

use super::{Scheduler, TaskHandle};
use crate::subscription::Subscription;

/// Schedules tasks on the current tokio `LocalSet`.
///
/// Each task is a `spawn_local`ed sleep; cancelling the handle aborts it.
/// Must be used from within `LocalSet::run_until` (or a `LocalSet` being
/// driven), since tasks are `!Send`.
#[derive(Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
    let handle = TaskHandle::default();
    let c_handle = handle.clone();
    let join = tokio::task::spawn_local(async move {
      tokio::time::sleep(delay).await;
      if !c_handle.is_closed() {
        c_handle.unsubscribe();
        task();
      }
    });
    handle.add_teardown(move || {
      tracing::trace!("tokio scheduler task cancelled");
      join.abort();
    });
    handle
  }
}
