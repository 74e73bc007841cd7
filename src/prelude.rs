//! Prelude module for convenient imports

pub use crate::{
  error::{EmptyError, RxError},
  observable::{self, Observable, ObservableFuture},
  observer::{FnObserver, Observer},
  ops::{self, ShareConfig},
  pipe,
  scheduler::{
    debounce_function, Debounced, Scheduler, TaskHandle, TestScheduler,
  },
  subject::{BehaviorSubject, OrderedSubject, Reference, ReplaySubject, Subject},
  subscriber::Subscriber,
  subscription::{
    LocalSubscription, Subscription, SubscriptionGuard, SubscriptionWrapper,
  },
};
#[cfg(feature = "local-scheduler")]
pub use crate::scheduler::LocalScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
