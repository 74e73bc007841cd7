use smallvec::SmallVec;
use std::{
  any::Any,
  cell::RefCell,
  fmt::{Debug, Formatter},
  rc::Rc,
};

mod dynamic;
pub use dynamic::DynamicSubscriptions;

/// Subscription returns from `Observable::subscribe` to allow unsubscribing.
pub trait Subscription {
  /// This allows deregistering a stream before it has finished receiving all
  /// events (i.e. before complete is called). Calling it more than once is a
  /// no-op.
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

/// A cancellable bag of teardown logic.
///
/// Every subscriber carries one as its `signal`: resources acquired while
/// producing values register here and are released exactly once, when the
/// subscriber terminates or is unsubscribed. Adding to a closed subscription
/// releases the added teardown immediately.
#[derive(Clone, Default)]
pub struct LocalSubscription(Rc<RefCell<Inner>>);

struct Inner {
  closed: bool,
  teardown: SmallVec<[Box<dyn Subscription>; 1]>,
}

impl Default for Inner {
  fn default() -> Self { Inner { closed: false, teardown: SmallVec::new() } }
}

impl LocalSubscription {
  pub fn new() -> Self { Self::default() }

  pub fn add<S: Subscription + 'static>(&self, subscription: S) {
    if self.is_same(&subscription) {
      return;
    }
    let mut inner = self.0.borrow_mut();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
    } else {
      inner.teardown.retain(|v| !v.is_closed());
      inner.teardown.push(Box::new(subscription));
    }
  }

  /// Registers a closure to run once when this subscription closes.
  pub fn add_teardown(&self, f: impl FnOnce() + 'static) {
    self.add(Teardown::new(f))
  }

  /// Creates a subscription that closes together with `self` but can also be
  /// closed on its own without affecting `self`.
  pub fn child(&self) -> LocalSubscription {
    let child = LocalSubscription::default();
    self.add(child.clone());
    child
  }

  pub fn teardown_size(&self) -> usize { self.0.borrow().teardown.len() }

  fn is_same(&self, other: &dyn Any) -> bool {
    if let Some(other) = other.downcast_ref::<Self>() {
      Rc::ptr_eq(&self.0, &other.0)
    } else {
      false
    }
  }
}

impl Subscription for LocalSubscription {
  fn unsubscribe(&self) {
    let teardown = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for v in teardown {
      v.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.borrow().closed }
}

impl Debug for LocalSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.borrow();
    f.debug_struct("LocalSubscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// A one-shot closure run on unsubscribe.
pub struct Teardown(RefCell<Option<Box<dyn FnOnce()>>>);

impl Teardown {
  pub fn new(f: impl FnOnce() + 'static) -> Self {
    Teardown(RefCell::new(Some(Box::new(f))))
  }
}

impl Subscription for Teardown {
  fn unsubscribe(&self) {
    let f = self.0.borrow_mut().take();
    if let Some(f) = f {
      f();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.borrow().is_none() }
}

impl<T: Subscription + ?Sized> Subscription for Box<T> {
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

impl<T: Subscription + ?Sized> Subscription for Rc<T> {
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// Wrapper around a subscription which provides the
/// `unsubscribe_when_dropped()` method.
#[derive(Debug, Clone)]
pub struct SubscriptionWrapper<T: Subscription>(pub(crate) T);

impl<T: Subscription> SubscriptionWrapper<T> {
  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<T> {
    SubscriptionGuard::new(self.0)
  }
}

impl<T: Subscription> Subscription for SubscriptionWrapper<T> {
  #[inline]
  fn unsubscribe(&self) { self.0.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(pub(crate) T);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> {
    SubscriptionGuard(subscription)
  }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
