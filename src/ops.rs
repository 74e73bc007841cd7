//! Operators.
//!
//! Every operator is an inherent method on [`Observable`] and also a free
//! function returning a closure for [`Observable::pipe`] and the `pipe!`
//! macro:
//!
//! ```
//! use pushrx::{observable, ops, pipe};
//!
//! let a = observable::from_iter([1, 2, 3]).map(|v| v + 1).take(2);
//! let b = observable::from_iter([1, 2, 3])
//!   .pipe(pipe!(ops::map(|v: i32| v + 1), ops::take(2)));
//! ```
//!
//! Single-source operators share their subscriber's signal with the upstream
//! subscription, so closing downstream closes upstream. Operators that manage
//! several subscriptions (merge, concat, the `*_map` family, ...) give each
//! one a child signal instead, so an inner source can finish on its own.

use crate::{
  observable::Observable, observer::FnObserver, subscriber::Subscriber,
};

mod catch_error;
mod combine_latest;
mod concat;
mod debounce;
mod distinct_until_changed;
mod exhaust_map;
mod filter;
mod finalize;
mod first;
mod ignore_elements;
mod map;
mod map_err;
mod merge;
mod merge_map;
mod publish_last;
mod raf;
mod reduce;
mod scan;
mod share;
mod switch_map;
mod take;
mod take_while;
mod tap;
mod throttle_time;
mod zip;

pub use catch_error::*;
pub use combine_latest::*;
pub use concat::*;
pub use debounce::*;
pub use distinct_until_changed::*;
pub use exhaust_map::*;
pub use filter::*;
pub use finalize::*;
pub use first::*;
pub use ignore_elements::*;
pub use map::*;
pub use map_err::*;
pub use merge::*;
pub use merge_map::*;
pub use publish_last::*;
pub use raf::*;
pub use reduce::*;
pub use scan::*;
pub use share::*;
pub use switch_map::*;
pub use take::*;
pub use take_while::*;
pub use tap::*;
pub use throttle_time::*;
pub use zip::*;

/// Subscribes `source` on `downstream`'s signal, handing every value to
/// `next` and forwarding error and completion unchanged.
pub(crate) fn lift<T, U, E>(
  source: &Observable<T, E>,
  downstream: Subscriber<U, E>,
  next: impl Fn(&Subscriber<U, E>, T) + 'static,
) where
  T: 'static,
  U: 'static,
  E: 'static,
{
  lift_with(source, downstream, next, |d| d.complete())
}

/// Like [`lift`], with a custom completion handler.
pub(crate) fn lift_with<T, U, E>(
  source: &Observable<T, E>,
  downstream: Subscriber<U, E>,
  next: impl Fn(&Subscriber<U, E>, T) + 'static,
  complete: impl Fn(&Subscriber<U, E>) + 'static,
) where
  T: 'static,
  U: 'static,
  E: 'static,
{
  let signal = downstream.signal().clone();
  let (d_next, d_error) = (downstream.clone(), downstream.clone());
  source.subscribe_with(Subscriber::new(
    FnObserver::new(
      move |v| next(&d_next, v),
      move |e| d_error.error(e),
      move || complete(&downstream),
    ),
    signal,
  ))
}
