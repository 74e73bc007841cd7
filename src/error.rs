use futures::task::SpawnError;
use thiserror::Error;

/// The default error type carried by observables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RxError {
  /// The source completed without emitting the value an operator required.
  #[error("sequence contains no elements")]
  Empty,
  /// A `Reference` was read before it received a value.
  #[error("reference has no value")]
  NoValue,
  #[error("{0}")]
  Message(String),
}

/// Raised by `first()` and by awaiting an observable that completes without
/// emitting.
///
/// Operators that can raise it require `E: From<EmptyError>`, so custom error
/// types opt in with a single `From` impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("sequence contains no elements")]
pub struct EmptyError;

impl From<EmptyError> for RxError {
  fn from(_: EmptyError) -> Self { RxError::Empty }
}

/// A future that could not be spawned by `observable::from_async`.
impl From<SpawnError> for RxError {
  fn from(err: SpawnError) -> Self { RxError::Message(err.to_string()) }
}

impl From<String> for RxError {
  fn from(msg: String) -> Self { RxError::Message(msg) }
}

impl From<&str> for RxError {
  fn from(msg: &str) -> Self { RxError::Message(msg.to_owned()) }
}
