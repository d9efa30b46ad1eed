//! Error types for dispatch and interception
//!
//! The two disciplines fail differently: a notification pass recovers
//! locally and returns one [`DispatchError`] aggregating every
//! [`HandlerFailure`], while an interception pass surfaces the first
//! [`InterceptError`] immediately, unwound through the outer
//! interceptors.

use thiserror::Error;

/// The error type handlers raise from their callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A single subscriber that misbehaved during a notification pass.
#[derive(Debug, Error)]
#[error("handler `{handler}` {kind}")]
pub struct HandlerFailure {
  handler: Box<str>,
  #[source]
  kind: FailureKind,
}

/// How a handler failed: an `Err` return or a contained panic.
#[derive(Debug, Error)]
pub enum FailureKind {
  #[error("raised: {0}")]
  Raised(#[source] BoxError),
  #[error("panicked: {0}")]
  Panicked(Box<str>),
}

impl HandlerFailure {
  pub(crate) fn raised(handler: &str, cause: BoxError) -> Self {
    Self { handler: handler.into(), kind: FailureKind::Raised(cause) }
  }

  pub(crate) fn panicked(handler: &str, message: Box<str>) -> Self {
    Self { handler: handler.into(), kind: FailureKind::Panicked(message) }
  }

  /// Name of the handler that failed, as reported by its `name()`.
  #[inline]
  pub fn handler(&self) -> &str { &self.handler }

  #[inline]
  pub fn kind(&self) -> &FailureKind { &self.kind }

  #[inline]
  pub fn is_panic(&self) -> bool { matches!(self.kind, FailureKind::Panicked(_)) }
}

/// Aggregate failure report of one notification pass.
///
/// Returned only when at least one subscriber failed; the pass itself
/// always ran to completion over the full snapshot (`attempted`
/// subscribers), so a `DispatchError` never implies skipped handlers.
#[derive(Debug, Error)]
#[error("{} of {} handlers failed during dispatch", .failures.len(), .attempted)]
pub struct DispatchError {
  attempted: usize,
  failures: Vec<HandlerFailure>,
}

impl DispatchError {
  pub(crate) fn new(attempted: usize, failures: Vec<HandlerFailure>) -> Self {
    debug_assert!(!failures.is_empty());
    Self { attempted, failures }
  }

  /// How many subscribers the pass invoked (failed or not).
  #[inline]
  pub fn attempted(&self) -> usize { self.attempted }

  /// The individual failures, in notification order.
  #[inline]
  pub fn failures(&self) -> &[HandlerFailure] { &self.failures }

  #[inline]
  pub fn into_failures(self) -> Vec<HandlerFailure> { self.failures }
}

/// A single unwound interception failure.
///
/// Unlike dispatch failures these are never aggregated: the chain is a
/// nested call, so the error from one stage travels back out through
/// every interceptor that already ran and surfaces to the caller.
/// `stage` names the interceptor that raised, or [`TERMINAL_STAGE`] for
/// the terminal operation itself.
#[derive(Debug, Error)]
#[error("interception stage `{stage}` failed")]
pub struct InterceptError {
  stage: Box<str>,
  #[source]
  source: BoxError,
}

/// Stage label carried by failures of the terminal operation.
pub const TERMINAL_STAGE: &str = "terminal";

impl InterceptError {
  /// Wraps an error raised by the named interceptor stage.
  pub fn raised(stage: &str, source: impl Into<BoxError>) -> Self {
    Self { stage: stage.into(), source: source.into() }
  }

  pub(crate) fn terminal(source: BoxError) -> Self {
    Self { stage: TERMINAL_STAGE.into(), source }
  }

  /// Name of the stage that raised.
  #[inline]
  pub fn stage(&self) -> &str { &self.stage }

  /// Whether the terminal operation, not an interceptor, raised.
  #[inline]
  pub fn is_terminal(&self) -> bool { &*self.stage == TERMINAL_STAGE }

  #[inline]
  pub fn into_source(self) -> BoxError { self.source }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn handler_failure_display() {
    let raised = HandlerFailure::raised("audit", "boom".into());
    assert_eq!(raised.to_string(), "handler `audit` raised: boom");
    assert!(!raised.is_panic());

    let panicked = HandlerFailure::panicked("audit", "at the disco".into());
    assert_eq!(panicked.to_string(), "handler `audit` panicked: at the disco");
    assert!(panicked.is_panic());
  }

  #[test]
  fn dispatch_error_display_counts() {
    let err = DispatchError::new(3, vec![HandlerFailure::raised("a", "x".into())]);
    assert_eq!(err.to_string(), "1 of 3 handlers failed during dispatch");
    assert_eq!(err.attempted(), 3);
    assert_eq!(err.failures().len(), 1);
  }

  #[test]
  fn intercept_error_source_chain() {
    use std::error::Error;

    let err = InterceptError::raised("cache", "miss handling failed");
    assert_eq!(err.stage(), "cache");
    assert!(!err.is_terminal());
    assert_eq!(err.source().unwrap().to_string(), "miss handling failed");

    let err = InterceptError::terminal("target gone".into());
    assert!(err.is_terminal());
    assert_eq!(err.into_source().to_string(), "target gone");
  }
}
