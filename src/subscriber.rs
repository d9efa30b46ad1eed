//! Subscriber trait for the notification discipline
//!
//! A [`Subscribe`] implementation reacts to an event independently of
//! every other subscriber: it gets the event by reference, may fail,
//! and its failure never stops the pass for its neighbors (see
//! [`crate::emitter`]).

use std::borrow::Cow;

use crate::error::BoxError;

/// A registered event handler.
///
/// `name` labels the subscriber in failure reports; implementations
/// shipping to production should override the `"anonymous"` default.
pub trait Subscribe<E> {
  /// Reacts to one event. Returning `Err` marks this subscriber as
  /// failed for the pass without affecting the others.
  fn on_event(&self, event: &E) -> Result<(), BoxError>;

  fn name(&self) -> &str { "anonymous" }
}

impl<E, F> Subscribe<E> for F
where
  F: Fn(&E) -> Result<(), BoxError>,
{
  #[inline]
  fn on_event(&self, event: &E) -> Result<(), BoxError> { self(event) }
}

/// Closure subscriber with an explicit name.
pub struct SubscribeFn<F> {
  name: Cow<'static, str>,
  f: F,
}

impl<F> SubscribeFn<F> {
  pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
    Self { name: name.into(), f }
  }
}

impl<E, F> Subscribe<E> for SubscribeFn<F>
where
  F: Fn(&E) -> Result<(), BoxError>,
{
  #[inline]
  fn on_event(&self, event: &E) -> Result<(), BoxError> { (self.f)(event) }

  #[inline]
  fn name(&self) -> &str { &self.name }
}
