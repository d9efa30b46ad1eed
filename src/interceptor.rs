//! Interceptor trait, chain continuation and call context
//!
//! An [`Intercept`] implementation wraps a call rather than reacting to
//! it: it runs before-logic, decides whether to hand control to the
//! rest of the chain through [`Next`], and runs after-logic on the way
//! back out. Skipping `next` short-circuits everything deeper in the
//! chain, including the terminal operation.

use std::{borrow::Cow, sync::Arc};

use smallvec::SmallVec;

use crate::error::{BoxError, InterceptError};

/// Shared handle to a registered interceptor.
pub type InterceptorHandle<Ctx, Out> = Arc<dyn Intercept<Ctx, Out> + Send + Sync>;

/// A registered call wrapper.
///
/// Interceptors are ordered and dependent on their neighbors: the value
/// they return is what the previous (outer) stage sees, and an `Err`
/// from deeper in the chain comes back through `next.run`, giving every
/// stage that already ran its before-logic a chance to react before
/// propagating.
pub trait Intercept<Ctx, Out> {
  fn around(&self, ctx: &Ctx, next: Next<'_, Ctx, Out>) -> Result<Out, InterceptError>;

  /// Label used as the failing stage name in [`InterceptError`].
  fn name(&self) -> &str { "anonymous" }
}

/// The remainder of an interception chain.
///
/// Consuming `run` at most once is the whole protocol: calling it hands
/// control to the next stage (or the terminal operation once the chain
/// is exhausted); dropping it without calling short-circuits.
pub struct Next<'a, Ctx, Out> {
  pub(crate) chain: &'a [InterceptorHandle<Ctx, Out>],
  pub(crate) terminal: &'a dyn Fn(&Ctx) -> Result<Out, BoxError>,
}

impl<Ctx, Out> Next<'_, Ctx, Out> {
  /// Runs the rest of the chain against `ctx`.
  pub fn run(self, ctx: &Ctx) -> Result<Out, InterceptError> {
    match self.chain.split_first() {
      Some((head, rest)) => {
        head.around(ctx, Next { chain: rest, terminal: self.terminal })
      }
      None => (self.terminal)(ctx).map_err(InterceptError::terminal),
    }
  }

  /// How many interceptor stages remain before the terminal operation.
  #[inline]
  pub fn remaining(&self) -> usize { self.chain.len() }
}

/// Closure interceptor with an explicit name.
pub struct InterceptFn<F> {
  name: Cow<'static, str>,
  f: F,
}

impl<F> InterceptFn<F> {
  pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
    Self { name: name.into(), f }
  }
}

impl<Ctx, Out, F> Intercept<Ctx, Out> for InterceptFn<F>
where
  F: for<'a> Fn(&Ctx, Next<'a, Ctx, Out>) -> Result<Out, InterceptError>,
{
  #[inline]
  fn around(&self, ctx: &Ctx, next: Next<'_, Ctx, Out>) -> Result<Out, InterceptError> {
    (self.f)(ctx, next)
  }

  #[inline]
  fn name(&self) -> &str { &self.name }
}

/// Immutable description of an attempted operation.
///
/// The pipeline itself is generic over its context type; `CallContext`
/// is the ready-made context the proxy facade routes, carrying the
/// operation name (the tag interceptors and targets dispatch on) and
/// its rendered arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
  operation: Cow<'static, str>,
  arguments: SmallVec<[Cow<'static, str>; 2]>,
}

impl CallContext {
  pub fn new(operation: impl Into<Cow<'static, str>>) -> Self {
    Self { operation: operation.into(), arguments: SmallVec::new() }
  }

  /// Appends one argument, builder style.
  #[must_use]
  pub fn arg(mut self, argument: impl Into<Cow<'static, str>>) -> Self {
    self.arguments.push(argument.into());
    self
  }

  #[inline]
  pub fn operation(&self) -> &str { &self.operation }

  #[inline]
  pub fn arguments(&self) -> impl Iterator<Item = &str> {
    self.arguments.iter().map(|a| a.as_ref())
  }
}
