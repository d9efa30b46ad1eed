//! Interception pipeline: an outer-to-inner fold of interceptors
//!
//! Registration order is wrapping order: the first-registered
//! interceptor is the outermost stage, so its before-logic runs first
//! and its after-logic runs last, mirroring nested `try/finally`.
//! Every invocation folds the registered chain around the terminal
//! operation passed to [`Pipeline::invoke`]; invocations are stateless
//! and share nothing but the immutable chain snapshot they start from.

use tracing::debug;

use crate::{
  error::{BoxError, InterceptError},
  interceptor::{InterceptorHandle, Next},
  rc::{MutArc, RcDeref, RcDerefMut},
  registry::Registry,
};

/// Shared, ordered interceptor chain around a terminal operation.
///
/// Clones share one chain, so any clone may register or deregister
/// stages while another is mid-invocation; the running invocation keeps
/// folding the snapshot it started from.
pub struct Pipeline<Ctx, Out> {
  chain: MutArc<Registry<InterceptorHandle<Ctx, Out>>>,
}

impl<Ctx, Out> Default for Pipeline<Ctx, Out> {
  fn default() -> Self { Self { chain: MutArc::own(Registry::new()) } }
}

impl<Ctx, Out> Clone for Pipeline<Ctx, Out> {
  #[inline]
  fn clone(&self) -> Self { Self { chain: self.chain.clone() } }
}

impl<Ctx, Out> Pipeline<Ctx, Out> {
  pub fn new() -> Self { Self::default() }

  /// Registers `handle` as the new innermost stage. Re-registering a
  /// handle already in the chain is a no-op.
  pub fn add_interceptor(&self, handle: InterceptorHandle<Ctx, Out>) {
    self.chain.rc_deref_mut().add(handle);
  }

  /// Deregisters `handle`; absent handles are ignored.
  pub fn remove_interceptor(&self, handle: &InterceptorHandle<Ctx, Out>) {
    self.chain.rc_deref_mut().remove(handle);
  }

  #[inline]
  pub fn len(&self) -> usize { self.chain.rc_deref().len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.chain.rc_deref().is_empty() }

  /// Folds the registered chain around `terminal` and runs it against
  /// `ctx`, returning the outermost stage's result.
  ///
  /// Errors are not aggregated: the first failing stage unwinds back
  /// through the stages that already called `next`, each free to react,
  /// and surfaces here as a single [`InterceptError`].
  pub fn invoke<F>(&self, ctx: &Ctx, terminal: F) -> Result<Out, InterceptError>
  where
    F: Fn(&Ctx) -> Result<Out, BoxError>,
  {
    let chain = self.chain.rc_deref().snapshot();
    let result = Next { chain: &chain, terminal: &terminal }.run(ctx);
    if let Err(err) = &result {
      debug!(stage = err.stage(), "interception pass failed");
    }
    result
  }
}
