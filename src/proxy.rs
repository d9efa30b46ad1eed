//! Interception facade: a proxy routing calls through a pipeline
//!
//! [`InterceptProxy`] is the explicit stand-in for runtime proxy
//! synthesis: instead of generating a wrapper type per interface, the
//! target capability is the single [`Target`] trait and operations are
//! tagged by [`CallContext::operation`], so one adapter type covers any
//! operation set. Wrapping a real implementation gives the static-proxy
//! shape; [`InterceptProxy::synthetic`] gives the dynamic-proxy shape,
//! where nothing but the pipeline and a default result exist behind the
//! facade.

use std::marker::PhantomData;

use crate::{
  error::{BoxError, InterceptError},
  interceptor::{CallContext, InterceptorHandle},
  pipeline::Pipeline,
};

/// The capability a proxied business object exposes: one entry point,
/// dispatching on the operation tag in the context.
pub trait Target {
  type Out;

  fn call(&self, ctx: &CallContext) -> Result<Self::Out, BoxError>;
}

/// Proxy facade owning one interception pipeline around one target.
///
/// Implements [`Target`] itself, so proxies layer like hand-written
/// wrappers do.
pub struct InterceptProxy<T: Target> {
  target: T,
  pipeline: Pipeline<CallContext, T::Out>,
}

impl<T: Target> InterceptProxy<T> {
  /// Wraps `target` with an empty pipeline: until interceptors are
  /// registered, calls pass straight through.
  pub fn new(target: T) -> Self {
    Self { target, pipeline: Pipeline::new() }
  }

  pub fn add_interceptor(&self, handle: InterceptorHandle<CallContext, T::Out>) {
    self.pipeline.add_interceptor(handle);
  }

  pub fn remove_interceptor(&self, handle: &InterceptorHandle<CallContext, T::Out>) {
    self.pipeline.remove_interceptor(handle);
  }

  #[inline]
  pub fn pipeline(&self) -> &Pipeline<CallContext, T::Out> { &self.pipeline }

  /// Routes one call through the pipeline to the wrapped target and
  /// returns the outermost stage's result.
  pub fn invoke(&self, ctx: &CallContext) -> Result<T::Out, InterceptError> {
    self.pipeline.invoke(ctx, |c| self.target.call(c))
  }
}

impl<T: Target> Target for InterceptProxy<T> {
  type Out = T::Out;

  fn call(&self, ctx: &CallContext) -> Result<Self::Out, BoxError> {
    self.invoke(ctx).map_err(|err| Box::new(err) as BoxError)
  }
}

/// Terminal with no behavior of its own: every operation yields
/// `Out::default()`. The synthesized-proxy analogue of an interface
/// with only default method bodies.
pub struct DefaultTarget<Out> {
  _out: PhantomData<fn() -> Out>,
}

impl<Out> Default for DefaultTarget<Out> {
  fn default() -> Self { Self { _out: PhantomData } }
}

impl<Out> DefaultTarget<Out> {
  pub fn new() -> Self { Self::default() }
}

impl<Out: Default> Target for DefaultTarget<Out> {
  type Out = Out;

  #[inline]
  fn call(&self, _ctx: &CallContext) -> Result<Out, BoxError> { Ok(Out::default()) }
}

impl<Out: Default> InterceptProxy<DefaultTarget<Out>> {
  /// Synthesizes a proxy with no real implementation behind it; the
  /// registered interceptors carry all the behavior.
  pub fn synthetic() -> Self { Self::new(DefaultTarget::new()) }
}
