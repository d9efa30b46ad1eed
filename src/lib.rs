//! # evoke: event fan-out and call interception
//!
//! Synchronous, in-process primitives for decoupling a producer of an
//! action from a pluggable set of consumers, in two disciplines:
//!
//! - **Notification**: an emitter fans one event out to independent
//!   subscribers, in registration order, isolating each subscriber's
//!   failures from the rest of the pass.
//! - **Interception**: a pipeline folds ordered interceptors around a
//!   terminal operation, each stage free to run logic before, after, or
//!   instead of the rest of the chain.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use evoke::prelude::*;
//!
//! // Notification: fan-out to independent subscribers.
//! let emitter = SharedEmitter::new();
//! emitter.add_handler(Arc::new(SubscribeFn::new("audit", |price: &u64| {
//!   println!("price changed to {price}");
//!   Ok(())
//! })));
//! emitter.fire(&42).unwrap();
//!
//! // Interception: wrap a call, outer-to-inner in registration order.
//! let pipeline: Pipeline<u32, u32> = Pipeline::new();
//! pipeline.add_interceptor(Arc::new(InterceptFn::new(
//!   "double",
//!   |ctx: &u32, next: Next<'_, u32, u32>| next.run(ctx).map(|v| v * 2),
//! )));
//! assert_eq!(pipeline.invoke(&20, |v| Ok(v + 1)).unwrap(), 42);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`LocalEmitter`] / [`SharedEmitter`] | Notification facades (single-thread vs thread-safe) |
//! | [`Subscribe`] | Reacts to an event, independent of other subscribers |
//! | [`Intercept`] / [`Next`] | Wraps a call, ordered within the chain |
//! | [`Pipeline`] | The composed interception chain |
//! | [`InterceptProxy`] / [`Target`] | Proxy facade routing tagged operations through a pipeline |
//!
//! A facade runs one discipline: an emitter never wraps, a proxy never
//! fans out. A system needing both composes one of each.
//!
//! [`LocalEmitter`]: emitter::LocalEmitter
//! [`SharedEmitter`]: emitter::SharedEmitter
//! [`Subscribe`]: subscriber::Subscribe
//! [`Intercept`]: interceptor::Intercept
//! [`Next`]: interceptor::Next
//! [`Pipeline`]: pipeline::Pipeline
//! [`InterceptProxy`]: proxy::InterceptProxy
//! [`Target`]: proxy::Target

pub mod dispatcher;
pub mod emitter;
pub mod error;
pub mod interceptor;
pub mod pipeline;
pub mod prelude;
pub mod proxy;
pub mod rc;
pub mod registry;
pub mod subscriber;

pub use prelude::*;
