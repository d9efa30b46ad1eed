//! Re-exports the crate's public surface in one `use`.

pub use crate::{
  dispatcher::dispatch,
  emitter::{Emit, LocalEmitter, LocalSubscriber, SharedEmitter, SharedSubscriber},
  error::{BoxError, DispatchError, FailureKind, HandlerFailure, InterceptError, TERMINAL_STAGE},
  interceptor::{CallContext, Intercept, InterceptFn, InterceptorHandle, Next},
  pipeline::Pipeline,
  proxy::{DefaultTarget, InterceptProxy, Target},
  rc::{MutArc, MutRc, RcDeref, RcDerefMut},
  registry::{HandleIdentity, Registry, Snapshot},
  subscriber::{Subscribe, SubscribeFn},
};
