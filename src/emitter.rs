//! Notification facades: fan-out to independent subscribers
//!
//! An emitter owns exactly one subscriber registry and exposes the
//! capability surface `{add_handler, remove_handler, fire}` through the
//! [`Emit`] trait. `fire` captures a snapshot of the registry, then
//! dispatches to it without holding any lock, so handlers may register
//! or deregister — from another thread on [`SharedEmitter`], or
//! reentrantly from inside a subscriber on either variant — while a
//! pass is in flight. A handler added mid-pass is first notified by the
//! next pass.
//!
//! Emitters fan out, they do not wrap: no subscriber sees another's
//! result, and a failing subscriber is isolated (see
//! [`crate::dispatcher`]). A facade that needs call wrapping instead
//! uses [`crate::proxy::InterceptProxy`].

use std::{rc::Rc, sync::Arc};

use crate::{
  dispatcher::dispatch,
  error::DispatchError,
  rc::{MutArc, MutRc, RcDeref, RcDerefMut},
  registry::Registry,
  subscriber::Subscribe,
};

/// Subscriber handle registered with a [`LocalEmitter`].
pub type LocalSubscriber<E> = Rc<dyn Subscribe<E>>;
/// Subscriber handle registered with a [`SharedEmitter`].
pub type SharedSubscriber<E> = Arc<dyn Subscribe<E> + Send + Sync>;

/// Capability surface of a notification facade.
///
/// Registration calls return nothing and never fail: duplicate adds and
/// absent removes are no-ops by contract.
pub trait Emit<E> {
  type Handle;

  fn add_handler(&self, handle: Self::Handle);

  fn remove_handler(&self, handle: &Self::Handle);

  /// Runs one notification pass over the subscribers registered at the
  /// moment of the call. `Err` carries the aggregate failure report;
  /// the pass still reached every subscriber in the snapshot.
  fn fire(&self, event: &E) -> Result<(), DispatchError>;
}

/// Single-thread emitter over `Rc<RefCell>` storage.
pub struct LocalEmitter<E> {
  subscribers: MutRc<Registry<LocalSubscriber<E>>>,
}

/// Thread-safe emitter over `Arc<Mutex>` storage.
///
/// `add_handler`/`remove_handler` may race with an in-flight `fire`
/// from another thread; the mutex covers only registry mutation and the
/// snapshot copy, never subscriber execution.
pub struct SharedEmitter<E> {
  subscribers: MutArc<Registry<SharedSubscriber<E>>>,
}

macro_rules! emitter_common_impl {
  ($emitter: ident, $cell: ident) => {
    impl<E> Default for $emitter<E> {
      fn default() -> Self { Self { subscribers: $cell::own(Registry::new()) } }
    }

    impl<E> Clone for $emitter<E> {
      #[inline]
      fn clone(&self) -> Self { Self { subscribers: self.subscribers.clone() } }
    }

    impl<E> $emitter<E> {
      pub fn new() -> Self { Self::default() }

      #[inline]
      pub fn len(&self) -> usize { self.subscribers.rc_deref().len() }

      #[inline]
      pub fn is_empty(&self) -> bool { self.subscribers.rc_deref().is_empty() }
    }
  };
}

emitter_common_impl!(LocalEmitter, MutRc);
emitter_common_impl!(SharedEmitter, MutArc);

impl<E> Emit<E> for LocalEmitter<E> {
  type Handle = LocalSubscriber<E>;

  fn add_handler(&self, handle: Self::Handle) {
    self.subscribers.rc_deref_mut().add(handle);
  }

  fn remove_handler(&self, handle: &Self::Handle) {
    self.subscribers.rc_deref_mut().remove(handle);
  }

  fn fire(&self, event: &E) -> Result<(), DispatchError> {
    // Borrow ends with the statement; dispatch runs borrow-free so a
    // subscriber may reenter add_handler/remove_handler.
    let snapshot = self.subscribers.rc_deref().snapshot();
    dispatch(&snapshot, event)
  }
}

impl<E> Emit<E> for SharedEmitter<E> {
  type Handle = SharedSubscriber<E>;

  fn add_handler(&self, handle: Self::Handle) {
    self.subscribers.rc_deref_mut().add(handle);
  }

  fn remove_handler(&self, handle: &Self::Handle) {
    self.subscribers.rc_deref_mut().remove(handle);
  }

  fn fire(&self, event: &E) -> Result<(), DispatchError> {
    // Lock ends with the statement; dispatch runs lock-free.
    let snapshot = self.subscribers.rc_deref().snapshot();
    dispatch(&snapshot, event)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{error::BoxError, subscriber::SubscribeFn};
  use std::{
    cell::RefCell,
    sync::{Arc, Mutex},
  };

  #[test]
  fn fire_notifies_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let emitter = LocalEmitter::new();
    for label in ["s1", "s2", "s3"] {
      let log = log.clone();
      emitter.add_handler(Rc::new(SubscribeFn::new(label, move |_: &()| {
        log.borrow_mut().push(label);
        Ok(())
      })));
    }
    emitter.fire(&()).unwrap();
    assert_eq!(*log.borrow(), vec!["s1", "s2", "s3"]);
  }

  #[test]
  fn deregistered_subscriber_is_not_notified() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let emitter = LocalEmitter::new();
    let make = |label: &'static str| -> LocalSubscriber<()> {
      let log = log.clone();
      Rc::new(SubscribeFn::new(label, move |_: &()| {
        log.borrow_mut().push(label);
        Ok(())
      }))
    };
    let s1 = make("s1");
    emitter.add_handler(s1.clone());
    emitter.add_handler(make("s2"));

    emitter.fire(&()).unwrap();
    emitter.remove_handler(&s1);
    emitter.fire(&()).unwrap();
    assert_eq!(*log.borrow(), vec!["s1", "s2", "s2"]);
  }

  #[test]
  fn duplicate_registration_notifies_once() {
    let count = Rc::new(RefCell::new(0));
    let emitter = LocalEmitter::new();
    let sub: LocalSubscriber<()> = {
      let count = count.clone();
      Rc::new(SubscribeFn::new("dup", move |_: &()| {
        *count.borrow_mut() += 1;
        Ok(())
      }))
    };
    emitter.add_handler(sub.clone());
    emitter.add_handler(sub);
    assert_eq!(emitter.len(), 1);
    emitter.fire(&()).unwrap();
    assert_eq!(*count.borrow(), 1);
  }

  #[test]
  fn failing_subscriber_is_isolated_from_the_rest() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let emitter = SharedEmitter::new();
    emitter.add_handler(Arc::new(SubscribeFn::new("flaky", |_: &u8| {
      Err::<(), BoxError>("export failed".into())
    })));
    {
      let log = log.clone();
      emitter.add_handler(Arc::new(SubscribeFn::new("steady", move |_: &u8| {
        log.lock().unwrap().push("steady");
        Ok(())
      })));
    }

    let err = emitter.fire(&0).unwrap_err();
    assert_eq!(*log.lock().unwrap(), vec!["steady"]);
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].handler(), "flaky");
  }

  #[test]
  fn subscriber_added_during_fire_misses_that_pass() {
    let count = Rc::new(RefCell::new(0));
    let emitter = LocalEmitter::new();
    let late: LocalSubscriber<()> = {
      let count = count.clone();
      Rc::new(SubscribeFn::new("late", move |_: &()| {
        *count.borrow_mut() += 1;
        Ok(())
      }))
    };
    {
      let emitter = emitter.clone();
      let late = late.clone();
      emitter.clone().add_handler(Rc::new(SubscribeFn::new("reentrant", move |_: &()| {
        emitter.add_handler(late.clone());
        Ok(())
      })));
    }

    emitter.fire(&()).unwrap();
    assert_eq!(*count.borrow(), 0, "late subscriber must miss the in-flight pass");
    assert_eq!(emitter.len(), 2);

    emitter.fire(&()).unwrap();
    assert_eq!(*count.borrow(), 1);
  }

  #[test]
  fn subscriber_may_deregister_itself_mid_pass() {
    let count = Rc::new(RefCell::new(0));
    let emitter = LocalEmitter::new();
    let cell: Rc<RefCell<Option<LocalSubscriber<()>>>> = Rc::new(RefCell::new(None));
    let once: LocalSubscriber<()> = {
      let count = count.clone();
      let emitter = emitter.clone();
      let cell = cell.clone();
      Rc::new(SubscribeFn::new("once", move |_: &()| {
        *count.borrow_mut() += 1;
        if let Some(me) = cell.borrow().as_ref() {
          emitter.remove_handler(me);
        }
        Ok(())
      }))
    };
    *cell.borrow_mut() = Some(once.clone());
    emitter.add_handler(once);

    emitter.fire(&()).unwrap();
    emitter.fire(&()).unwrap();
    assert_eq!(*count.borrow(), 1);
    assert!(emitter.is_empty());
  }

  #[test]
  fn clones_share_one_registry() {
    let emitter: SharedEmitter<()> = SharedEmitter::new();
    let clone = emitter.clone();
    clone.add_handler(Arc::new(SubscribeFn::new("s", |_: &()| Ok(()))));
    assert_eq!(emitter.len(), 1);
  }
}
