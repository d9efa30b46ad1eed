//! Snapshot walk with per-subscriber failure isolation
//!
//! One notification pass iterates an owned snapshot in registration
//! order and invokes every subscriber exactly once, synchronously. A
//! subscriber that returns `Err` or panics is recorded and the pass
//! keeps going; the collected failures come back as one
//! [`DispatchError`] after the full pass. Nothing is retried, reordered
//! or skipped.

use std::{
  any::Any,
  ops::Deref,
  panic::{catch_unwind, AssertUnwindSafe},
};

use tracing::debug;

use crate::{
  error::{DispatchError, HandlerFailure},
  subscriber::Subscribe,
};

/// Runs one pass over `snapshot`, delivering `event` to every handle.
///
/// The emitters call this with the snapshot they captured under their
/// registry cell; custom facades may do the same with any ordered
/// handle sequence.
pub fn dispatch<E, S, H>(snapshot: &[H], event: &E) -> Result<(), DispatchError>
where
  S: Subscribe<E> + ?Sized,
  H: Deref<Target = S>,
{
  let mut failures = Vec::new();
  for sub in snapshot {
    match catch_unwind(AssertUnwindSafe(|| sub.on_event(event))) {
      Ok(Ok(())) => {}
      Ok(Err(cause)) => {
        debug!(handler = sub.name(), %cause, "subscriber raised during dispatch");
        failures.push(HandlerFailure::raised(sub.name(), cause));
      }
      Err(payload) => {
        let message = panic_message(payload);
        debug!(handler = sub.name(), %message, "subscriber panicked during dispatch");
        failures.push(HandlerFailure::panicked(sub.name(), message));
      }
    }
  }
  if failures.is_empty() {
    Ok(())
  } else {
    Err(DispatchError::new(snapshot.len(), failures))
  }
}

fn panic_message(payload: Box<dyn Any + Send>) -> Box<str> {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).into()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str().into()
  } else {
    "opaque panic payload".into()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{error::BoxError, subscriber::SubscribeFn};
  use std::sync::{Arc, Mutex};

  type Sub = Arc<dyn Subscribe<u32> + Send + Sync>;

  fn recording(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Sub {
    let log = log.clone();
    Arc::new(SubscribeFn::new(name, move |_: &u32| {
      log.lock().unwrap().push(name);
      Ok(())
    }))
  }

  #[test]
  fn every_subscriber_runs_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let snapshot: Vec<Sub> = vec![
      recording("first", &log),
      recording("second", &log),
      recording("third", &log),
    ];
    dispatch(&snapshot, &1).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
  }

  #[test]
  fn failure_does_not_stop_the_pass() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let failing: Sub = Arc::new(SubscribeFn::new("flaky", |_: &u32| {
      Err::<(), BoxError>("connection reset".into())
    }));
    let snapshot: Vec<Sub> = vec![failing, recording("steady", &log)];

    let err = dispatch(&snapshot, &1).unwrap_err();
    assert_eq!(*log.lock().unwrap(), vec!["steady"]);
    assert_eq!(err.attempted(), 2);
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].handler(), "flaky");
  }

  #[test]
  fn panicking_subscriber_is_contained_and_reported() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let panicking: Sub =
      Arc::new(SubscribeFn::new("wild", |_: &u32| -> Result<(), BoxError> {
        panic!("subscriber bug")
      }));
    let snapshot: Vec<Sub> = vec![panicking, recording("steady", &log)];

    let err = dispatch(&snapshot, &1).unwrap_err();
    assert_eq!(*log.lock().unwrap(), vec!["steady"]);
    assert_eq!(err.failures().len(), 1);
    assert!(err.failures()[0].is_panic());
    assert_eq!(err.failures()[0].handler(), "wild");
  }

  #[test]
  fn failures_are_reported_in_notification_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let fail = |name: &'static str| -> Sub {
      Arc::new(SubscribeFn::new(name, move |_: &u32| {
        Err::<(), BoxError>(name.into())
      }))
    };
    let snapshot: Vec<Sub> = vec![fail("a"), recording("ok", &log), fail("b")];

    let err = dispatch(&snapshot, &1).unwrap_err();
    let names: Vec<_> = err.failures().iter().map(|f| f.handler().to_owned()).collect();
    assert_eq!(names, vec!["a", "b"]);
  }

  #[test]
  fn empty_snapshot_is_ok() {
    let snapshot: Vec<Sub> = Vec::new();
    assert!(dispatch(&snapshot, &1).is_ok());
  }

  #[test]
  fn benchmark() { do_bench(); }

  bencher::benchmark_group!(do_bench, bench);

  fn bench(b: &mut bencher::Bencher) {
    let snapshot: Vec<Sub> = (0..8)
      .map(|_| Arc::new(SubscribeFn::new("bench", |_: &u32| Ok(()))) as Sub)
      .collect();
    b.iter(|| dispatch(&snapshot, &1).unwrap());
  }
}
