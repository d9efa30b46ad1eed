//! Ordered, identity-unique handler registry
//!
//! Insertion order is semantically significant: it is the notification
//! order for subscribers and the outer-to-inner order for interceptors.
//! Handles are deduplicated by identity, not value, so registering the
//! same `Rc`/`Arc` twice is a no-op and removing an absent handle is a
//! no-op as well.

use std::{rc::Rc, sync::Arc};

use smallvec::SmallVec;

/// An owned, ordered view of the registry taken at one point in time.
///
/// Iterating a snapshot requires no lock, so dispatch can run while the
/// live registry keeps mutating; handles added after the snapshot was
/// taken are simply not part of it.
pub type Snapshot<H> = SmallVec<[H; 2]>;

/// Stable identity of a registered handle.
///
/// Implemented for `Rc`/`Arc` via the data-pointer address, so identity
/// follows the allocation: two clones of one handle compare equal, two
/// handles built from equal values do not.
pub trait HandleIdentity {
  fn handle_id(&self) -> usize;
}

impl<T: ?Sized> HandleIdentity for Rc<T> {
  #[inline]
  fn handle_id(&self) -> usize { Rc::as_ptr(self) as *const () as usize }
}

impl<T: ?Sized> HandleIdentity for Arc<T> {
  #[inline]
  fn handle_id(&self) -> usize { Arc::as_ptr(self) as *const () as usize }
}

/// Ordered collection of handler handles, unique by identity.
pub struct Registry<H> {
  handles: SmallVec<[H; 2]>,
}

impl<H> Default for Registry<H> {
  fn default() -> Self { Self { handles: SmallVec::new() } }
}

impl<H: HandleIdentity + Clone> Registry<H> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Appends `handle` unless one with the same identity is present.
  pub fn add(&mut self, handle: H) {
    if !self.contains(&handle) {
      self.handles.push(handle);
    }
  }

  /// Removes every occurrence matching `handle`'s identity. Absent
  /// handles are ignored; order of the remaining handles is unchanged.
  pub fn remove(&mut self, handle: &H) {
    let id = handle.handle_id();
    self.handles.retain(|h| h.handle_id() != id);
  }

  #[inline]
  pub fn contains(&self, handle: &H) -> bool {
    let id = handle.handle_id();
    self.handles.iter().any(|h| h.handle_id() == id)
  }

  /// Clones the current handle sequence into an owned ordered view.
  #[inline]
  pub fn snapshot(&self) -> Snapshot<H> { self.handles.clone() }

  #[inline]
  pub fn len(&self) -> usize { self.handles.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.handles.is_empty() }

  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &H> { self.handles.iter() }
}
