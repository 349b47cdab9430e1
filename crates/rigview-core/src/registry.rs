//! Weak observer registries with RAII deregistration.
//!
//! An [`ObserverRegistry`] is owned by the object being observed. Observers
//! register a weak reference to themselves and keep the returned
//! [`Registration`]; dropping the registration removes the entry, so a
//! registry never notifies an observer that no longer exists.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Identifies one registered observer.
    pub struct ObserverId;
}

type Entries<T> = Mutex<SlotMap<ObserverId, Weak<T>>>;

/// A list of weakly-held observers of type `T` (usually a trait object).
pub struct ObserverRegistry<T: ?Sized> {
    entries: Arc<Entries<T>>,
}

impl<T: ?Sized> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> ObserverRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// Registers an observer.
    ///
    /// The observer stays registered for as long as the returned
    /// [`Registration`] is alive.
    #[must_use = "the observer is deregistered as soon as the registration is dropped"]
    pub fn register(&self, observer: Weak<T>) -> Registration<T> {
        let id = self.entries.lock().insert(observer);
        tracing::trace!(target: crate::logging::targets::REGISTRY, ?id, "observer registered");
        Registration {
            entries: Arc::downgrade(&self.entries),
            id,
        }
    }

    /// Returns strong references to every observer that is still alive.
    ///
    /// The list is a snapshot; observers can be notified without holding the
    /// registry lock.
    pub fn observers(&self) -> Vec<Arc<T>> {
        self.entries
            .lock()
            .values()
            .filter_map(Weak::upgrade)
            .collect()
    }

    /// Returns the number of registered observers.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Keeps an observer registered; deregisters it on drop.
pub struct Registration<T: ?Sized> {
    entries: Weak<Entries<T>>,
    id: ObserverId,
}

impl<T: ?Sized> Registration<T> {
    /// Returns the id of the registered entry.
    pub fn id(&self) -> ObserverId {
        self.id
    }
}

impl<T: ?Sized> Drop for Registration<T> {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.lock().remove(self.id);
            tracing::trace!(target: crate::logging::targets::REGISTRY, id = ?self.id, "observer deregistered");
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Registration<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}
