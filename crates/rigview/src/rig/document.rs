//! Shared ownership of a rig and its model registry.

use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rigview_core::{ObserverRegistry, Registration};

use super::{ComboPairId, ItemRef, ProgPairId, Rig, SliderId};
use crate::error::Result;

/// Receives the batched value updates of the tick path.
///
/// Each call applies one kind of update in a single pass. Implementations
/// should validate the whole batch before applying any of it.
pub trait WeightSink {
    /// Sets the weights of several sliders.
    fn set_sliders_weights(&mut self, updates: &[(SliderId, f64)]) -> Result<()>;

    /// Sets the values of several shape targets.
    fn set_shapes_values(&mut self, updates: &[(ProgPairId, f64)]) -> Result<()>;

    /// Sets the values of several combo pairs.
    fn set_combos_values(&mut self, updates: &[(ComboPairId, f64)]) -> Result<()>;
}

/// A model that wants to hear about item changes made outside of it.
pub trait RigObserver: Send + Sync {
    /// Called after the data of `item` changed.
    fn item_data_changed(&self, item: ItemRef);
}

/// A rig shared between the editing code and every model built over it.
///
/// Models are constructed against an `Arc<RigDocument>` and register
/// themselves in the document's observer list for as long as they live.
pub struct RigDocument {
    rig: RwLock<Rig>,
    observers: ObserverRegistry<dyn RigObserver>,
}

impl RigDocument {
    /// Wraps a rig for sharing.
    pub fn new(rig: Rig) -> Arc<Self> {
        Arc::new(Self {
            rig: RwLock::new(rig),
            observers: ObserverRegistry::new(),
        })
    }

    /// Locks the rig for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Rig> {
        self.rig.read()
    }

    /// Locks the rig for writing.
    ///
    /// Do not hold the guard while emitting model signals; slots usually read
    /// the rig back.
    pub fn write(&self) -> RwLockWriteGuard<'_, Rig> {
        self.rig.write()
    }

    /// Registers a model. It is deregistered when the returned guard drops.
    #[must_use = "the observer is deregistered as soon as the registration is dropped"]
    pub fn register(&self, observer: Weak<dyn RigObserver>) -> Registration<dyn RigObserver> {
        self.observers.register(observer)
    }

    /// Number of registered models.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Tells every live model that the data of `item` changed.
    pub fn item_data_changed(&self, item: ItemRef) {
        for observer in self.observers.observers() {
            observer.item_data_changed(item);
        }
    }
}

impl std::fmt::Debug for RigDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigDocument")
            .field("name", &self.rig.read().name())
            .field("observers", &self.observers.len())
            .finish()
    }
}
