//! Begin/end brackets around structural edits.
//!
//! Views keep derived state (expanded rows, selections, proxy mappings) that
//! must be told about a structural edit in two halves: the "about to" signal
//! while the rig still has its old shape, and the "done" signal once it has
//! the new one. A [`ChangeBracket`] emits the first half when it is opened and
//! the second half when it is dropped, so the end signal fires on every exit
//! path, including an early `?` return or a panic inside the edit.
//!
//! # Example
//!
//! ```
//! use rigview::model::{RigTreeModel, StructuralEdit};
//! use rigview::rig::{GroupKind, ItemRef, Rig, RigDocument};
//!
//! let doc = RigDocument::new(Rig::new("face"));
//! let model = RigTreeModel::new(doc.clone());
//!
//! let group = model.insert_item(ItemRef::Root, None, |rig| {
//!     rig.create_group("Brows", GroupKind::Slider)
//! });
//! let slider = model
//!     .insert_item(ItemRef::Group(group), None, |rig| rig.create_slider(group, "browUp"))
//!     .unwrap();
//! assert_eq!(doc.read().slider(slider).unwrap().name, "browUp");
//! ```

use rigview_core::logging::targets;

use super::index::ModelIndex;
use super::traits::{ModelSignals, RigItemModel};
use crate::rig::{ItemRef, Rig};

enum BracketEnd {
    Insert { parent: ModelIndex, row: usize },
    Remove { parent: ModelIndex, row: usize },
    Move {
        source_parent: ModelIndex,
        source_row: usize,
        dest_parent: ModelIndex,
        dest_row: usize,
    },
    Reset,
}

/// An open structural-change bracket. Dropping it emits the end signal.
#[must_use = "the end signal fires as soon as the bracket is dropped"]
pub struct ChangeBracket<'a> {
    signals: &'a ModelSignals,
    end: BracketEnd,
}

impl<'a> ChangeBracket<'a> {
    /// Opens an insert bracket for one row.
    pub fn insert(signals: &'a ModelSignals, parent: ModelIndex, row: usize) -> Self {
        tracing::trace!(target: targets::MODEL, ?parent, row, "begin insert");
        signals
            .rows_about_to_be_inserted
            .emit((parent.clone(), row, row));
        Self {
            signals,
            end: BracketEnd::Insert { parent, row },
        }
    }

    /// Opens a remove bracket for one row.
    pub fn remove(signals: &'a ModelSignals, parent: ModelIndex, row: usize) -> Self {
        tracing::trace!(target: targets::MODEL, ?parent, row, "begin remove");
        signals
            .rows_about_to_be_removed
            .emit((parent.clone(), row, row));
        Self {
            signals,
            end: BracketEnd::Remove { parent, row },
        }
    }

    /// Opens a move bracket for one row.
    ///
    /// `dest_row` is expressed in the destination's rows before the move.
    pub fn move_row(
        signals: &'a ModelSignals,
        source_parent: ModelIndex,
        source_row: usize,
        dest_parent: ModelIndex,
        dest_row: usize,
    ) -> Self {
        tracing::trace!(target: targets::MODEL, ?source_parent, source_row, ?dest_parent, dest_row, "begin move");
        signals.rows_about_to_be_moved.emit((
            source_parent.clone(),
            source_row,
            source_row,
            dest_parent.clone(),
            dest_row,
        ));
        Self {
            signals,
            end: BracketEnd::Move {
                source_parent,
                source_row,
                dest_parent,
                dest_row,
            },
        }
    }

    /// Opens a full reset bracket.
    pub fn reset(signals: &'a ModelSignals) -> Self {
        tracing::trace!(target: targets::MODEL, "begin reset");
        signals.model_about_to_reset.emit(());
        Self {
            signals,
            end: BracketEnd::Reset,
        }
    }
}

impl Drop for ChangeBracket<'_> {
    fn drop(&mut self) {
        let end = std::mem::replace(&mut self.end, BracketEnd::Reset);
        match end {
            BracketEnd::Insert { parent, row } => {
                tracing::trace!(target: targets::MODEL, row, "end insert");
                self.signals.rows_inserted.emit((parent, row, row));
            }
            BracketEnd::Remove { parent, row } => {
                tracing::trace!(target: targets::MODEL, row, "end remove");
                self.signals.rows_removed.emit((parent, row, row));
            }
            BracketEnd::Move {
                source_parent,
                source_row,
                dest_parent,
                dest_row,
            } => {
                tracing::trace!(target: targets::MODEL, source_row, dest_row, "end move");
                self.signals
                    .rows_moved
                    .emit((source_parent, source_row, source_row, dest_parent, dest_row));
            }
            BracketEnd::Reset => {
                tracing::trace!(target: targets::MODEL, "end reset");
                self.signals.model_reset.emit(());
            }
        }
    }
}

/// The transactional mutation protocol.
///
/// Each `begin_*` method resolves positions against the *current* rig and
/// opens a bracket; the caller mutates the rig and drops the bracket. The
/// `*_item` helpers do all three steps around a closure that receives the
/// locked rig. When the positions cannot be resolved (for example the parent
/// is not shown by this model) no bracket is opened and the edit still runs.
///
/// To keep several models in step, open one bracket per model, perform the
/// edit once, then drop the brackets. Brackets must not be nested on the same
/// model.
pub trait StructuralEdit: RigItemModel {
    /// Row a new child of `parent` lands on when no row is given.
    fn append_row(&self, parent: ItemRef) -> usize;

    /// The index children of `parent` are inserted under, if `parent` is shown.
    fn insert_parent(&self, parent: ItemRef) -> Option<ModelIndex> {
        let index = self.index_from_item(parent, 0);
        index.is_valid().then_some(index)
    }

    /// Opens an insert bracket for a new child of `parent`.
    fn begin_insert(&self, parent: ItemRef, row: Option<usize>) -> Option<ChangeBracket<'_>> {
        let parent_index = self.insert_parent(parent)?;
        let row = row.unwrap_or_else(|| self.append_row(parent));
        Some(ChangeBracket::insert(self.signals(), parent_index, row))
    }

    /// Opens a remove bracket for `item`.
    fn begin_remove(&self, item: ItemRef) -> Option<ChangeBracket<'_>> {
        let index = self.index_from_item(item, 0);
        if !index.is_valid() {
            return None;
        }
        Some(ChangeBracket::remove(self.signals(), index.parent(), index.row()))
    }

    /// Opens a move bracket for `item` into `dest_parent`.
    fn begin_move(&self, item: ItemRef, dest_parent: ItemRef, dest_row: Option<usize>) -> Option<ChangeBracket<'_>> {
        let index = self.index_from_item(item, 0);
        if !index.is_valid() {
            return None;
        }
        let dest_index = self.insert_parent(dest_parent)?;
        let dest_row = dest_row.unwrap_or_else(|| self.append_row(dest_parent));
        Some(ChangeBracket::move_row(
            self.signals(),
            index.parent(),
            index.row(),
            dest_index,
            dest_row,
        ))
    }

    /// Opens a reset bracket.
    fn begin_reset(&self) -> ChangeBracket<'_> {
        ChangeBracket::reset(self.signals())
    }

    /// Inserts a child of `parent` inside an insert bracket.
    fn insert_item<R>(&self, parent: ItemRef, row: Option<usize>, edit: impl FnOnce(&mut Rig) -> R) -> R
    where
        Self: Sized,
    {
        let _bracket = self.begin_insert(parent, row);
        let mut rig = self.document().write();
        edit(&mut rig)
    }

    /// Removes `item` inside a remove bracket.
    fn remove_item<R>(&self, item: ItemRef, edit: impl FnOnce(&mut Rig) -> R) -> R
    where
        Self: Sized,
    {
        let _bracket = self.begin_remove(item);
        let mut rig = self.document().write();
        edit(&mut rig)
    }

    /// Moves `item` under `dest_parent` inside a move bracket.
    fn move_item<R>(
        &self,
        item: ItemRef,
        dest_parent: ItemRef,
        dest_row: Option<usize>,
        edit: impl FnOnce(&mut Rig) -> R,
    ) -> R
    where
        Self: Sized,
    {
        let _bracket = self.begin_move(item, dest_parent, dest_row);
        let mut rig = self.document().write();
        edit(&mut rig)
    }

    /// Runs a bulk edit inside a reset bracket.
    fn reset_model<R>(&self, edit: impl FnOnce(&mut Rig) -> R) -> R
    where
        Self: Sized,
    {
        let _bracket = self.begin_reset();
        let mut rig = self.document().write();
        edit(&mut rig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_bracket_emits_end_on_drop() {
        let signals = ModelSignals::new();
        let events = Arc::new(Mutex::new(Vec::new()));

        let about = events.clone();
        signals
            .rows_about_to_be_removed
            .connect(move |(_, first, _)| about.lock().push(("about", *first)));
        let done = events.clone();
        signals
            .rows_removed
            .connect(move |(_, first, _)| done.lock().push(("done", *first)));

        let bracket = ChangeBracket::remove(&signals, ModelIndex::invalid(), 3);
        assert_eq!(*events.lock(), vec![("about", 3)]);
        drop(bracket);
        assert_eq!(*events.lock(), vec![("about", 3), ("done", 3)]);
    }

    #[test]
    fn test_bracket_ends_during_unwind() {
        let signals = Arc::new(ModelSignals::new());
        let resets = Arc::new(Mutex::new(0));
        let counter = resets.clone();
        signals.model_reset.connect(move |_| *counter.lock() += 1);

        let inner = signals.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _bracket = ChangeBracket::reset(&inner);
            panic!("edit failed");
        }));
        assert!(result.is_err());
        assert_eq!(*resets.lock(), 1);
    }
}
