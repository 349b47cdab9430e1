//! The rig tree model.
//!
//! `RigTreeModel` presents a whole rig as a three-column tree:
//!
//! | column | header  | content                                                  |
//! |--------|---------|----------------------------------------------------------|
//! | 0      | Items   | name, plus the enabled checkbox of sliders/combos/traversals |
//! | 1      | Slide   | slider weight, combo pair value, traversal pair value    |
//! | 2      | Value   | shape value, or the usage tag of a traversal pair        |
//!
//! Structure comes from the [`Navigator`]; nothing is cached between calls.

use std::sync::{Arc, Weak};

use rigview_core::Registration;
use rigview_core::logging::targets;

use super::index::ModelIndex;
use super::navigator::Navigator;
use super::role::{CheckState, ItemData, ItemRole};
use super::traits::{ItemFlags, ItemModel, ModelSignals, Orientation, RigItemModel};
use super::transaction::StructuralEdit;
use crate::error::Result;
use crate::rig::{ComboPairId, ItemKind, ItemRef, ProgPairId, Rig, RigDocument, RigObserver, SliderId, WeightSink};

/// Column headers of the tree model.
pub const TREE_HEADERS: [&str; 3] = ["Items", "Slide", "Value"];

/// Label shown in column 0 for combo and traversal progressions.
pub const PROGRESSION_LABEL: &str = "SHAPES";

/// Builds the index of `item`, including its full parent chain.
pub(crate) fn tree_index(nav: &Navigator<'_>, item: ItemRef, column: usize) -> ModelIndex {
    let Some(row) = nav.row(item) else {
        return ModelIndex::invalid();
    };
    let parent = match nav.parent(item) {
        Some(parent) => {
            let index = tree_index(nav, parent, 0);
            if !index.is_valid() {
                return ModelIndex::invalid();
            }
            index
        }
        None => ModelIndex::invalid(),
    };
    ModelIndex::new(row, column, parent, item)
}

/// The base model over a [`RigDocument`].
///
/// The model registers itself with the document when created and is
/// deregistered when dropped.
pub struct RigTreeModel {
    document: Arc<RigDocument>,
    signals: ModelSignals,
    _registration: Registration<dyn RigObserver>,
}

impl RigTreeModel {
    /// Creates a tree model over `document`.
    pub fn new(document: Arc<RigDocument>) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let observer: Weak<dyn RigObserver> = weak.clone();
            let registration = document.register(observer);
            Self {
                document,
                signals: ModelSignals::new(),
                _registration: registration,
            }
        })
    }

    /// Applies a batch of drag-tick value updates.
    ///
    /// Updates are grouped by kind and each group is applied with one call
    /// (shapes, then sliders, then combo pairs). Items of other kinds are
    /// ignored. `data_changed` is emitted for every updated row once the
    /// whole batch has been applied.
    pub fn update_tick_values(&self, updates: &[(ItemRef, f64)]) -> Result<()> {
        let batch = TickBatch::from_updates(updates);
        if batch.is_empty() {
            return Ok(());
        }
        {
            let mut rig = self.document.write();
            batch.apply(&mut *rig)?;
        }

        let rig = self.document.read();
        let nav = Navigator::new(&rig);
        let changed: Vec<(ModelIndex, usize)> = batch
            .items()
            .map(|(item, column)| (tree_index(&nav, item, column), column))
            .filter(|(index, _)| index.is_valid())
            .collect();
        drop(rig);

        for (index, _) in changed {
            self.signals
                .emit_data_changed_single(index, vec![ItemRole::Display, ItemRole::Edit]);
        }
        Ok(())
    }

    fn with_nav<R>(&self, f: impl FnOnce(&Navigator<'_>) -> R) -> R {
        let rig = self.document.read();
        f(&Navigator::new(&rig))
    }

    fn cell_data(rig: &Rig, item: ItemRef, column: usize, role: ItemRole) -> ItemData {
        match role {
            ItemRole::Display | ItemRole::Edit => match (column, item) {
                (0, ItemRef::Progression(_)) => ItemData::from(PROGRESSION_LABEL),
                (0, _) => ItemData::from(rig.item_name(item).map(str::to_owned)),
                (1, ItemRef::Slider(_) | ItemRef::ComboPair(_) | ItemRef::TravPair(_)) => {
                    ItemData::from(rig.item_value(item))
                }
                (2, ItemRef::ProgPair(_)) => ItemData::from(rig.item_value(item)),
                (2, ItemRef::TravPair(id)) => {
                    ItemData::from(rig.trav_pair(id).map(|p| p.usage.as_str()))
                }
                _ => ItemData::None,
            },
            ItemRole::CheckState if column == 0 => rig
                .item_enabled(item)
                .map_or(ItemData::None, |enabled| CheckState::from(enabled).into()),
            _ => ItemData::None,
        }
    }

    fn apply_edit(rig: &mut Rig, item: ItemRef, column: usize, value: &ItemData, role: ItemRole) -> Option<Result<()>> {
        match (role, column, item.kind()) {
            (ItemRole::CheckState, 0, ItemKind::Slider | ItemKind::Combo | ItemKind::Traversal) => {
                let state = value.as_check_state()?;
                Some(rig.set_enabled(item, state == CheckState::Checked))
            }
            (ItemRole::Edit, 0, ItemKind::Slider | ItemKind::Combo | ItemKind::Traversal | ItemKind::ProgPair) => {
                let name = value.as_string()?;
                Some(rig.set_name(item, name))
            }
            (ItemRole::Edit, 1, ItemKind::Slider | ItemKind::ComboPair | ItemKind::TravPair)
            | (ItemRole::Edit, 2, ItemKind::ProgPair) => Some(rig.set_value(item, value.as_float()?)),
            _ => None,
        }
    }
}

impl ItemModel for RigTreeModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        if !parent.is_valid() {
            return self.with_nav(|nav| nav.child_count(None));
        }
        if parent.column() != 0 {
            return 0;
        }
        match parent.item() {
            Some(item) => self.with_nav(|nav| nav.child_count(Some(item))),
            None => 0,
        }
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        TREE_HEADERS.len()
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        let Some(item) = self.item_from_index(index) else {
            return ItemData::None;
        };
        let rig = self.document.read();
        Self::cell_data(&rig, item, index.column(), role)
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= TREE_HEADERS.len() {
            return ModelIndex::invalid();
        }
        let parent_item = if parent.is_valid() {
            match parent.item() {
                Some(item) => Some(item),
                None => return ModelIndex::invalid(),
            }
        } else {
            None
        };
        match self.with_nav(|nav| nav.child(parent_item, row)) {
            Some(child) => ModelIndex::new(row, column, parent.at_column(0), child),
            None => ModelIndex::invalid(),
        }
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        let Some(item) = self.item_from_index(index) else {
            return ModelIndex::invalid();
        };
        self.with_nav(|nav| match nav.parent(item) {
            Some(parent) => tree_index(nav, parent, 0),
            None => ModelIndex::invalid(),
        })
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, index: &ModelIndex, value: ItemData, role: ItemRole) -> bool {
        let Some(item) = self.item_from_index(index) else {
            return false;
        };
        let outcome = {
            let mut rig = self.document.write();
            Self::apply_edit(&mut rig, item, index.column(), &value, role)
        };
        match outcome {
            Some(Ok(())) => {
                self.signals.emit_data_changed_single(index.clone(), vec![role]);
                true
            }
            Some(Err(error)) => {
                tracing::warn!(target: targets::MODEL, ?item, %error, "cell edit rejected");
                false
            }
            None => false,
        }
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        let Some(item) = self.item_from_index(index) else {
            return ItemFlags::enabled_only();
        };
        match (index.column(), item.kind()) {
            (0, ItemKind::Slider | ItemKind::Combo | ItemKind::Traversal) => {
                ItemFlags::editable().with_checkable(true)
            }
            (0, ItemKind::ProgPair)
            | (1, ItemKind::Slider | ItemKind::ComboPair | ItemKind::TravPair)
            | (2, ItemKind::ProgPair) => ItemFlags::editable(),
            _ => ItemFlags::new(),
        }
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ItemData {
        match (orientation, role) {
            (Orientation::Horizontal, ItemRole::Display) => {
                ItemData::from(TREE_HEADERS.get(section).copied())
            }
            _ => ItemData::None,
        }
    }
}

impl RigItemModel for RigTreeModel {
    fn document(&self) -> &Arc<RigDocument> {
        &self.document
    }

    fn item_from_index(&self, index: &ModelIndex) -> Option<ItemRef> {
        if !index.is_valid() {
            return None;
        }
        index.item()
    }

    fn index_from_item(&self, item: ItemRef, column: usize) -> ModelIndex {
        self.with_nav(|nav| tree_index(nav, item, column))
    }
}

impl StructuralEdit for RigTreeModel {
    fn append_row(&self, parent: ItemRef) -> usize {
        self.with_nav(|nav| nav.append_row(parent))
    }

    /// Shapes added to a slider's progression are inserted under the slider.
    fn insert_parent(&self, parent: ItemRef) -> Option<ModelIndex> {
        let index = self.with_nav(|nav| tree_index(nav, nav.shown_parent(parent), 0));
        index.is_valid().then_some(index)
    }
}

impl RigObserver for RigTreeModel {
    fn item_data_changed(&self, item: ItemRef) {
        let first = self.index_from_item(item, 0);
        if first.is_valid() {
            let last = first.at_column(TREE_HEADERS.len() - 1);
            self.signals
                .emit_data_changed(first, last, vec![ItemRole::Display, ItemRole::Edit, ItemRole::CheckState]);
        }
    }
}

/// Drag-tick updates grouped by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickBatch {
    pub sliders: Vec<(SliderId, f64)>,
    pub shapes: Vec<(ProgPairId, f64)>,
    pub combos: Vec<(ComboPairId, f64)>,
    /// Number of updates whose item kind has no tick setter.
    pub ignored: usize,
}

impl TickBatch {
    /// Groups `(item, value)` updates by kind, keeping their relative order.
    pub fn from_updates(updates: &[(ItemRef, f64)]) -> Self {
        let mut batch = Self::default();
        for &(item, value) in updates {
            match item {
                ItemRef::Slider(id) => batch.sliders.push((id, value)),
                ItemRef::ProgPair(id) => batch.shapes.push((id, value)),
                ItemRef::ComboPair(id) => batch.combos.push((id, value)),
                _ => {
                    tracing::warn!(target: targets::MODEL, ?item, "tick update ignored");
                    batch.ignored += 1;
                }
            }
        }
        tracing::debug!(
            target: targets::MODEL,
            sliders = batch.sliders.len(),
            shapes = batch.shapes.len(),
            combos = batch.combos.len(),
            "tick batch"
        );
        batch
    }

    /// Returns `true` if no group has any update.
    pub fn is_empty(&self) -> bool {
        self.sliders.is_empty() && self.shapes.is_empty() && self.combos.is_empty()
    }

    /// Applies each non-empty group with a single call.
    pub fn apply(&self, sink: &mut impl WeightSink) -> Result<()> {
        if !self.shapes.is_empty() {
            sink.set_shapes_values(&self.shapes)?;
        }
        if !self.sliders.is_empty() {
            sink.set_sliders_weights(&self.sliders)?;
        }
        if !self.combos.is_empty() {
            sink.set_combos_values(&self.combos)?;
        }
        Ok(())
    }

    /// The updated items with the column that shows their value.
    fn items(&self) -> impl Iterator<Item = (ItemRef, usize)> + '_ {
        let sliders = self.sliders.iter().map(|(id, _)| (ItemRef::Slider(*id), 1));
        let shapes = self.shapes.iter().map(|(id, _)| (ItemRef::ProgPair(*id), 2));
        let combos = self.combos.iter().map(|(id, _)| (ItemRef::ComboPair(*id), 1));
        sliders.chain(shapes).chain(combos)
    }
}

static_assertions::assert_impl_all!(RigTreeModel: Send, Sync);
