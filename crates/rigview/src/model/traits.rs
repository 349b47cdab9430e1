//! The model contracts.
//!
//! [`ItemModel`] is what a tree or list view talks to. [`RigItemModel`] adds
//! the item bridge, so code that knows about rigs can go from an index to the
//! item behind it and back again, through any number of proxies.

use std::sync::Arc;

use rigview_core::Signal;

use super::index::ModelIndex;
use super::role::{CheckState, ItemData, ItemRole};
use crate::rig::{ItemRef, RigDocument};

/// What a view may do with a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    pub enabled: bool,
    pub selectable: bool,
    pub editable: bool,
    pub checkable: bool,
    /// The checkbox can show a partial state.
    pub tristate: bool,
}

impl ItemFlags {
    /// A read-only cell that can be selected.
    pub fn new() -> Self {
        Self {
            enabled: true,
            selectable: true,
            ..Default::default()
        }
    }

    /// A cell that can be neither selected nor edited, such as a picker's
    /// "none" row.
    pub fn enabled_only() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// A selectable cell with an editor.
    pub fn editable() -> Self {
        Self {
            editable: true,
            ..Self::new()
        }
    }

    pub fn with_checkable(mut self, checkable: bool) -> Self {
        self.checkable = checkable;
        self
    }

    pub fn with_tristate(mut self, tristate: bool) -> Self {
        self.tristate = tristate;
        self
    }
}

/// The view-facing model contract.
///
/// Every lookup is total. Out-of-range rows and stale indexes give
/// [`ModelIndex::invalid()`], unknown cells give [`ItemData::None`].
///
/// Hierarchical models answer `index`/`parent`/`row_count` at every level;
/// flat models answer them for the invalid parent only.
pub trait ItemModel: Send + Sync {
    /// Number of rows under `parent`; the invalid index is the top level.
    fn row_count(&self, parent: &ModelIndex) -> usize;

    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// Reads one role of a cell.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData;

    /// The index of the cell at `row`/`column` under `parent`.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// The column-0 index of the parent row.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    fn signals(&self) -> &ModelSignals;

    /// Writes one role of a cell. Returns `false` if the cell does not take
    /// the value; models are read-only unless they say otherwise.
    fn set_data(&self, _index: &ModelIndex, _value: ItemData, _role: ItemRole) -> bool {
        false
    }

    fn flags(&self, _index: &ModelIndex) -> ItemFlags {
        ItemFlags::new()
    }

    fn header_data(&self, _section: usize, _orientation: Orientation, _role: ItemRole) -> ItemData {
        ItemData::None
    }

    /// The display value as text. Numbers use their default formatting.
    fn display_text(&self, index: &ModelIndex) -> Option<String> {
        match self.data(index, ItemRole::Display) {
            ItemData::String(text) => Some(text),
            ItemData::Int(n) => Some(n.to_string()),
            ItemData::Float(n) => Some(n.to_string()),
            ItemData::Bool(b) => Some(b.to_string()),
            ItemData::None | ItemData::CheckState(_) => None,
        }
    }

    fn check_state(&self, index: &ModelIndex) -> Option<CheckState> {
        self.data(index, ItemRole::CheckState).as_check_state()
    }

    /// Shorthand for a [`CheckState`](ItemRole::CheckState) write.
    fn set_check_state(&self, index: &ModelIndex, state: CheckState) -> bool {
        self.set_data(index, state.into(), ItemRole::CheckState)
    }
}

/// A model over a [`RigDocument`] that can translate between indexes and items.
pub trait RigItemModel: ItemModel {
    /// The document this model presents.
    fn document(&self) -> &Arc<RigDocument>;

    /// Resolves the rig item an index points at.
    ///
    /// Synthetic rows and invalid indexes resolve to `None`.
    fn item_from_index(&self, index: &ModelIndex) -> Option<ItemRef>;

    /// Builds the index of `item` in `column`, or an invalid index if the
    /// item is not shown by this model.
    fn index_from_item(&self, item: ItemRef, column: usize) -> ModelIndex;

    /// Recomputes derived state. Proxies rebuild their row mappings and
    /// cascade to their source; plain models have nothing to do.
    fn invalidate(&self) {}
}

/// Which header `header_data` is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Column headers.
    Horizontal,
    /// Row headers.
    Vertical,
}

/// The notifications a model sends its views.
///
/// Structural notifications come in pairs. The first half is sent while the
/// rig still has its old shape, the second once it has the new one; see
/// [`StructuralEdit`](super::StructuralEdit). Row ranges are inclusive
/// `(parent, first, last)`; moves add `(dest parent, dest row)`.
pub struct ModelSignals {
    pub rows_about_to_be_inserted: Signal<(ModelIndex, usize, usize)>,
    pub rows_inserted: Signal<(ModelIndex, usize, usize)>,
    pub rows_about_to_be_removed: Signal<(ModelIndex, usize, usize)>,
    pub rows_removed: Signal<(ModelIndex, usize, usize)>,
    pub rows_about_to_be_moved: Signal<(ModelIndex, usize, usize, ModelIndex, usize)>,
    pub rows_moved: Signal<(ModelIndex, usize, usize, ModelIndex, usize)>,
    /// Cell values changed in the inclusive `(top left, bottom right)` span.
    pub data_changed: Signal<(ModelIndex, ModelIndex, Vec<ItemRole>)>,
    /// Rows may be shown, hidden or reordered; sent when a proxy refilters.
    pub layout_about_to_change: Signal<()>,
    pub layout_changed: Signal<()>,
    /// Everything changed; views drop all derived state.
    pub model_about_to_reset: Signal<()>,
    pub model_reset: Signal<()>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    pub fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            rows_about_to_be_moved: Signal::new(),
            rows_moved: Signal::new(),
            data_changed: Signal::new(),
            layout_about_to_change: Signal::new(),
            layout_changed: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
        }
    }

    pub fn emit_data_changed(&self, top_left: ModelIndex, bottom_right: ModelIndex, roles: Vec<ItemRole>) {
        self.data_changed.emit((top_left, bottom_right, roles));
    }

    /// `data_changed` for a single cell.
    pub fn emit_data_changed_single(&self, index: ModelIndex, roles: Vec<ItemRole>) {
        self.data_changed.emit((index.clone(), index, roles));
    }

    /// Runs `rebuild` between `layout_about_to_change` and `layout_changed`.
    pub fn emit_layout_changed(&self, rebuild: impl FnOnce()) {
        self.layout_about_to_change.emit(());
        rebuild();
        self.layout_changed.emit(());
    }
}
