//! Filtering and sorting proxy over a rig model.
//!
//! `FilterProxyModel` wraps any [`RigItemModel`] (the tree model or another
//! proxy) and hides the rows its [`RowFilter`]s reject. Proxy indexes point at
//! the same rig items as the source, so translating between the two is an
//! item lookup rather than a row computation.
//!
//! Row mappings are built lazily, one per parent, and dropped whenever the
//! source reports a structural, layout or data change.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rigview_core::{ConnectionId, Signal};
use rigview_core::logging::targets;

use super::filters::RowFilter;
use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};
use super::traits::{ItemFlags, ItemModel, ModelSignals, Orientation, RigItemModel};
use crate::rig::{ItemRef, RigDocument};

/// Proxy rows of one parent mapped to source rows.
#[derive(Debug, Default)]
struct RowMapping {
    proxy_to_source: Vec<usize>,
    /// `None` for rows that are filtered out.
    source_to_proxy: Vec<Option<usize>>,
}

impl RowMapping {
    fn new(visible: Vec<usize>, source_count: usize) -> Self {
        let mut source_to_proxy = vec![None; source_count];
        for (proxy_row, &source_row) in visible.iter().enumerate() {
            source_to_proxy[source_row] = Some(proxy_row);
        }
        Self {
            proxy_to_source: visible,
            source_to_proxy,
        }
    }

    fn len(&self) -> usize {
        self.proxy_to_source.len()
    }

    fn map_to_source(&self, proxy_row: usize) -> Option<usize> {
        self.proxy_to_source.get(proxy_row).copied()
    }

    fn map_from_source(&self, source_row: usize) -> Option<usize> {
        self.source_to_proxy.get(source_row).copied().flatten()
    }
}

/// Connections made on the source's signals, undone when the proxy drops.
struct SourceLinks {
    rows_about_to_be_inserted: ConnectionId,
    rows_inserted: ConnectionId,
    rows_about_to_be_removed: ConnectionId,
    rows_removed: ConnectionId,
    rows_about_to_be_moved: ConnectionId,
    rows_moved: ConnectionId,
    data_changed: ConnectionId,
    layout_about_to_change: ConnectionId,
    layout_changed: ConnectionId,
    model_about_to_reset: ConnectionId,
    model_reset: ConnectionId,
}

/// Connects a slot that turns a source "about to" signal into a proxy
/// layout change.
fn forward_about<S: RigItemModel + 'static, A: 'static>(
    signal: &Signal<A>,
    proxy: &Weak<FilterProxyModel<S>>,
) -> ConnectionId {
    let proxy = proxy.clone();
    signal.connect(move |_: &A| {
        if let Some(proxy) = proxy.upgrade() {
            proxy.signals.layout_about_to_change.emit(());
        }
    })
}

/// Connects a slot that drops the mappings and completes the proxy layout
/// change.
fn forward_changed<S: RigItemModel + 'static, A: 'static>(
    signal: &Signal<A>,
    proxy: &Weak<FilterProxyModel<S>>,
) -> ConnectionId {
    let proxy = proxy.clone();
    signal.connect(move |_: &A| {
        if let Some(proxy) = proxy.upgrade() {
            proxy.clear_mappings();
            proxy.signals.layout_changed.emit(());
        }
    })
}

impl SourceLinks {
    fn connect<S: RigItemModel + 'static>(source: &S, proxy: &Weak<FilterProxyModel<S>>) -> Self {
        let signals = source.signals();
        let data = proxy.clone();
        let about_reset = proxy.clone();
        let reset = proxy.clone();
        Self {
            rows_about_to_be_inserted: forward_about(&signals.rows_about_to_be_inserted, proxy),
            rows_inserted: forward_changed(&signals.rows_inserted, proxy),
            rows_about_to_be_removed: forward_about(&signals.rows_about_to_be_removed, proxy),
            rows_removed: forward_changed(&signals.rows_removed, proxy),
            rows_about_to_be_moved: forward_about(&signals.rows_about_to_be_moved, proxy),
            rows_moved: forward_changed(&signals.rows_moved, proxy),
            layout_about_to_change: forward_about(&signals.layout_about_to_change, proxy),
            layout_changed: forward_changed(&signals.layout_changed, proxy),
            data_changed: signals.data_changed.connect(move |(top_left, bottom_right, roles)| {
                if let Some(proxy) = data.upgrade() {
                    proxy.forward_data_changed(top_left, bottom_right, roles);
                }
            }),
            model_about_to_reset: signals.model_about_to_reset.connect(move |_| {
                if let Some(proxy) = about_reset.upgrade() {
                    proxy.signals.model_about_to_reset.emit(());
                }
            }),
            model_reset: signals.model_reset.connect(move |_| {
                if let Some(proxy) = reset.upgrade() {
                    proxy.clear_mappings();
                    proxy.signals.model_reset.emit(());
                }
            }),
        }
    }

    fn disconnect(&self, signals: &ModelSignals) {
        signals.rows_about_to_be_inserted.disconnect(self.rows_about_to_be_inserted);
        signals.rows_inserted.disconnect(self.rows_inserted);
        signals.rows_about_to_be_removed.disconnect(self.rows_about_to_be_removed);
        signals.rows_removed.disconnect(self.rows_removed);
        signals.rows_about_to_be_moved.disconnect(self.rows_about_to_be_moved);
        signals.rows_moved.disconnect(self.rows_moved);
        signals.data_changed.disconnect(self.data_changed);
        signals.layout_about_to_change.disconnect(self.layout_about_to_change);
        signals.layout_changed.disconnect(self.layout_changed);
        signals.model_about_to_reset.disconnect(self.model_about_to_reset);
        signals.model_reset.disconnect(self.model_reset);
    }
}

/// A proxy that filters (and optionally sorts) the rows of a source model.
///
/// A row is shown when every filter accepts its item. Rows without an item
/// (synthetic rows of flat models) are always shown. Filters are fixed at
/// construction; their settings can change at any time, after which
/// [`invalidate`](RigItemModel::invalidate) must be called.
///
/// Structural signals of the source are forwarded as layout changes. A
/// source `data_changed` re-runs the filters and the sort inside a layout
/// change, then is forwarded with the indexes mapped into the proxy.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rigview::model::{FilterProxyModel, GroupKindFilter, ItemModel, ModelIndex, RigTreeModel};
/// use rigview::rig::{GroupKind, Rig, RigDocument};
///
/// let mut rig = Rig::new("face");
/// rig.create_group("Brows", GroupKind::Slider);
/// rig.create_group("Combos", GroupKind::Combo);
/// let tree = RigTreeModel::new(RigDocument::new(rig));
///
/// let sliders = FilterProxyModel::new(tree, vec![Arc::new(GroupKindFilter::new(GroupKind::Slider))]);
/// let root = sliders.index(0, 0, &ModelIndex::invalid());
/// assert_eq!(sliders.row_count(&root), 1);
/// ```
pub struct FilterProxyModel<S: RigItemModel + 'static> {
    source: Arc<S>,
    filters: Vec<Arc<dyn RowFilter>>,
    mappings: RwLock<HashMap<Option<ItemRef>, Arc<RowMapping>>>,
    /// Sort column and descending flag.
    sort: RwLock<Option<(usize, bool)>>,
    signals: ModelSignals,
    links: Option<SourceLinks>,
}

impl<S: RigItemModel + 'static> FilterProxyModel<S> {
    /// Creates a proxy over `source` that applies `filters` in order.
    pub fn new(source: Arc<S>, filters: Vec<Arc<dyn RowFilter>>) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let links = SourceLinks::connect(&*source, weak);
            Self {
                source,
                filters,
                mappings: RwLock::new(HashMap::new()),
                sort: RwLock::new(None),
                signals: ModelSignals::new(),
                links: Some(links),
            }
        })
    }

    /// Returns the source model.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Returns the filters, in application order.
    pub fn filters(&self) -> &[Arc<dyn RowFilter>] {
        &self.filters
    }

    /// Sorts every level by the display data of `column`.
    pub fn sort_by_column(&self, column: usize, descending: bool) {
        *self.sort.write() = Some((column, descending));
        self.invalidate();
    }

    /// Restores source order.
    pub fn clear_sort(&self) {
        *self.sort.write() = None;
        self.invalidate();
    }

    /// The current sort column and direction.
    pub fn sort_order(&self) -> Option<(usize, bool)> {
        *self.sort.read()
    }

    /// Maps a proxy index to the source index of the same cell.
    pub fn map_to_source(&self, proxy_index: &ModelIndex) -> ModelIndex {
        if !proxy_index.is_valid() {
            return ModelIndex::invalid();
        }
        match proxy_index.item() {
            Some(item) => self.source.index_from_item(item, proxy_index.column()),
            None => match self.mapping(None).map_to_source(proxy_index.row()) {
                Some(row) => self.source.index(row, proxy_index.column(), &ModelIndex::invalid()),
                None => ModelIndex::invalid(),
            },
        }
    }

    /// Maps a source index into the proxy; invalid if the row is hidden.
    pub fn map_from_source(&self, source_index: &ModelIndex) -> ModelIndex {
        if !source_index.is_valid() {
            return ModelIndex::invalid();
        }
        match self.source.item_from_index(source_index) {
            Some(item) => self.index_from_item(item, source_index.column()),
            None if !source_index.has_parent() => match self.mapping(None).map_from_source(source_index.row()) {
                Some(row) => ModelIndex::synthetic(row, source_index.column()),
                None => ModelIndex::invalid(),
            },
            None => ModelIndex::invalid(),
        }
    }

    fn parent_key(parent: &ModelIndex) -> Option<Option<ItemRef>> {
        if parent.is_valid() { parent.item().map(Some) } else { Some(None) }
    }

    fn source_parent(&self, key: Option<ItemRef>) -> ModelIndex {
        match key {
            Some(item) => self.source.index_from_item(item, 0),
            None => ModelIndex::invalid(),
        }
    }

    fn mapping(&self, key: Option<ItemRef>) -> Arc<RowMapping> {
        if let Some(mapping) = self.mappings.read().get(&key) {
            return mapping.clone();
        }
        let mapping = Arc::new(self.build_mapping(key));
        self.mappings.write().insert(key, mapping.clone());
        mapping
    }

    fn build_mapping(&self, key: Option<ItemRef>) -> RowMapping {
        let source_parent = self.source_parent(key);
        if key.is_some() && !source_parent.is_valid() {
            return RowMapping::default();
        }
        let count = self.source.row_count(&source_parent);
        let rows: Vec<(usize, Option<ItemRef>)> = (0..count)
            .map(|row| {
                let index = self.source.index(row, 0, &source_parent);
                (row, self.source.item_from_index(&index))
            })
            .collect();

        let mut visible: Vec<usize> = {
            let rig = self.source.document().read();
            rows.iter()
                .filter(|(_, item)| match item {
                    Some(item) => self.filters.iter().all(|f| f.accepts(&rig, *item)),
                    None => true,
                })
                .map(|(row, _)| *row)
                .collect()
        };

        if let Some((column, descending)) = self.sort_order() {
            let keys: HashMap<usize, ItemData> = visible
                .iter()
                .map(|&row| {
                    let index = self.source.index(row, column, &source_parent);
                    (row, self.source.data(&index, ItemRole::Display))
                })
                .collect();
            visible.sort_by(|a, b| {
                let cmp = compare_item_data(&keys[a], &keys[b]);
                if descending { cmp.reverse() } else { cmp }
            });
        }

        tracing::debug!(target: targets::PROXY, parent = ?key, source_rows = count, shown = visible.len(), "row mapping built");
        RowMapping::new(visible, count)
    }

    fn clear_mappings(&self) {
        self.mappings.write().clear();
    }

    /// Refilters and resorts, then forwards the change for rows still shown.
    ///
    /// A container's acceptance can follow its descendants' names, so every
    /// cached mapping is dropped, not only the changed rows' parent.
    fn forward_data_changed(&self, top_left: &ModelIndex, bottom_right: &ModelIndex, roles: &[ItemRole]) {
        let cached = !self.mappings.read().is_empty();
        if cached {
            tracing::trace!(target: targets::PROXY, "refiltering after data change");
            self.signals.emit_layout_changed(|| self.clear_mappings());
        }
        let top_left = self.map_from_source(top_left);
        let bottom_right = self.map_from_source(bottom_right);
        if top_left.is_valid() && bottom_right.is_valid() {
            self.signals
                .emit_data_changed(top_left, bottom_right, roles.to_vec());
        }
    }
}

/// Orders display data for sorting. Numbers compare numerically, mixed
/// kinds compare as equal.
fn compare_item_data(a: &ItemData, b: &ItemData) -> Ordering {
    match (a, b) {
        (ItemData::String(sa), ItemData::String(sb)) => sa.to_lowercase().cmp(&sb.to_lowercase()),
        (ItemData::Int(ia), ItemData::Int(ib)) => ia.cmp(ib),
        (ItemData::Bool(ba), ItemData::Bool(bb)) => ba.cmp(bb),
        (ItemData::Float(_) | ItemData::Int(_), ItemData::Float(_) | ItemData::Int(_)) => {
            let fa = a.as_float().unwrap_or_default();
            let fb = b.as_float().unwrap_or_default();
            fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
        }
        (ItemData::None, ItemData::None) => Ordering::Equal,
        (ItemData::None, _) => Ordering::Less,
        (_, ItemData::None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

impl<S: RigItemModel + 'static> ItemModel for FilterProxyModel<S> {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() && parent.column() != 0 {
            return 0;
        }
        match Self::parent_key(parent) {
            Some(key) => self.mapping(key).len(),
            None => 0,
        }
    }

    fn column_count(&self, parent: &ModelIndex) -> usize {
        self.source.column_count(&self.map_to_source(parent))
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        self.source.data(&self.map_to_source(index), role)
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        let Some(key) = Self::parent_key(parent) else {
            return ModelIndex::invalid();
        };
        let Some(source_row) = self.mapping(key).map_to_source(row) else {
            return ModelIndex::invalid();
        };
        let source_index = self.source.index(source_row, column, &self.source_parent(key));
        if !source_index.is_valid() {
            return ModelIndex::invalid();
        }
        match self.source.item_from_index(&source_index) {
            Some(item) => ModelIndex::new(row, column, parent.at_column(0), item),
            None if key.is_none() => ModelIndex::synthetic(row, column),
            None => ModelIndex::invalid(),
        }
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        let Some(item) = self.item_from_index(index) else {
            return ModelIndex::invalid();
        };
        let source_parent = self.source.parent(&self.source.index_from_item(item, 0));
        match self.source.item_from_index(&source_parent) {
            Some(parent) => self.index_from_item(parent, 0),
            None => ModelIndex::invalid(),
        }
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, index: &ModelIndex, value: ItemData, role: ItemRole) -> bool {
        let source_index = self.map_to_source(index);
        if !source_index.is_valid() {
            return false;
        }
        self.source.set_data(&source_index, value, role)
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        self.source.flags(&self.map_to_source(index))
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ItemData {
        self.source.header_data(section, orientation, role)
    }
}

impl<S: RigItemModel + 'static> RigItemModel for FilterProxyModel<S> {
    fn document(&self) -> &Arc<RigDocument> {
        self.source.document()
    }

    fn item_from_index(&self, index: &ModelIndex) -> Option<ItemRef> {
        if !index.is_valid() {
            return None;
        }
        index.item()
    }

    fn index_from_item(&self, item: ItemRef, column: usize) -> ModelIndex {
        let source_index = self.source.index_from_item(item, 0);
        if !source_index.is_valid() {
            return ModelIndex::invalid();
        }
        let source_parent = self.source.parent(&source_index);
        let (key, proxy_parent) = if source_parent.is_valid() {
            let Some(parent_item) = self.source.item_from_index(&source_parent) else {
                return ModelIndex::invalid();
            };
            let proxy_parent = self.index_from_item(parent_item, 0);
            if !proxy_parent.is_valid() {
                return ModelIndex::invalid();
            }
            (Some(parent_item), proxy_parent)
        } else {
            (None, ModelIndex::invalid())
        };
        match self.mapping(key).map_from_source(source_index.row()) {
            Some(row) => ModelIndex::new(row, column, proxy_parent, item),
            None => ModelIndex::invalid(),
        }
    }

    /// Invalidates the source first, then rebuilds this proxy's mappings
    /// inside a layout change.
    fn invalidate(&self) {
        self.source.invalidate();
        tracing::debug!(target: targets::PROXY, "proxy invalidated");
        self.signals.emit_layout_changed(|| self.clear_mappings());
    }
}

impl<S: RigItemModel + 'static> Drop for FilterProxyModel<S> {
    fn drop(&mut self) {
        if let Some(links) = self.links.take() {
            links.disconnect(self.source.signals());
        }
    }
}

static_assertions::assert_impl_all!(FilterProxyModel<super::RigTreeModel>: Send, Sync);
