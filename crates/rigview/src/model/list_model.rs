//! Flat models over single rig collections.
//!
//! - [`GroupListModel`]: the slider groups, for group pickers.
//! - [`FalloffModel`]: the falloffs with a tri-state check per falloff that
//!   reflects the current slider selection.
//! - [`FalloffDataModel`]: an eight-column editor table over the falloffs.
//!
//! The picker models start with a synthetic row 0 that stands for "none";
//! collection rows are shifted down by one.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rigview_core::logging::targets;
use rigview_core::{Registration, Signal};

use super::index::ModelIndex;
use super::role::{CheckState, ItemData, ItemRole};
use super::traits::{ItemFlags, ItemModel, ModelSignals, Orientation, RigItemModel};
use super::transaction::StructuralEdit;
use crate::error::{Error, Result};
use crate::rig::{Axis, FalloffId, GroupKind, ItemRef, Rig, RigDocument, RigObserver, SliderId, SplitType};

/// Registers a flat model with its document.
fn register<M: RigObserver + 'static>(document: &RigDocument, weak: &Weak<M>) -> Registration<dyn RigObserver> {
    let observer: Weak<dyn RigObserver> = weak.clone();
    document.register(observer)
}

/// Index of a shifted row, or of the synthetic row 0.
fn shifted_index(row: usize, column: usize, item: Option<ItemRef>) -> ModelIndex {
    match (row, item) {
        (0, _) => ModelIndex::synthetic(0, column),
        (_, Some(item)) => ModelIndex::new(row, column, ModelIndex::invalid(), item),
        (_, None) => ModelIndex::invalid(),
    }
}

// =============================================================================
// Slider groups
// =============================================================================

/// Read-only list of the slider groups.
pub struct GroupListModel {
    document: Arc<RigDocument>,
    signals: ModelSignals,
    _registration: Registration<dyn RigObserver>,
}

impl GroupListModel {
    pub fn new(document: Arc<RigDocument>) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| Self {
            _registration: register(&document, weak),
            document,
            signals: ModelSignals::new(),
        })
    }
}

impl ItemModel for GroupListModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() {
            return 0;
        }
        self.document.read().groups_of(GroupKind::Slider).len() + 1
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        1
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        match (self.item_from_index(index), role) {
            (Some(item), ItemRole::Display | ItemRole::Edit) => {
                ItemData::from(self.document.read().item_name(item).map(str::to_owned))
            }
            _ => ItemData::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if parent.is_valid() || column > 0 {
            return ModelIndex::invalid();
        }
        let item = row
            .checked_sub(1)
            .and_then(|r| self.document.read().groups_of(GroupKind::Slider).get(r).copied())
            .map(ItemRef::Group);
        shifted_index(row, column, item)
    }

    fn parent(&self, _index: &ModelIndex) -> ModelIndex {
        ModelIndex::invalid()
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }
}

impl RigItemModel for GroupListModel {
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
        let ItemRef::Group(id) = item else {
            return ModelIndex::invalid();
        };
        let rig = self.document.read();
        match rig.groups_of(GroupKind::Slider).iter().position(|g| *g == id) {
            Some(pos) => ModelIndex::new(pos + 1, column, ModelIndex::invalid(), item),
            None => ModelIndex::invalid(),
        }
    }
}

impl StructuralEdit for GroupListModel {
    fn append_row(&self, _parent: ItemRef) -> usize {
        self.document.read().groups_of(GroupKind::Slider).len() + 1
    }

    fn insert_parent(&self, parent: ItemRef) -> Option<ModelIndex> {
        (parent == ItemRef::Root).then(ModelIndex::invalid)
    }
}

impl RigObserver for GroupListModel {
    fn item_data_changed(&self, item: ItemRef) {
        let index = self.index_from_item(item, 0);
        if index.is_valid() {
            self.signals
                .emit_data_changed_single(index, vec![ItemRole::Display, ItemRole::Edit]);
        }
    }
}

// =============================================================================
// Falloff checks
// =============================================================================

#[derive(Default)]
struct FalloffSelection {
    sliders: Vec<SliderId>,
    /// Selected sliders subscribed to each falloff.
    checks: HashMap<FalloffId, Vec<SliderId>>,
    line: String,
}

impl FalloffSelection {
    fn rebuild_checks(&mut self, rig: &Rig) {
        self.checks.clear();
        for &slider in &self.sliders {
            let Some(prog) = rig.slider(slider).and_then(|s| rig.progression(s.prog)) else {
                continue;
            };
            for &falloff in &prog.falloffs {
                self.checks.entry(falloff).or_default().push(slider);
            }
        }
    }

    fn check_state(&self, falloff: FalloffId) -> CheckState {
        let subscribed = self.checks.get(&falloff).map_or(0, Vec::len);
        if subscribed == 0 || self.sliders.is_empty() {
            CheckState::Unchecked
        } else if subscribed == self.sliders.len() {
            CheckState::Checked
        } else {
            CheckState::PartiallyChecked
        }
    }

    fn build_line(&self, rig: &Rig) -> String {
        if self.sliders.is_empty() {
            return String::new();
        }
        let mut fulls = Vec::new();
        let mut partials = Vec::new();
        for &falloff in rig.falloffs() {
            let Some(name) = rig.falloff(falloff).map(|f| f.name.as_str()) else {
                continue;
            };
            match self.check_state(falloff) {
                CheckState::Checked => fulls.push(name),
                CheckState::PartiallyChecked => partials.push(name),
                CheckState::Unchecked => {}
            }
        }
        if partials.is_empty() {
            fulls.join(",")
        } else {
            format!("{} <<{}>>", fulls.join(","), partials.join(","))
        }
    }
}

/// The falloffs, checked according to the selected sliders.
///
/// A falloff is checked when every selected slider's progression subscribes
/// to it, unchecked when none does and partially checked otherwise. Setting
/// the check state subscribes or unsubscribes all selected sliders.
///
/// [`line`](Self::line) summarises the state as
/// `"full1,full2 <<partial1,partial2>>"`.
pub struct FalloffModel {
    document: Arc<RigDocument>,
    signals: ModelSignals,
    selection: RwLock<FalloffSelection>,
    /// Emitted with the new summary line whenever it changes.
    pub line_changed: Signal<String>,
    _registration: Registration<dyn RigObserver>,
}

impl FalloffModel {
    pub fn new(document: Arc<RigDocument>) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| Self {
            _registration: register(&document, weak),
            document,
            signals: ModelSignals::new(),
            selection: RwLock::new(FalloffSelection::default()),
            line_changed: Signal::new(),
        })
    }

    /// Replaces the slider selection and rebuilds every check.
    pub fn set_sliders(&self, sliders: Vec<SliderId>) {
        tracing::debug!(target: targets::MODEL, count = sliders.len(), "falloff selection changed");
        {
            let _bracket = self.begin_reset();
            let rig = self.document.read();
            let mut selection = self.selection.write();
            selection.sliders = sliders;
            selection.rebuild_checks(&rig);
        }
        self.rebuild_line();
    }

    /// The selected sliders.
    pub fn sliders(&self) -> Vec<SliderId> {
        self.selection.read().sliders.clone()
    }

    /// The check state of one falloff.
    pub fn falloff_state(&self, falloff: FalloffId) -> CheckState {
        self.selection.read().check_state(falloff)
    }

    /// The summary line; empty when no slider is selected.
    pub fn line(&self) -> String {
        self.selection.read().line.clone()
    }

    fn rebuild_line(&self) {
        let line = {
            let rig = self.document.read();
            let mut selection = self.selection.write();
            let line = selection.build_line(&rig);
            if line == selection.line {
                return;
            }
            selection.line = line.clone();
            line
        };
        self.line_changed.emit(line);
    }

    /// Subscribes (`Checked`) or unsubscribes (`Unchecked`) every selected
    /// slider, leaving sliders that are already in that state untouched.
    fn apply_check(&self, falloff: FalloffId, state: CheckState) -> Result<()> {
        let mut rig = self.document.write();
        let mut selection = self.selection.write();
        let progs: Vec<_> = selection
            .sliders
            .iter()
            .map(|&s| rig.slider(s).map(|s| s.prog).ok_or(Error::UnknownItem(ItemRef::Slider(s))))
            .collect::<Result<_>>()?;
        let mut changed = 0;
        for prog in progs {
            let did = match state {
                CheckState::Checked => rig.add_falloff(prog, falloff)?,
                _ => rig.remove_falloff(prog, falloff)?,
            };
            changed += usize::from(did);
        }
        selection.rebuild_checks(&rig);
        tracing::debug!(target: targets::MODEL, ?falloff, ?state, changed, "falloff toggled");
        Ok(())
    }
}

impl ItemModel for FalloffModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() {
            return 0;
        }
        self.document.read().falloffs().len() + 1
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        1
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        let Some(ItemRef::Falloff(id)) = self.item_from_index(index) else {
            return ItemData::None;
        };
        match role {
            ItemRole::Display | ItemRole::Edit => {
                ItemData::from(self.document.read().falloff(id).map(|f| f.name.clone()))
            }
            ItemRole::CheckState => self.falloff_state(id).into(),
            _ => ItemData::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if parent.is_valid() || column > 0 {
            return ModelIndex::invalid();
        }
        let item = row
            .checked_sub(1)
            .and_then(|r| self.document.read().falloffs().get(r).copied())
            .map(ItemRef::Falloff);
        shifted_index(row, column, item)
    }

    fn parent(&self, _index: &ModelIndex) -> ModelIndex {
        ModelIndex::invalid()
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, index: &ModelIndex, value: ItemData, role: ItemRole) -> bool {
        let Some(ItemRef::Falloff(id)) = self.item_from_index(index) else {
            return false;
        };
        if role != ItemRole::CheckState {
            return false;
        }
        let state = match value.as_check_state() {
            Some(state @ (CheckState::Checked | CheckState::Unchecked)) => state,
            _ => return false,
        };
        if let Err(error) = self.apply_check(id, state) {
            tracing::warn!(target: targets::MODEL, ?id, %error, "falloff toggle failed");
            return false;
        }
        self.rebuild_line();
        self.signals
            .emit_data_changed_single(index.clone(), vec![ItemRole::CheckState]);
        true
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        match self.item_from_index(index) {
            Some(_) => ItemFlags::editable().with_checkable(true).with_tristate(true),
            None => ItemFlags::enabled_only(),
        }
    }
}

impl RigItemModel for FalloffModel {
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
        let ItemRef::Falloff(id) = item else {
            return ModelIndex::invalid();
        };
        match self.document.read().falloffs().iter().position(|f| *f == id) {
            Some(pos) => ModelIndex::new(pos + 1, column, ModelIndex::invalid(), item),
            None => ModelIndex::invalid(),
        }
    }
}

impl StructuralEdit for FalloffModel {
    fn append_row(&self, _parent: ItemRef) -> usize {
        self.document.read().falloffs().len() + 1
    }

    fn insert_parent(&self, parent: ItemRef) -> Option<ModelIndex> {
        (parent == ItemRef::Root).then(ModelIndex::invalid)
    }
}

impl RigObserver for FalloffModel {
    fn item_data_changed(&self, item: ItemRef) {
        let index = self.index_from_item(item, 0);
        if index.is_valid() {
            self.rebuild_line();
            self.signals
                .emit_data_changed_single(index, vec![ItemRole::Display, ItemRole::Edit]);
        }
    }
}

// =============================================================================
// Falloff settings table
// =============================================================================

/// Column headers of the falloff settings table.
pub const FALLOFF_HEADERS: [&str; 8] = [
    "Name",
    "Split",
    "Axis",
    "Max",
    "Max Handle",
    "Min Handle",
    "Min",
    "Map",
];

/// Editable table of falloff settings, one falloff per row.
///
/// Columns follow [`FALLOFF_HEADERS`]. The split type and the axis are shown
/// as choice indexes (planar = 0, map = 1; x = 0, y = 1, z = 2) and accept
/// either an index or a name when edited. Successful edits are announced
/// through the document, so every model showing the falloff refreshes.
pub struct FalloffDataModel {
    document: Arc<RigDocument>,
    signals: ModelSignals,
    _registration: Registration<dyn RigObserver>,
}

impl FalloffDataModel {
    pub fn new(document: Arc<RigDocument>) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| Self {
            _registration: register(&document, weak),
            document,
            signals: ModelSignals::new(),
        })
    }

    fn write_cell(rig: &mut Rig, id: FalloffId, column: usize, value: &ItemData) -> Result<()> {
        let falloff = rig
            .falloff_mut(id)
            .ok_or(Error::UnknownItem(ItemRef::Falloff(id)))?;
        let number = || {
            value
                .as_float()
                .ok_or_else(|| Error::invalid_value(column, format!("expected a number, got {value:?}")))
        };
        match column {
            0 => {
                falloff.name = value
                    .as_string()
                    .ok_or_else(|| Error::invalid_value(column, "expected a name"))?
                    .to_owned();
            }
            1 => {
                falloff.split_type = choice(value, SplitType::from_index, SplitType::from_name)
                    .ok_or_else(|| Error::invalid_value(column, format!("unknown split type {value:?}")))?;
            }
            2 => {
                falloff.axis = choice(value, Axis::from_index, Axis::from_name)
                    .ok_or_else(|| Error::invalid_value(column, format!("unknown axis {value:?}")))?;
            }
            3 => falloff.max_val = number()?,
            4 => falloff.max_handle = number()?,
            5 => falloff.min_handle = number()?,
            6 => falloff.min_val = number()?,
            7 => {
                falloff.map_name = value
                    .as_string()
                    .ok_or_else(|| Error::invalid_value(column, "expected a map name"))?
                    .to_owned();
            }
            _ => return Err(Error::invalid_value(column, "no such column")),
        }
        Ok(())
    }
}

/// Resolves a choice cell given either as an index or as a name.
fn choice<T>(value: &ItemData, from_index: fn(i64) -> Option<T>, from_name: fn(&str) -> Option<T>) -> Option<T> {
    match value {
        ItemData::Int(index) => from_index(*index),
        ItemData::String(text) => text
            .trim()
            .parse()
            .ok()
            .and_then(from_index)
            .or_else(|| from_name(text.trim())),
        _ => None,
    }
}

impl ItemModel for FalloffDataModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() {
            return 0;
        }
        self.document.read().falloffs().len()
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        FALLOFF_HEADERS.len()
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        let Some(ItemRef::Falloff(id)) = self.item_from_index(index) else {
            return ItemData::None;
        };
        if !matches!(role, ItemRole::Display | ItemRole::Edit) {
            return ItemData::None;
        }
        let rig = self.document.read();
        let Some(falloff) = rig.falloff(id) else {
            return ItemData::None;
        };
        match index.column() {
            0 => falloff.name.as_str().into(),
            1 => falloff.split_type.index().into(),
            2 => falloff.axis.index().into(),
            3 => falloff.max_val.into(),
            4 => falloff.max_handle.into(),
            5 => falloff.min_handle.into(),
            6 => falloff.min_val.into(),
            7 => falloff.map_name.as_str().into(),
            _ => ItemData::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if parent.is_valid() || column >= FALLOFF_HEADERS.len() {
            return ModelIndex::invalid();
        }
        match self.document.read().falloffs().get(row) {
            Some(&id) => ModelIndex::new(row, column, ModelIndex::invalid(), ItemRef::Falloff(id)),
            None => ModelIndex::invalid(),
        }
    }

    fn parent(&self, _index: &ModelIndex) -> ModelIndex {
        ModelIndex::invalid()
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, index: &ModelIndex, value: ItemData, role: ItemRole) -> bool {
        let Some(item @ ItemRef::Falloff(id)) = self.item_from_index(index) else {
            return false;
        };
        if role != ItemRole::Edit {
            return false;
        }
        let outcome = {
            let mut rig = self.document.write();
            Self::write_cell(&mut rig, id, index.column(), &value)
        };
        match outcome {
            Ok(()) => {
                self.document.item_data_changed(item);
                true
            }
            Err(error) => {
                tracing::warn!(target: targets::MODEL, ?id, %error, "falloff edit rejected");
                false
            }
        }
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        match self.item_from_index(index) {
            Some(_) => ItemFlags::editable(),
            None => ItemFlags::enabled_only(),
        }
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> ItemData {
        match (orientation, role) {
            (Orientation::Horizontal, ItemRole::Display) => {
                ItemData::from(FALLOFF_HEADERS.get(section).copied())
            }
            _ => ItemData::None,
        }
    }
}

impl RigItemModel for FalloffDataModel {
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
        let ItemRef::Falloff(id) = item else {
            return ModelIndex::invalid();
        };
        match self.document.read().falloffs().iter().position(|f| *f == id) {
            Some(row) => ModelIndex::new(row, column, ModelIndex::invalid(), item),
            None => ModelIndex::invalid(),
        }
    }
}

impl StructuralEdit for FalloffDataModel {
    fn append_row(&self, _parent: ItemRef) -> usize {
        self.document.read().falloffs().len()
    }

    fn insert_parent(&self, parent: ItemRef) -> Option<ModelIndex> {
        (parent == ItemRef::Root).then(ModelIndex::invalid)
    }
}

impl RigObserver for FalloffDataModel {
    fn item_data_changed(&self, item: ItemRef) {
        let first = self.index_from_item(item, 0);
        if first.is_valid() {
            let last = first.at_column(FALLOFF_HEADERS.len() - 1);
            self.signals
                .emit_data_changed(first, last, vec![ItemRole::Display, ItemRole::Edit]);
        }
    }
}

static_assertions::assert_impl_all!(GroupListModel: Send, Sync);
static_assertions::assert_impl_all!(FalloffModel: Send, Sync);
static_assertions::assert_impl_all!(FalloffDataModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::Falloff;
    use parking_lot::Mutex;

    fn document() -> (Arc<RigDocument>, Vec<SliderId>, Vec<FalloffId>) {
        let mut rig = Rig::new("face");
        let brows = rig.create_group("Brows", GroupKind::Slider);
        rig.create_group("Lips", GroupKind::Slider);
        rig.create_group("Combos", GroupKind::Combo);
        let sliders: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|name| rig.create_slider(brows, name).unwrap())
            .collect();
        let left = rig.create_falloff(Falloff::planar("Left", Axis::X));
        let right = rig.create_falloff(Falloff::planar("Right", Axis::X));
        let map = rig.create_falloff(Falloff::map("Upper", "upperMap"));
        (RigDocument::new(rig), sliders, vec![left, right, map])
    }

    #[test]
    fn test_group_list_shifted_rows() {
        let (doc, _, _) = document();
        let model = GroupListModel::new(doc.clone());
        assert_eq!(model.row_count(&ModelIndex::invalid()), 3);
        let none = model.index(0, 0, &ModelIndex::invalid());
        assert!(none.is_valid());
        assert_eq!(model.item_from_index(&none), None);
        assert_eq!(model.data(&none, ItemRole::Display), ItemData::None);

        let lips = model.index(2, 0, &ModelIndex::invalid());
        assert_eq!(model.display_text(&lips).as_deref(), Some("Lips"));
        assert_eq!(model.index_from_item(lips.item().unwrap(), 0), lips);
        assert!(!model.flags(&lips).editable);
        assert!(!model.set_data(&lips, ItemData::from("x"), ItemRole::Edit));
        assert_eq!(model.append_row(ItemRef::Root), 3);
        assert!(!model.index(3, 0, &ModelIndex::invalid()).is_valid());
    }

    #[test]
    fn test_falloff_checks_and_line() {
        let (doc, sliders, falloffs) = document();
        {
            let mut rig = doc.write();
            for &s in &sliders[..2] {
                let prog = rig.slider(s).unwrap().prog;
                rig.add_falloff(prog, falloffs[0]).unwrap();
            }
            for &s in &sliders {
                let prog = rig.slider(s).unwrap().prog;
                rig.add_falloff(prog, falloffs[1]).unwrap();
            }
        }
        let model = FalloffModel::new(doc.clone());
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        model.line_changed.connect(move |line| sink.lock().push(line.clone()));

        assert_eq!(model.line(), "");
        model.set_sliders(sliders.clone());
        assert_eq!(model.falloff_state(falloffs[0]), CheckState::PartiallyChecked);
        assert_eq!(model.falloff_state(falloffs[1]), CheckState::Checked);
        assert_eq!(model.falloff_state(falloffs[2]), CheckState::Unchecked);
        assert_eq!(model.line(), "Right <<Left>>");

        let left = model.index_from_item(falloffs[0].into(), 0);
        assert_eq!(left.row(), 1);
        assert!(model.set_check_state(&left, CheckState::Checked));
        assert_eq!(model.check_state(&left), Some(CheckState::Checked));
        assert_eq!(model.line(), "Left,Right");
        assert!(model.set_check_state(&left, CheckState::Unchecked));
        assert!(doc.read().falloff_subscribers(falloffs[0]).is_empty());
        assert!(!model.set_check_state(&left, CheckState::PartiallyChecked));
        assert_eq!(*lines.lock(), vec!["Right <<Left>>", "Left,Right", "Right"]);
    }

    #[test]
    fn test_falloff_data_edits() {
        let (doc, _, falloffs) = document();
        let model = FalloffDataModel::new(doc.clone());
        let picker = FalloffModel::new(doc.clone());
        let picked = Arc::new(Mutex::new(0));
        let counter = picked.clone();
        picker.signals().data_changed.connect(move |_| *counter.lock() += 1);

        assert_eq!(model.row_count(&ModelIndex::invalid()), 3);
        let map = model.index(2, 0, &ModelIndex::invalid());
        assert_eq!(model.data(&map.at_column(1), ItemRole::Display), ItemData::Int(1));
        assert_eq!(model.display_text(&map.at_column(7)).as_deref(), Some("upperMap"));

        assert!(model.set_data(&map.at_column(2), ItemData::from("z"), ItemRole::Edit));
        assert!(model.set_data(&map.at_column(1), ItemData::Int(0), ItemRole::Edit));
        assert!(model.set_data(&map.at_column(3), ItemData::from("0.5"), ItemRole::Edit));
        assert!(model.set_data(&map, ItemData::from("Top"), ItemRole::Edit));
        assert!(!model.set_data(&map.at_column(2), ItemData::Int(5), ItemRole::Edit));
        assert!(!model.set_data(&map.at_column(4), ItemData::from("wide"), ItemRole::Edit));

        let rig = doc.read();
        let falloff = rig.falloff(falloffs[2]).unwrap();
        assert_eq!(falloff.axis, Axis::Z);
        assert_eq!(falloff.split_type, SplitType::Planar);
        assert_eq!(falloff.max_val, 0.5);
        assert_eq!(falloff.name, "Top");
        drop(rig);
        assert_eq!(*picked.lock(), 4);
        assert_eq!(
            model.header_data(4, Orientation::Horizontal, ItemRole::Display).as_string(),
            Some("Max Handle")
        );
    }
}
