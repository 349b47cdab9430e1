//! The rig domain arena.
//!
//! A [`Rig`] owns every item of a blendshape rig in typed `slotmap` arenas and
//! keeps the ordered collections that give the hierarchy its shape: three
//! group lists (one per [`GroupKind`]), group members, combo pairs,
//! progression targets and the falloff list. Items refer to their owners by
//! handle, never by pointer.
//!
//! The model layer only reads a rig through the navigator and writes to it
//! through the explicit edit paths; structural edits are performed by callers
//! inside the model's change brackets.
//!
//! # Example
//!
//! ```
//! use rigview::rig::{GroupKind, Rig};
//!
//! let mut rig = Rig::new("face");
//! let brows = rig.create_group("Brows", GroupKind::Slider);
//! let raise = rig.create_slider(brows, "browRaise").unwrap();
//! let prog = rig.slider(raise).unwrap().prog;
//! rig.add_prog_pair(prog, "browRaise_rest", 0.0, true).unwrap();
//! rig.add_prog_pair(prog, "browRaise_full", 1.0, false).unwrap();
//! assert_eq!(rig.progression(prog).unwrap().pairs.len(), 2);
//! ```

mod document;
mod items;

use slotmap::SlotMap;

pub use document::{RigDocument, RigObserver, WeightSink};
pub use items::{
    Axis, Combo, ComboId, ComboPair, ComboPairId, Falloff, FalloffId, Group, GroupId, GroupKind,
    ItemKind, ItemRef, ProgPair, ProgPairId, Progression, ProgressionId, Slider, SliderId,
    SplitType, TravPair, TravPairId, TravUsage, Traversal, TraversalId,
};

use crate::error::{Error, Result};
use rigview_core::logging::targets;

/// The root of a rig: owns every item and the ordered collections.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    name: String,
    slider_groups: Vec<GroupId>,
    combo_groups: Vec<GroupId>,
    traversal_groups: Vec<GroupId>,
    falloff_order: Vec<FalloffId>,
    groups: SlotMap<GroupId, Group>,
    sliders: SlotMap<SliderId, Slider>,
    combos: SlotMap<ComboId, Combo>,
    traversals: SlotMap<TraversalId, Traversal>,
    combo_pairs: SlotMap<ComboPairId, ComboPair>,
    trav_pairs: SlotMap<TravPairId, TravPair>,
    progressions: SlotMap<ProgressionId, Progression>,
    prog_pairs: SlotMap<ProgPairId, ProgPair>,
    falloffs: SlotMap<FalloffId, Falloff>,
}

impl Rig {
    /// Creates an empty rig.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The rig name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn slider(&self, id: SliderId) -> Option<&Slider> {
        self.sliders.get(id)
    }

    pub fn combo(&self, id: ComboId) -> Option<&Combo> {
        self.combos.get(id)
    }

    pub fn traversal(&self, id: TraversalId) -> Option<&Traversal> {
        self.traversals.get(id)
    }

    pub fn combo_pair(&self, id: ComboPairId) -> Option<&ComboPair> {
        self.combo_pairs.get(id)
    }

    pub fn trav_pair(&self, id: TravPairId) -> Option<&TravPair> {
        self.trav_pairs.get(id)
    }

    pub fn progression(&self, id: ProgressionId) -> Option<&Progression> {
        self.progressions.get(id)
    }

    pub fn prog_pair(&self, id: ProgPairId) -> Option<&ProgPair> {
        self.prog_pairs.get(id)
    }

    pub fn falloff(&self, id: FalloffId) -> Option<&Falloff> {
        self.falloffs.get(id)
    }

    /// The groups of one kind, in order.
    pub fn groups_of(&self, kind: GroupKind) -> &[GroupId] {
        match kind {
            GroupKind::Slider => &self.slider_groups,
            GroupKind::Combo => &self.combo_groups,
            GroupKind::Traversal => &self.traversal_groups,
        }
    }

    /// All groups, slider groups first, then combo groups, then traversal groups.
    pub fn all_groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.slider_groups
            .iter()
            .chain(&self.combo_groups)
            .chain(&self.traversal_groups)
            .copied()
    }

    /// Total number of groups of every kind.
    pub fn group_count(&self) -> usize {
        self.slider_groups.len() + self.combo_groups.len() + self.traversal_groups.len()
    }

    /// The falloffs, in order.
    pub fn falloffs(&self) -> &[FalloffId] {
        &self.falloff_order
    }

    /// Returns `true` if `item` names a live item of this rig.
    pub fn contains(&self, item: ItemRef) -> bool {
        match item {
            ItemRef::Root => true,
            ItemRef::Group(id) => self.groups.contains_key(id),
            ItemRef::Slider(id) => self.sliders.contains_key(id),
            ItemRef::Combo(id) => self.combos.contains_key(id),
            ItemRef::Traversal(id) => self.traversals.contains_key(id),
            ItemRef::ComboPair(id) => self.combo_pairs.contains_key(id),
            ItemRef::TravPair(id) => self.trav_pairs.contains_key(id),
            ItemRef::Progression(id) => self.progressions.contains_key(id),
            ItemRef::ProgPair(id) => self.prog_pairs.contains_key(id),
            ItemRef::Falloff(id) => self.falloffs.contains_key(id),
        }
    }

    /// The display name of any item.
    ///
    /// Pairs are named after the control they reference.
    pub fn item_name(&self, item: ItemRef) -> Option<&str> {
        match item {
            ItemRef::Root => Some(&self.name),
            ItemRef::Group(id) => self.groups.get(id).map(|g| g.name.as_str()),
            ItemRef::Slider(id) => self.sliders.get(id).map(|s| s.name.as_str()),
            ItemRef::Combo(id) => self.combos.get(id).map(|c| c.name.as_str()),
            ItemRef::Traversal(id) => self.traversals.get(id).map(|t| t.name.as_str()),
            ItemRef::ComboPair(id) => {
                let pair = self.combo_pairs.get(id)?;
                self.item_name(ItemRef::Slider(pair.slider))
            }
            ItemRef::TravPair(id) => {
                let pair = self.trav_pairs.get(id)?;
                self.item_name(pair.control)
            }
            ItemRef::Progression(id) => self.progressions.get(id).map(|p| p.name.as_str()),
            ItemRef::ProgPair(id) => self.prog_pairs.get(id).map(|p| p.name.as_str()),
            ItemRef::Falloff(id) => self.falloffs.get(id).map(|f| f.name.as_str()),
        }
    }

    /// The enabled flag of a control.
    pub fn item_enabled(&self, item: ItemRef) -> Option<bool> {
        match item {
            ItemRef::Slider(id) => self.sliders.get(id).map(|s| s.enabled),
            ItemRef::Combo(id) => self.combos.get(id).map(|c| c.enabled),
            ItemRef::Traversal(id) => self.traversals.get(id).map(|t| t.enabled),
            _ => None,
        }
    }

    /// The numeric value of a slider, pair or shape target.
    pub fn item_value(&self, item: ItemRef) -> Option<f64> {
        match item {
            ItemRef::Slider(id) => self.sliders.get(id).map(|s| s.value),
            ItemRef::ComboPair(id) => self.combo_pairs.get(id).map(|p| p.value),
            ItemRef::TravPair(id) => self.trav_pairs.get(id).map(|p| p.value),
            ItemRef::ProgPair(id) => self.prog_pairs.get(id).map(|p| p.value),
            _ => None,
        }
    }

    /// The progression owned by a control.
    pub fn control_prog(&self, item: ItemRef) -> Option<ProgressionId> {
        match item {
            ItemRef::Slider(id) => self.sliders.get(id).map(|s| s.prog),
            ItemRef::Combo(id) => self.combos.get(id).map(|c| c.prog),
            ItemRef::Traversal(id) => self.traversals.get(id).map(|t| t.prog),
            _ => None,
        }
    }

    /// The sliders a combo depends on, in pair order.
    pub fn combo_sliders(&self, id: ComboId) -> Vec<SliderId> {
        self.combos
            .get(id)
            .map(|combo| {
                combo
                    .pairs
                    .iter()
                    .filter_map(|pid| self.combo_pairs.get(*pid))
                    .map(|pair| pair.slider)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Finds a slider by name, searching the slider groups in order.
    pub fn slider_by_name(&self, name: &str) -> Option<SliderId> {
        self.slider_groups
            .iter()
            .filter_map(|g| self.groups.get(*g))
            .flat_map(|g| g.items.iter())
            .find_map(|item| match item {
                ItemRef::Slider(id) if self.sliders.get(*id).is_some_and(|s| s.name == name) => Some(*id),
                _ => None,
            })
    }

    /// The progressions subscribed to a falloff.
    pub fn falloff_subscribers(&self, id: FalloffId) -> Vec<ProgressionId> {
        self.progressions
            .iter()
            .filter(|(_, prog)| prog.falloffs.contains(&id))
            .map(|(pid, _)| pid)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Appends a new empty group of `kind`.
    pub fn create_group(&mut self, name: impl Into<String>, kind: GroupKind) -> GroupId {
        let id = self.groups.insert(Group {
            name: name.into(),
            kind,
            items: Vec::new(),
        });
        match kind {
            GroupKind::Slider => self.slider_groups.push(id),
            GroupKind::Combo => self.combo_groups.push(id),
            GroupKind::Traversal => self.traversal_groups.push(id),
        }
        tracing::debug!(target: targets::RIG, ?id, %kind, "group created");
        id
    }

    /// Appends a new slider with an empty progression to a slider group.
    pub fn create_slider(&mut self, group: GroupId, name: impl Into<String>) -> Result<SliderId> {
        self.check_group(group, GroupKind::Slider)?;
        let name = name.into();
        let prog = self.new_progression(&name);
        let id = self.sliders.insert(Slider {
            name,
            enabled: true,
            value: 0.0,
            group,
            prog,
        });
        self.attach_control(group, prog, ItemRef::Slider(id));
        Ok(id)
    }

    /// Appends a new combo with no pairs and an empty progression.
    pub fn create_combo(&mut self, group: GroupId, name: impl Into<String>) -> Result<ComboId> {
        self.check_group(group, GroupKind::Combo)?;
        let name = name.into();
        let prog = self.new_progression(&name);
        let id = self.combos.insert(Combo {
            name,
            enabled: true,
            group,
            pairs: Vec::new(),
            prog,
        });
        self.attach_control(group, prog, ItemRef::Combo(id));
        Ok(id)
    }

    /// Appends a new traversal driven by `progress` and scaled by `multiplier`.
    ///
    /// Both controls must be live sliders or combos.
    pub fn create_traversal(
        &mut self,
        group: GroupId,
        name: impl Into<String>,
        progress: ItemRef,
        multiplier: ItemRef,
    ) -> Result<TraversalId> {
        self.check_group(group, GroupKind::Traversal)?;
        for control in [progress, multiplier] {
            if !matches!(control, ItemRef::Slider(_) | ItemRef::Combo(_)) {
                return Err(Error::invalid_target(control, "traversals are driven by sliders or combos"));
            }
            if !self.contains(control) {
                return Err(Error::UnknownItem(control));
            }
        }

        let name = name.into();
        let prog = self.new_progression(&name);
        let id = self.traversals.insert(Traversal {
            name,
            enabled: true,
            group,
            progress: TravPairId::default(),
            multiplier: TravPairId::default(),
            prog,
        });
        let progress = self.trav_pairs.insert(TravPair {
            control: progress,
            value: 1.0,
            usage: TravUsage::Progress,
            traversal: id,
        });
        let multiplier = self.trav_pairs.insert(TravPair {
            control: multiplier,
            value: 1.0,
            usage: TravUsage::Multiplier,
            traversal: id,
        });
        if let Some(trav) = self.traversals.get_mut(id) {
            trav.progress = progress;
            trav.multiplier = multiplier;
        }
        self.attach_control(group, prog, ItemRef::Traversal(id));
        Ok(id)
    }

    /// Adds a `(slider, value)` pair to a combo at `row`, or appends it.
    pub fn add_combo_pair(
        &mut self,
        combo: ComboId,
        slider: SliderId,
        value: f64,
        row: Option<usize>,
    ) -> Result<ComboPairId> {
        if !self.sliders.contains_key(slider) {
            return Err(Error::UnknownItem(ItemRef::Slider(slider)));
        }
        if self.combo_sliders(combo).contains(&slider) {
            return Err(Error::Duplicate {
                item: ItemRef::Slider(slider),
                owner: ItemRef::Combo(combo),
            });
        }
        let len = self
            .combos
            .get(combo)
            .ok_or(Error::UnknownItem(ItemRef::Combo(combo)))?
            .pairs
            .len();
        let row = row.unwrap_or(len);
        if row > len {
            return Err(Error::RowOutOfRange {
                owner: ItemRef::Combo(combo),
                row,
                len,
            });
        }

        let id = self.combo_pairs.insert(ComboPair {
            slider,
            value,
            combo,
        });
        if let Some(c) = self.combos.get_mut(combo) {
            c.pairs.insert(row, id);
        }
        Ok(id)
    }

    /// Appends a shape target to a progression.
    pub fn add_prog_pair(
        &mut self,
        prog: ProgressionId,
        name: impl Into<String>,
        value: f64,
        is_rest: bool,
    ) -> Result<ProgPairId> {
        if !self.progressions.contains_key(prog) {
            return Err(Error::UnknownItem(ItemRef::Progression(prog)));
        }
        let id = self.prog_pairs.insert(ProgPair {
            name: name.into(),
            value,
            is_rest,
            prog,
        });
        if let Some(p) = self.progressions.get_mut(prog) {
            p.pairs.push(id);
        }
        Ok(id)
    }

    /// Appends a falloff to the rig.
    pub fn create_falloff(&mut self, falloff: Falloff) -> FalloffId {
        let id = self.falloffs.insert(falloff);
        self.falloff_order.push(id);
        id
    }

    /// Subscribes a progression to a falloff.
    ///
    /// Returns `false` if it was already subscribed.
    pub fn add_falloff(&mut self, prog: ProgressionId, falloff: FalloffId) -> Result<bool> {
        if !self.falloffs.contains_key(falloff) {
            return Err(Error::UnknownItem(ItemRef::Falloff(falloff)));
        }
        let p = self
            .progressions
            .get_mut(prog)
            .ok_or(Error::UnknownItem(ItemRef::Progression(prog)))?;
        if p.falloffs.contains(&falloff) {
            return Ok(false);
        }
        p.falloffs.push(falloff);
        Ok(true)
    }

    /// Unsubscribes a progression from a falloff.
    ///
    /// Returns `false` if it was not subscribed.
    pub fn remove_falloff(&mut self, prog: ProgressionId, falloff: FalloffId) -> Result<bool> {
        let p = self
            .progressions
            .get_mut(prog)
            .ok_or(Error::UnknownItem(ItemRef::Progression(prog)))?;
        let before = p.falloffs.len();
        p.falloffs.retain(|f| *f != falloff);
        Ok(p.falloffs.len() != before)
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Removes a shape target from its progression.
    pub fn remove_prog_pair(&mut self, id: ProgPairId) -> Result<()> {
        let pair = self
            .prog_pairs
            .remove(id)
            .ok_or(Error::UnknownItem(ItemRef::ProgPair(id)))?;
        if let Some(prog) = self.progressions.get_mut(pair.prog) {
            prog.pairs.retain(|p| *p != id);
        }
        Ok(())
    }

    /// Removes a pair from its combo.
    pub fn remove_combo_pair(&mut self, id: ComboPairId) -> Result<()> {
        let pair = self
            .combo_pairs
            .remove(id)
            .ok_or(Error::UnknownItem(ItemRef::ComboPair(id)))?;
        if let Some(combo) = self.combos.get_mut(pair.combo) {
            combo.pairs.retain(|p| *p != id);
        }
        Ok(())
    }

    /// Removes a slider, combo or traversal together with everything it owns.
    ///
    /// A control that is still referenced by a combo pair or traversal pair
    /// cannot be removed; remove the referencing pairs first.
    pub fn remove_control(&mut self, item: ItemRef) -> Result<()> {
        if !item.is_control() {
            return Err(Error::invalid_target(item, "only controls can be removed from a group"));
        }
        if !self.contains(item) {
            return Err(Error::UnknownItem(item));
        }
        if let Some(user) = self.first_reference_to(item) {
            return Err(Error::invalid_target(item, format!("still referenced by {user:?}")));
        }

        let (group, prog) = match item {
            ItemRef::Slider(id) => {
                let slider = self.sliders.remove(id).ok_or(Error::UnknownItem(item))?;
                (slider.group, slider.prog)
            }
            ItemRef::Combo(id) => {
                let combo = self.combos.remove(id).ok_or(Error::UnknownItem(item))?;
                for pid in combo.pairs {
                    self.combo_pairs.remove(pid);
                }
                (combo.group, combo.prog)
            }
            ItemRef::Traversal(id) => {
                let trav = self.traversals.remove(id).ok_or(Error::UnknownItem(item))?;
                self.trav_pairs.remove(trav.progress);
                self.trav_pairs.remove(trav.multiplier);
                (trav.group, trav.prog)
            }
            _ => return Err(Error::invalid_target(item, "only controls can be removed from a group")),
        };

        if let Some(g) = self.groups.get_mut(group) {
            g.items.retain(|i| *i != item);
        }
        if let Some(p) = self.progressions.remove(prog) {
            for pid in p.pairs {
                self.prog_pairs.remove(pid);
            }
        }
        tracing::debug!(target: targets::RIG, ?item, "control removed");
        Ok(())
    }

    /// Removes an empty group.
    pub fn remove_group(&mut self, id: GroupId) -> Result<()> {
        let group = self
            .groups
            .get(id)
            .ok_or(Error::UnknownItem(ItemRef::Group(id)))?;
        if !group.items.is_empty() {
            return Err(Error::invalid_target(id, "group is not empty"));
        }
        let kind = group.kind;
        self.groups.remove(id);
        match kind {
            GroupKind::Slider => self.slider_groups.retain(|g| *g != id),
            GroupKind::Combo => self.combo_groups.retain(|g| *g != id),
            GroupKind::Traversal => self.traversal_groups.retain(|g| *g != id),
        }
        Ok(())
    }

    /// Deletes a falloff and unsubscribes every progression from it.
    pub fn delete_falloff(&mut self, id: FalloffId) -> Result<()> {
        self.falloffs
            .remove(id)
            .ok_or(Error::UnknownItem(ItemRef::Falloff(id)))?;
        self.falloff_order.retain(|f| *f != id);
        for prog in self.progressions.values_mut() {
            prog.falloffs.retain(|f| *f != id);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------------

    /// Moves a control into `dest` before `dest_row`, or to the end.
    ///
    /// `dest_row` is expressed in the destination's rows *before* the move,
    /// the same convention the move bracket reports to views.
    pub fn move_control(&mut self, item: ItemRef, dest: GroupId, dest_row: Option<usize>) -> Result<()> {
        let dest_group = self
            .groups
            .get(dest)
            .ok_or(Error::UnknownItem(ItemRef::Group(dest)))?;
        if !dest_group.kind.holds(item) {
            return Err(Error::KindMismatch {
                item,
                kind: dest_group.kind,
            });
        }
        let dest_len = dest_group.items.len();
        let dest_row = dest_row.unwrap_or(dest_len);
        if dest_row > dest_len {
            return Err(Error::RowOutOfRange {
                owner: ItemRef::Group(dest),
                row: dest_row,
                len: dest_len,
            });
        }

        let source = self.control_group(item).ok_or(Error::UnknownItem(item))?;
        let source_row = self
            .groups
            .get(source)
            .and_then(|g| g.items.iter().position(|i| *i == item))
            .ok_or(Error::UnknownItem(item))?;

        let mut insert_at = dest_row;
        if source == dest && source_row < dest_row {
            insert_at -= 1;
        }
        if let Some(g) = self.groups.get_mut(source) {
            g.items.remove(source_row);
        }
        if let Some(g) = self.groups.get_mut(dest) {
            g.items.insert(insert_at, item);
        }
        match item {
            ItemRef::Slider(id) => self.sliders[id].group = dest,
            ItemRef::Combo(id) => self.combos[id].group = dest,
            ItemRef::Traversal(id) => self.traversals[id].group = dest,
            _ => {}
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    /// Renames an item. Pair names follow their control and cannot be set.
    pub fn set_name(&mut self, item: ItemRef, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let slot = match item {
            ItemRef::Root => Some(&mut self.name),
            ItemRef::Group(id) => self.groups.get_mut(id).map(|g| &mut g.name),
            ItemRef::Slider(id) => self.sliders.get_mut(id).map(|s| &mut s.name),
            ItemRef::Combo(id) => self.combos.get_mut(id).map(|c| &mut c.name),
            ItemRef::Traversal(id) => self.traversals.get_mut(id).map(|t| &mut t.name),
            ItemRef::Progression(id) => self.progressions.get_mut(id).map(|p| &mut p.name),
            ItemRef::ProgPair(id) => self.prog_pairs.get_mut(id).map(|p| &mut p.name),
            ItemRef::Falloff(id) => self.falloffs.get_mut(id).map(|f| &mut f.name),
            ItemRef::ComboPair(_) | ItemRef::TravPair(_) => {
                return Err(Error::invalid_target(item, "pairs are named after their control"));
            }
        };
        *slot.ok_or(Error::UnknownItem(item))? = name;
        Ok(())
    }

    /// Sets the enabled flag of a control.
    pub fn set_enabled(&mut self, item: ItemRef, enabled: bool) -> Result<()> {
        let slot = match item {
            ItemRef::Slider(id) => self.sliders.get_mut(id).map(|s| &mut s.enabled),
            ItemRef::Combo(id) => self.combos.get_mut(id).map(|c| &mut c.enabled),
            ItemRef::Traversal(id) => self.traversals.get_mut(id).map(|t| &mut t.enabled),
            _ => return Err(Error::invalid_target(item, "only controls can be enabled")),
        };
        *slot.ok_or(Error::UnknownItem(item))? = enabled;
        Ok(())
    }

    /// Sets the numeric value of a slider, pair or shape target.
    pub fn set_value(&mut self, item: ItemRef, value: f64) -> Result<()> {
        let slot = match item {
            ItemRef::Slider(id) => self.sliders.get_mut(id).map(|s| &mut s.value),
            ItemRef::ComboPair(id) => self.combo_pairs.get_mut(id).map(|p| &mut p.value),
            ItemRef::TravPair(id) => self.trav_pairs.get_mut(id).map(|p| &mut p.value),
            ItemRef::ProgPair(id) => self.prog_pairs.get_mut(id).map(|p| &mut p.value),
            _ => return Err(Error::invalid_target(item, "item has no value")),
        };
        *slot.ok_or(Error::UnknownItem(item))? = value;
        Ok(())
    }

    /// Mutable access to a falloff's settings.
    pub fn falloff_mut(&mut self, id: FalloffId) -> Option<&mut Falloff> {
        self.falloffs.get_mut(id)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn check_group(&self, group: GroupId, kind: GroupKind) -> Result<()> {
        let g = self
            .groups
            .get(group)
            .ok_or(Error::UnknownItem(ItemRef::Group(group)))?;
        if g.kind != kind {
            return Err(Error::invalid_target(group, format!("expected a {kind} group, found a {} group", g.kind)));
        }
        Ok(())
    }

    fn new_progression(&mut self, control_name: &str) -> ProgressionId {
        self.progressions.insert(Progression {
            name: format!("{control_name}_prog"),
            controller: ItemRef::Root,
            pairs: Vec::new(),
            falloffs: Vec::new(),
        })
    }

    fn attach_control(&mut self, group: GroupId, prog: ProgressionId, item: ItemRef) {
        if let Some(p) = self.progressions.get_mut(prog) {
            p.controller = item;
        }
        if let Some(g) = self.groups.get_mut(group) {
            g.items.push(item);
        }
        tracing::debug!(target: targets::RIG, ?item, ?group, "control created");
    }

    pub(crate) fn control_group(&self, item: ItemRef) -> Option<GroupId> {
        match item {
            ItemRef::Slider(id) => self.sliders.get(id).map(|s| s.group),
            ItemRef::Combo(id) => self.combos.get(id).map(|c| c.group),
            ItemRef::Traversal(id) => self.traversals.get(id).map(|t| t.group),
            _ => None,
        }
    }

    fn first_reference_to(&self, item: ItemRef) -> Option<ItemRef> {
        if let ItemRef::Slider(sid) = item {
            if let Some((pid, _)) = self.combo_pairs.iter().find(|(_, p)| p.slider == sid) {
                return Some(ItemRef::ComboPair(pid));
            }
        }
        self.trav_pairs
            .iter()
            .find(|(_, p)| p.control == item)
            .map(|(pid, _)| ItemRef::TravPair(pid))
    }
}

impl WeightSink for Rig {
    fn set_sliders_weights(&mut self, updates: &[(SliderId, f64)]) -> Result<()> {
        if let Some((id, _)) = updates.iter().find(|(id, _)| !self.sliders.contains_key(*id)) {
            return Err(Error::UnknownItem(ItemRef::Slider(*id)));
        }
        for (id, value) in updates {
            self.sliders[*id].value = *value;
        }
        Ok(())
    }

    fn set_shapes_values(&mut self, updates: &[(ProgPairId, f64)]) -> Result<()> {
        if let Some((id, _)) = updates.iter().find(|(id, _)| !self.prog_pairs.contains_key(*id)) {
            return Err(Error::UnknownItem(ItemRef::ProgPair(*id)));
        }
        for (id, value) in updates {
            self.prog_pairs[*id].value = *value;
        }
        Ok(())
    }

    fn set_combos_values(&mut self, updates: &[(ComboPairId, f64)]) -> Result<()> {
        if let Some((id, _)) = updates.iter().find(|(id, _)| !self.combo_pairs.contains_key(*id)) {
            return Err(Error::UnknownItem(ItemRef::ComboPair(*id)));
        }
        for (id, value) in updates {
            self.combo_pairs[*id].value = *value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Rig, GroupId, SliderId, SliderId) {
        let mut rig = Rig::new("face");
        let brows = rig.create_group("Brows", GroupKind::Slider);
        let left = rig.create_slider(brows, "browL").unwrap();
        let right = rig.create_slider(brows, "browR").unwrap();
        (rig, brows, left, right)
    }

    #[test]
    fn test_create_controls() {
        let (mut rig, brows, left, right) = sample();
        assert_eq!(rig.group(brows).unwrap().items, vec![left.into(), right.into()]);
        assert_eq!(
            rig.progression(rig.slider(left).unwrap().prog).unwrap().controller,
            ItemRef::Slider(left)
        );

        let combos = rig.create_group("Combos", GroupKind::Combo);
        assert!(matches!(
            rig.create_slider(combos, "wrong"),
            Err(Error::InvalidTarget { .. })
        ));

        let combo = rig.create_combo(combos, "browL_browR").unwrap();
        rig.add_combo_pair(combo, left, 1.0, None).unwrap();
        rig.add_combo_pair(combo, right, 1.0, Some(0)).unwrap();
        assert_eq!(rig.combo_sliders(combo), vec![right, left]);
        assert!(matches!(
            rig.add_combo_pair(combo, left, 1.0, None),
            Err(Error::Duplicate { .. })
        ));
    }

    #[test]
    fn test_traversal_pairs() {
        let (mut rig, _, left, right) = sample();
        let travs = rig.create_group("Travs", GroupKind::Traversal);
        let trav = rig
            .create_traversal(travs, "browTrav", left.into(), right.into())
            .unwrap();
        let t = rig.traversal(trav).unwrap();
        assert_eq!(rig.trav_pair(t.progress).unwrap().usage, TravUsage::Progress);
        assert_eq!(rig.trav_pair(t.multiplier).unwrap().control, ItemRef::Slider(right));
        assert_eq!(rig.item_name(ItemRef::TravPair(t.progress)), Some("browL"));

        assert!(rig.remove_control(left.into()).is_err());
        rig.remove_control(trav.into()).unwrap();
        rig.remove_control(left.into()).unwrap();
        assert!(!rig.contains(left.into()));
    }

    #[test]
    fn test_move_control_within_group() {
        let (mut rig, brows, left, right) = sample();
        let extra = rig.create_slider(brows, "browMid").unwrap();
        rig.move_control(left.into(), brows, Some(3)).unwrap();
        assert_eq!(
            rig.group(brows).unwrap().items,
            vec![right.into(), extra.into(), left.into()]
        );

        let other = rig.create_group("Other", GroupKind::Slider);
        rig.move_control(extra.into(), other, None).unwrap();
        assert_eq!(rig.slider(extra).unwrap().group, other);
        assert_eq!(rig.group(other).unwrap().items, vec![extra.into()]);
    }

    #[test]
    fn test_falloff_subscription() {
        let (mut rig, _, left, _) = sample();
        let fo = rig.create_falloff(Falloff::planar("leftSide", Axis::X));
        let prog = rig.slider(left).unwrap().prog;
        assert!(rig.add_falloff(prog, fo).unwrap());
        assert!(!rig.add_falloff(prog, fo).unwrap());
        assert_eq!(rig.falloff_subscribers(fo), vec![prog]);
        rig.delete_falloff(fo).unwrap();
        assert!(rig.progression(prog).unwrap().falloffs.is_empty());
    }

    #[test]
    fn test_batch_setters_are_atomic() {
        let (mut rig, brows, left, _) = sample();
        let stale = rig.create_slider(brows, "temp").unwrap();
        rig.remove_control(stale.into()).unwrap();

        assert!(rig.set_sliders_weights(&[(left, 0.5), (stale, 1.0)]).is_err());
        assert_eq!(rig.slider(left).unwrap().value, 0.0);
        rig.set_sliders_weights(&[(left, 0.5)]).unwrap();
        assert_eq!(rig.item_value(left.into()), Some(0.5));
    }

    #[test]
    fn test_pair_names_are_derived() {
        let (mut rig, _, left, _) = sample();
        let combos = rig.create_group("Combos", GroupKind::Combo);
        let combo = rig.create_combo(combos, "c").unwrap();
        let pair = rig.add_combo_pair(combo, left, 1.0, None).unwrap();
        assert!(rig.set_name(pair.into(), "nope").is_err());
        rig.set_name(left.into(), "browLeft").unwrap();
        assert_eq!(rig.item_name(pair.into()), Some("browLeft"));
    }
}
