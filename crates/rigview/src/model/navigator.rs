//! Hierarchy navigation over a rig.
//!
//! The navigator answers the four structural questions every model is built
//! on: an item's row, its parent, its child at a row, and its child count.
//! Nothing is cached; every answer is read from the rig at call time.
//!
//! Tree shape:
//!
//! ```text
//! (top)                 1 row: the rig root
//! Root                  slider groups, then combo groups, then traversal groups
//! Group                 its controls
//! Slider                its progression's shapes (the progression itself is not a row)
//! Combo                 its pairs, then its progression at row = pair count
//! Traversal             progress pair, multiplier pair, progression (always 3)
//! Progression           its shapes
//! ```
//!
//! Falloffs live outside the tree and are shown by the flat falloff models.

use rigview_core::logging::targets;

use crate::rig::{ItemRef, Rig};

/// Read-only structural queries over a borrowed rig.
#[derive(Clone, Copy)]
pub struct Navigator<'a> {
    rig: &'a Rig,
}

impl<'a> Navigator<'a> {
    /// Creates a navigator over `rig`.
    pub fn new(rig: &'a Rig) -> Self {
        Self { rig }
    }

    /// The rig being navigated.
    pub fn rig(&self) -> &'a Rig {
        self.rig
    }

    /// Returns the child of `parent` at `row`.
    ///
    /// `None` as the parent is the top level, whose single row is the root.
    pub fn child(&self, parent: Option<ItemRef>, row: usize) -> Option<ItemRef> {
        let rig = self.rig;
        let Some(parent) = parent else {
            return (row == 0).then_some(ItemRef::Root);
        };
        match parent {
            ItemRef::Root => rig.all_groups().nth(row).map(ItemRef::Group),
            ItemRef::Group(id) => rig.group(id)?.items.get(row).copied(),
            ItemRef::Slider(id) => {
                let prog = rig.progression(rig.slider(id)?.prog)?;
                prog.pairs.get(row).copied().map(ItemRef::ProgPair)
            }
            ItemRef::Combo(id) => {
                let combo = rig.combo(id)?;
                if row == combo.pairs.len() {
                    Some(ItemRef::Progression(combo.prog))
                } else {
                    combo.pairs.get(row).copied().map(ItemRef::ComboPair)
                }
            }
            ItemRef::Traversal(id) => {
                let trav = rig.traversal(id)?;
                match row {
                    0 => Some(ItemRef::TravPair(trav.progress)),
                    1 => Some(ItemRef::TravPair(trav.multiplier)),
                    2 => Some(ItemRef::Progression(trav.prog)),
                    _ => None,
                }
            }
            ItemRef::Progression(id) => rig.progression(id)?.pairs.get(row).copied().map(ItemRef::ProgPair),
            ItemRef::ComboPair(_) | ItemRef::TravPair(_) | ItemRef::ProgPair(_) | ItemRef::Falloff(_) => None,
        }
    }

    /// Returns the row of `item` under its parent.
    ///
    /// `None` means "no row": the item is dead, is not part of the tree, or is
    /// missing from the collection that should hold it.
    pub fn row(&self, item: ItemRef) -> Option<usize> {
        let rig = self.rig;
        let row = match item {
            ItemRef::Root => Some(0),
            ItemRef::Group(id) => {
                rig.group(id)?;
                rig.all_groups().position(|g| g == id)
            }
            ItemRef::Slider(_) | ItemRef::Combo(_) | ItemRef::Traversal(_) => {
                let group = rig.group(rig.control_group(item)?)?;
                group.items.iter().position(|i| *i == item)
            }
            ItemRef::ComboPair(id) => {
                let combo = rig.combo(rig.combo_pair(id)?.combo)?;
                combo.pairs.iter().position(|p| *p == id)
            }
            ItemRef::TravPair(id) => {
                let pair = rig.trav_pair(id)?;
                let trav = rig.traversal(pair.traversal)?;
                // A pair occupies the slot of its usage, independent of storage order.
                let slot = match pair.usage.index() {
                    0 => trav.progress,
                    _ => trav.multiplier,
                };
                (slot == id).then(|| pair.usage.index())
            }
            ItemRef::Progression(id) => {
                let prog = rig.progression(id)?;
                match prog.controller {
                    ItemRef::Combo(cid) => {
                        let combo = rig.combo(cid)?;
                        (combo.prog == id).then_some(combo.pairs.len())
                    }
                    ItemRef::Traversal(tid) => (rig.traversal(tid)?.prog == id).then_some(2),
                    _ => return None,
                }
            }
            ItemRef::ProgPair(id) => {
                let prog = rig.progression(rig.prog_pair(id)?.prog)?;
                prog.pairs.iter().position(|p| *p == id)
            }
            ItemRef::Falloff(_) => return None,
        };
        if row.is_none() {
            tracing::warn!(target: targets::MODEL, ?item, "item missing from its parent collection");
        }
        row
    }

    /// Returns the parent of `item`; `None` for the root and for items
    /// outside the tree.
    pub fn parent(&self, item: ItemRef) -> Option<ItemRef> {
        let rig = self.rig;
        match item {
            ItemRef::Root | ItemRef::Falloff(_) => None,
            ItemRef::Group(_) => Some(ItemRef::Root),
            ItemRef::Slider(_) | ItemRef::Combo(_) | ItemRef::Traversal(_) => {
                rig.control_group(item).map(ItemRef::Group)
            }
            ItemRef::ComboPair(id) => rig.combo_pair(id).map(|p| ItemRef::Combo(p.combo)),
            ItemRef::TravPair(id) => rig.trav_pair(id).map(|p| ItemRef::Traversal(p.traversal)),
            ItemRef::Progression(id) => rig.progression(id).map(|p| p.controller),
            ItemRef::ProgPair(id) => {
                let prog_id = rig.prog_pair(id)?.prog;
                match rig.progression(prog_id)?.controller {
                    slider @ ItemRef::Slider(_) => Some(slider),
                    _ => Some(ItemRef::Progression(prog_id)),
                }
            }
        }
    }

    /// Returns the number of children of `parent` (`None` = top level).
    pub fn child_count(&self, parent: Option<ItemRef>) -> usize {
        let rig = self.rig;
        let Some(parent) = parent else {
            return 1;
        };
        match parent {
            ItemRef::Root => rig.group_count(),
            ItemRef::Group(id) => rig.group(id).map_or(0, |g| g.items.len()),
            ItemRef::Slider(id) => rig
                .slider(id)
                .and_then(|s| rig.progression(s.prog))
                .map_or(0, |p| p.pairs.len()),
            ItemRef::Combo(id) => rig.combo(id).map_or(0, |c| c.pairs.len() + 1),
            ItemRef::Traversal(id) => {
                if rig.traversal(id).is_some() {
                    3
                } else {
                    0
                }
            }
            ItemRef::Progression(id) => rig.progression(id).map_or(0, |p| p.pairs.len()),
            ItemRef::ComboPair(_) | ItemRef::TravPair(_) | ItemRef::ProgPair(_) | ItemRef::Falloff(_) => 0,
        }
    }

    /// The item whose row shows the children of `item`.
    ///
    /// A slider's progression has no row of its own; its shapes sit under the
    /// slider. Every other item shows its own children.
    pub fn shown_parent(&self, item: ItemRef) -> ItemRef {
        match item {
            ItemRef::Progression(id) => match self.rig.progression(id).map(|p| p.controller) {
                Some(slider @ ItemRef::Slider(_)) => slider,
                _ => item,
            },
            _ => item,
        }
    }

    /// The row a new child of `parent` lands on when no row is given.
    ///
    /// Combos append before their trailing progression row.
    pub fn append_row(&self, parent: ItemRef) -> usize {
        match self.shown_parent(parent) {
            ItemRef::Combo(id) => self.rig.combo(id).map_or(0, |c| c.pairs.len()),
            shown => self.child_count(Some(shown)),
        }
    }
}
