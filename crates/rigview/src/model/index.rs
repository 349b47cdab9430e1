//! Model index for addressing rig items in the tree and flat models.
//!
//! A `ModelIndex` is the bridge between view positions and domain items: it
//! carries its row, column and parent chain, plus the [`ItemRef`] it was
//! created for. Indexes compare by position *and* item, so an index built
//! before a structural edit never aliases a different item afterwards.

use std::hash::{Hash, Hasher};

use crate::rig::ItemRef;

/// A cell position: row and column under a parent index, and the rig item
/// the row shows.
///
/// Synthetic rows (the "none" entry of a picker) are valid but carry no item.
/// Indexes are snapshots. Keep the [`ItemRef`] rather than the index across
/// structural edits and resolve it again through the model.
#[derive(Clone)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    /// `None` for top-level items.
    parent: Option<Box<ModelIndex>>,
    item: Option<ItemRef>,
    valid: bool,
}

impl Default for ModelIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ModelIndex {
    /// The null index: parent of the top level, and the answer to every
    /// lookup that does not resolve.
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            parent: None,
            item: None,
            valid: false,
        }
    }

    /// An index for `item`. An invalid `parent` makes it top level.
    #[inline]
    pub fn new(row: usize, column: usize, parent: ModelIndex, item: ItemRef) -> Self {
        Self {
            row,
            column,
            parent: parent.is_valid().then(|| Box::new(parent)),
            item: Some(item),
            valid: true,
        }
    }

    /// A valid top-level index without an item.
    #[inline]
    pub fn synthetic(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            parent: None,
            item: None,
            valid: true,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Row under the parent; 0 for the invalid index.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    pub fn item(&self) -> Option<ItemRef> {
        self.item
    }

    /// The parent index; invalid at the top level.
    #[inline]
    pub fn parent(&self) -> ModelIndex {
        match &self.parent {
            Some(parent) => (**parent).clone(),
            None => ModelIndex::invalid(),
        }
    }

    #[inline]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the same index moved to another column.
    ///
    /// The item is unchanged: every column of a row names the same item.
    pub fn at_column(&self, column: usize) -> ModelIndex {
        if !self.is_valid() {
            return ModelIndex::invalid();
        }
        Self {
            column,
            ..self.clone()
        }
    }

    /// Number of ancestors; 0 at the top level.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent.as_deref();
        }
        depth
    }

    /// The ancestors, nearest first.
    pub fn ancestors(&self) -> Vec<ModelIndex> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while current.is_valid() {
            let next = current.parent();
            ancestors.push(current);
            current = next;
        }
        ancestors
    }
}

impl std::fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            f.debug_struct("ModelIndex")
                .field("row", &self.row)
                .field("column", &self.column)
                .field("depth", &self.depth())
                .field("item", &self.item)
                .finish()
        } else {
            write!(f, "ModelIndex(invalid)")
        }
    }
}

impl PartialEq for ModelIndex {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_valid(), other.is_valid()) {
            (false, false) => true,
            (true, true) => {
                self.row == other.row
                    && self.column == other.column
                    && self.item == other.item
                    && self.parent == other.parent
            }
            _ => false,
        }
    }
}

impl Eq for ModelIndex {}

impl Hash for ModelIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.row.hash(state);
            self.column.hash(state);
            self.item.hash(state);
        }
    }
}

impl PartialOrd for ModelIndex {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModelIndex {
    /// Invalid first, then shallower first, then by row, column and item.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self.is_valid(), other.is_valid()) {
            (false, false) => std::cmp::Ordering::Equal,
            (false, true) => std::cmp::Ordering::Less,
            (true, false) => std::cmp::Ordering::Greater,
            (true, true) => self
                .depth()
                .cmp(&other.depth())
                .then(self.row.cmp(&other.row))
                .then(self.column.cmp(&other.column))
                .then(self.item.cmp(&other.item))
                .then_with(|| self.parent.cmp(&other.parent)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::{GroupKind, Rig};

    fn items() -> (ItemRef, ItemRef, ItemRef) {
        let mut rig = Rig::new("face");
        let g = rig.create_group("Brows", GroupKind::Slider);
        let a = rig.create_slider(g, "a").unwrap();
        (ItemRef::Root, g.into(), a.into())
    }

    #[test]
    fn test_invalid_index() {
        let index = ModelIndex::invalid();
        assert!(!index.is_valid());
        assert_eq!(index.row(), 0);
        assert_eq!(index.item(), None);
        assert!(!index.has_parent());
        assert_eq!(index.at_column(2), ModelIndex::invalid());
    }

    #[test]
    fn test_hierarchical_index() {
        let (root, group, slider) = items();
        let root_idx = ModelIndex::new(0, 0, ModelIndex::invalid(), root);
        let group_idx = ModelIndex::new(0, 0, root_idx.clone(), group);
        let slider_idx = ModelIndex::new(0, 1, group_idx.clone(), slider);

        assert_eq!(slider_idx.depth(), 2);
        assert_eq!(slider_idx.parent(), group_idx);
        assert_eq!(slider_idx.ancestors(), vec![group_idx.clone(), root_idx.clone()]);
        assert!(root_idx.ancestors().is_empty());
        assert_eq!(slider_idx.at_column(0).item(), Some(slider));
    }

    #[test]
    fn test_equality_includes_item() {
        let (root, group, _) = items();
        let a = ModelIndex::new(0, 0, ModelIndex::invalid(), root);
        let b = ModelIndex::new(0, 0, ModelIndex::invalid(), group);
        assert_ne!(a, b);
        assert_eq!(ModelIndex::invalid(), ModelIndex::invalid());
        assert_ne!(ModelIndex::synthetic(0, 0), ModelIndex::invalid());
    }

    #[test]
    fn test_ordering() {
        let (root, group, _) = items();
        let top = ModelIndex::new(0, 0, ModelIndex::invalid(), root);
        let child = ModelIndex::new(0, 0, top.clone(), group);
        assert!(ModelIndex::invalid() < top);
        assert!(top < child);
        assert!(child < ModelIndex::new(1, 0, top, group));
    }
}
