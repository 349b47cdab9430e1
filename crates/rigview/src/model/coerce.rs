//! Selection coercion.
//!
//! Views let users select rows at any depth: a group, a few sliders, a shape.
//! Editing tools usually want one kind of item, so these helpers translate a
//! mixed selection into indexes of a single kind by climbing to ancestors or
//! descending to descendants. Depth means the *class depth* of the item kind
//! ([`ItemKind::class_depth`]), not the tree depth of a particular index.

use std::collections::HashSet;

use super::index::ModelIndex;
use super::traits::RigItemModel;
use crate::rig::ItemKind;

fn class_depth<M: RigItemModel + ?Sized>(model: &M, index: &ModelIndex) -> Option<usize> {
    model.item_from_index(index).map(|item| item.class_depth())
}

fn dedup(indexes: Vec<ModelIndex>) -> Vec<ModelIndex> {
    let mut seen = HashSet::with_capacity(indexes.len());
    indexes
        .into_iter()
        .filter(|index| seen.insert(index.clone()))
        .collect()
}

/// Coerces a selection to indexes of `kind`.
///
/// Shallower items expand to all their descendants of that kind, deeper items
/// climb to their ancestor of that kind, items of the target depth pass
/// through. The result is de-duplicated, first occurrence first.
pub fn coerce_index_to_type<M: RigItemModel + ?Sized>(
    model: &M,
    indexes: &[ModelIndex],
    kind: ItemKind,
) -> Vec<ModelIndex> {
    let target = kind.class_depth();
    let mut out = Vec::new();
    let mut parents = Vec::new();
    let mut children = Vec::new();
    for index in indexes {
        match class_depth(model, index) {
            Some(depth) if depth < target => parents.push(index.clone()),
            Some(depth) if depth > target => children.push(index.clone()),
            Some(_) => out.push(index.clone()),
            None => {}
        }
    }
    out.extend(coerce_index_to_child_type(model, &parents, kind));
    out.extend(coerce_index_to_parent_type(model, &children, kind));
    dedup(out)
}

/// Expands every index shallower than `kind` into all its descendants at the
/// target depth. Indexes already at the target depth pass through; deeper
/// ones are dropped.
pub fn coerce_index_to_child_type<M: RigItemModel + ?Sized>(
    model: &M,
    indexes: &[ModelIndex],
    kind: ItemKind,
) -> Vec<ModelIndex> {
    let target = kind.class_depth();
    let mut out = Vec::new();
    for index in indexes {
        match class_depth(model, index) {
            Some(depth) if depth < target => {
                let mut queue = vec![index.at_column(0)];
                while let Some(current) = queue.pop() {
                    match class_depth(model, &current) {
                        Some(depth) if depth < target => {
                            let count = model.row_count(&current);
                            // Reverse push keeps descendants in row order.
                            for row in (0..count).rev() {
                                let child = model.index(row, 0, &current);
                                if child.is_valid() {
                                    queue.push(child);
                                }
                            }
                        }
                        Some(depth) if depth == target => out.push(current),
                        _ => {}
                    }
                }
            }
            Some(depth) if depth == target => out.push(index.clone()),
            _ => {}
        }
    }
    dedup(out)
}

/// Climbs every index deeper than `kind` to its ancestor at the target depth.
///
/// Indexes whose climb skips over the target depth are dropped; indexes
/// already at the target depth pass through.
pub fn coerce_index_to_parent_type<M: RigItemModel + ?Sized>(
    model: &M,
    indexes: &[ModelIndex],
    kind: ItemKind,
) -> Vec<ModelIndex> {
    let target = kind.class_depth();
    let mut out = Vec::new();
    for index in indexes {
        let mut current = index.clone();
        let mut depth = class_depth(model, &current);
        while let Some(d) = depth
            && d > target
        {
            current = model.parent(&current);
            depth = class_depth(model, &current);
        }
        if depth == Some(target) {
            out.push(current);
        }
    }
    dedup(out)
}

/// Reduces a selection to its topmost indexes.
///
/// Only column-0 indexes are considered. An index is kept if none of its
/// ancestors is also in the selection.
pub fn coerce_index_to_roots(indexes: &[ModelIndex]) -> Vec<ModelIndex> {
    let mut candidates: Vec<ModelIndex> = indexes
        .iter()
        .filter(|index| index.is_valid() && index.column() == 0)
        .cloned()
        .collect();
    candidates.sort();
    candidates.dedup();

    let selected: HashSet<&ModelIndex> = candidates.iter().collect();
    candidates
        .iter()
        .filter(|index| !index.ancestors().iter().any(|a| selected.contains(a)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemModel, RigTreeModel};
    use crate::rig::{GroupKind, ItemRef, Rig, RigDocument};
    use std::sync::Arc;

    fn model() -> (Arc<RigTreeModel>, ItemRef) {
        let mut rig = Rig::new("face");
        let g = rig.create_group("Brows", GroupKind::Slider);
        for (name, shapes) in [("browUp", 3), ("browDown", 2)] {
            let s = rig.create_slider(g, name).unwrap();
            let prog = rig.slider(s).unwrap().prog;
            for i in 0..shapes {
                rig.add_prog_pair(prog, format!("{name}_{i}"), i as f64, i == 0)
                    .unwrap();
            }
        }
        (RigTreeModel::new(RigDocument::new(rig)), ItemRef::Group(g))
    }

    #[test]
    fn test_group_to_shapes() {
        let (model, group) = model();
        let group_index = model.index_from_item(group, 0);
        let shapes = coerce_index_to_type(&*model, &[group_index], ItemKind::ProgPair);
        assert_eq!(shapes.len(), 5);
        assert!(shapes
            .iter()
            .all(|i| matches!(model.item_from_index(i), Some(ItemRef::ProgPair(_)))));
    }

    #[test]
    fn test_shapes_to_sliders_dedup() {
        let (model, group) = model();
        let group_index = model.index_from_item(group, 0);
        let slider = model.index(0, 0, &group_index);
        let shapes: Vec<_> = (0..3).map(|r| model.index(r, 0, &slider)).collect();
        let sliders = coerce_index_to_type(&*model, &shapes, ItemKind::Slider);
        assert_eq!(sliders, vec![slider]);
    }

    #[test]
    fn test_parent_climb_skipping_target_is_dropped() {
        let (model, group) = model();
        let group_index = model.index_from_item(group, 0);
        let shape = model.index(0, 0, &model.index(0, 0, &group_index));
        // Slider shapes climb straight to the slider, never through a progression.
        assert!(coerce_index_to_parent_type(&*model, &[shape], ItemKind::Progression).is_empty());
    }

    #[test]
    fn test_roots() {
        let (model, group) = model();
        let group_index = model.index_from_item(group, 0);
        let slider = model.index(1, 0, &group_index);
        let shape = model.index(0, 0, &slider);
        let roots = coerce_index_to_roots(&[shape.clone(), slider.clone(), slider.at_column(1)]);
        assert_eq!(roots, vec![slider]);

        let roots = coerce_index_to_roots(&[group_index.clone(), model.index(0, 0, &group_index)]);
        assert_eq!(roots, vec![group_index]);
        assert_eq!(coerce_index_to_roots(&[shape.clone()]), vec![shape]);
    }
}
