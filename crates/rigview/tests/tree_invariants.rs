//! Structural laws of the rig tree model.

mod common;

use common::{Face, setup};
use rigview::model::{
    ItemModel, ItemRole, ModelIndex, PROGRESSION_LABEL, RigItemModel, RigTreeModel, StructuralEdit,
};
use rigview::rig::{ItemRef, TravUsage};

/// Collects every column-0 index below `parent`, depth first.
fn walk(model: &RigTreeModel, parent: &ModelIndex, out: &mut Vec<ModelIndex>) {
    for row in 0..model.row_count(parent) {
        let index = model.index(row, 0, parent);
        out.push(index.clone());
        walk(model, &index, out);
    }
}

#[test]
fn test_index_parent_and_item_laws() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());

    let mut all = Vec::new();
    walk(&model, &ModelIndex::invalid(), &mut all);
    // root, 4 groups, 4 sliders with 9 shapes, 2 combos with 2 pairs and a
    // progression of 2 shapes each, 1 traversal with 3 rows and no shapes.
    assert_eq!(all.len(), 1 + 4 + 4 + 9 + 2 * (1 + 2 + 1 + 2) + 1 + 3);

    for index in &all {
        assert!(index.is_valid());
        let parent = model.parent(index);
        assert_eq!(model.index(index.row(), 0, &parent), *index);
        let item = model.item_from_index(index).unwrap();
        assert_eq!(model.index_from_item(item, 0), *index);
        assert_eq!(model.index_from_item(item, 2).row(), index.row());
    }
}

#[test]
fn test_top_level_is_single_root() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());

    assert_eq!(model.row_count(&ModelIndex::invalid()), 1);
    assert_eq!(model.column_count(&ModelIndex::invalid()), 3);
    let root = model.index(0, 0, &ModelIndex::invalid());
    let names: Vec<_> = (0..model.row_count(&root))
        .map(|row| model.display_text(&model.index(row, 0, &root)).unwrap())
        .collect();
    assert_eq!(names, ["Brows", "Mouth", "Combos", "Travs"]);
}

#[test]
fn test_combo_progression_stays_last() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());
    let combo = ItemRef::Combo(face.up_in);

    let index = model.index_from_item(combo, 0);
    assert_eq!(model.row_count(&index), 3);
    let prog = model.index(2, 0, &index);
    assert_eq!(model.display_text(&prog).as_deref(), Some(PROGRESSION_LABEL));
    assert_eq!(model.row_count(&prog), 2);

    let smile = face.smile;
    let pair = model
        .insert_item(combo, None, |rig| rig.add_combo_pair(face.up_in, smile, 0.5, None))
        .unwrap();
    let index = model.index_from_item(combo, 0);
    assert_eq!(model.row_count(&index), 4);
    assert_eq!(model.index_from_item(pair.into(), 0).row(), 2);
    assert_eq!(model.display_text(&model.index(2, 0, &index)).as_deref(), Some("smile"));
    assert_eq!(model.display_text(&model.index(3, 0, &index)).as_deref(), Some(PROGRESSION_LABEL));
    assert_eq!(model.append_row(combo), 3);
}

#[test]
fn test_slider_shows_shapes_directly() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());

    let slider = model.index_from_item(face.brow_up.into(), 0);
    assert_eq!(model.row_count(&slider), 3);
    let shape = model.index(2, 0, &slider);
    assert_eq!(model.display_text(&shape).as_deref(), Some("browUp_full"));
    assert_eq!(model.parent(&shape), slider);

    let prog = face.doc.read().slider(face.brow_up).unwrap().prog;
    assert!(!model.index_from_item(ItemRef::Progression(prog), 0).is_valid());
}

#[test]
fn test_only_the_name_column_has_children() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());

    let slider = model.index_from_item(face.brow_up.into(), 0);
    let combo = model.index_from_item(face.up_in.into(), 0);
    assert_eq!(model.row_count(&slider), 3);
    assert_eq!(model.row_count(&slider.at_column(1)), 0);
    assert_eq!(model.row_count(&combo.at_column(2)), 0);
    assert_eq!(model.row_count(&model.index_from_item(face.brow_up.into(), 1)), 0);
}

#[test]
fn test_traversal_rows() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());

    let trav = model.index_from_item(face.brow_trav.into(), 0);
    assert_eq!(model.row_count(&trav), 3);
    let progress = model.index(0, 0, &trav);
    let multiplier = model.index(1, 0, &trav);
    assert_eq!(model.display_text(&progress).as_deref(), Some("browUp"));
    assert_eq!(model.display_text(&multiplier).as_deref(), Some("browIn"));
    assert_eq!(
        model.data(&multiplier.at_column(2), ItemRole::Display).as_string(),
        Some(TravUsage::Multiplier.as_str())
    );
    assert_eq!(model.data(&progress.at_column(1), ItemRole::Display).as_float(), Some(1.0));
    let prog = model.index(2, 0, &trav);
    assert_eq!(model.display_text(&prog).as_deref(), Some(PROGRESSION_LABEL));
    assert!(!model.index(3, 0, &trav).is_valid());
}

#[test]
fn test_stale_items_resolve_to_invalid() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());

    let item = ItemRef::Slider(face.brow_down);
    model
        .remove_item(item, |rig| rig.remove_control(item))
        .unwrap();
    assert!(!model.index_from_item(item, 0).is_valid());
    let brows = model.index_from_item(face.brows.into(), 0);
    assert_eq!(model.row_count(&brows), 2);
    assert!(!model.index(2, 0, &brows).is_valid());
}
