//! Begin/end change notifications around structural edits.

mod common;

use std::sync::Arc;

use common::{Face, setup};
use parking_lot::Mutex;
use rigview::Error;
use rigview::model::{
    GroupListModel, ItemModel, ModelIndex, RigItemModel, RigTreeModel, RigView, StructuralEdit,
};
use rigview::rig::{GroupKind, ItemRef};

/// Records `(event, row, parent row count at emit time)` for inserts and removes.
fn record_rows(model: &Arc<RigTreeModel>) -> Arc<Mutex<Vec<(&'static str, usize, usize)>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let signals = model.signals();
    for (name, signal) in [
        ("about_insert", &signals.rows_about_to_be_inserted),
        ("inserted", &signals.rows_inserted),
        ("about_remove", &signals.rows_about_to_be_removed),
        ("removed", &signals.rows_removed),
    ] {
        let sink = events.clone();
        let weak = Arc::downgrade(model);
        signal.connect(move |(parent, first, _last): &(ModelIndex, usize, usize)| {
            let count = weak.upgrade().map_or(0, |m| m.row_count(parent));
            sink.lock().push((name, *first, count));
        });
    }
    events
}

#[test]
fn test_insert_bracket_sees_old_then_new_shape() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());
    let events = record_rows(&model);

    let brows = face.brows;
    let slider = model
        .insert_item(brows.into(), None, |rig| rig.create_slider(brows, "browOut"))
        .unwrap();
    assert_eq!(*events.lock(), vec![("about_insert", 3, 3), ("inserted", 3, 4)]);
    assert_eq!(model.index_from_item(slider.into(), 0).row(), 3);
}

/// Counts every insert, remove and move notification of `model`.
fn count_structural<M: ItemModel>(model: &M) -> Arc<Mutex<usize>> {
    let hits = Arc::new(Mutex::new(0));
    let signals = model.signals();
    for signal in [
        &signals.rows_about_to_be_inserted,
        &signals.rows_inserted,
        &signals.rows_about_to_be_removed,
        &signals.rows_removed,
    ] {
        let counter = hits.clone();
        signal.connect(move |_| *counter.lock() += 1);
    }
    for signal in [&signals.rows_about_to_be_moved, &signals.rows_moved] {
        let counter = hits.clone();
        signal.connect(move |_| *counter.lock() += 1);
    }
    hits
}

#[test]
fn test_shape_insert_into_slider_progression() {
    setup();
    let face = Face::new();
    let tree = RigTreeModel::new(face.doc.clone());
    let events = record_rows(&tree);
    let view = RigView::sliders(tree.clone());
    view.trivial_filter().set_enabled(false);
    view.refresh();
    let shown = view.model();
    assert_eq!(shown.row_count(&shown.index_from_item(face.smile.into(), 0)), 2);

    let prog = face.doc.read().slider(face.smile).unwrap().prog;
    let shape = tree
        .insert_item(ItemRef::Progression(prog), None, |rig| {
            rig.add_prog_pair(prog, "smile_half", 0.5, false)
        })
        .unwrap();

    // The shapes hang off the slider row, so that is the bracket's parent.
    assert_eq!(*events.lock(), vec![("about_insert", 2, 2), ("inserted", 2, 3)]);
    let smile = shown.index_from_item(face.smile.into(), 0);
    assert_eq!(shown.row_count(&smile), 3);
    assert_eq!(shown.index(2, 0, &smile).item(), Some(ItemRef::ProgPair(shape)));
}

#[test]
fn test_insert_under_unshown_parent_still_edits() {
    setup();
    let face = Face::new();
    let tree = RigTreeModel::new(face.doc.clone());
    let picker = GroupListModel::new(face.doc.clone());
    let hits = count_structural(&*picker);

    // The group picker shows groups, never their members.
    let brows = face.brows;
    let slider = picker
        .insert_item(brows.into(), None, |rig| rig.create_slider(brows, "browOut"))
        .unwrap();
    assert_eq!(*hits.lock(), 0);
    assert_eq!(face.doc.read().group(brows).unwrap().items.len(), 4);
    assert_eq!(picker.row_count(&ModelIndex::invalid()), 3);
    assert_eq!(tree.index_from_item(slider.into(), 0).row(), 3);
}

#[test]
fn test_move_to_unshown_destination_still_edits() {
    setup();
    let face = Face::new();
    let tree = RigTreeModel::new(face.doc.clone());
    let picker = GroupListModel::new(face.doc.clone());
    let hits = count_structural(&*picker);

    let item = ItemRef::Slider(face.smile);
    let brows = face.brows;
    picker
        .move_item(item, brows.into(), Some(0), |rig| rig.move_control(item, brows, Some(0)))
        .unwrap();
    assert_eq!(*hits.lock(), 0);
    assert_eq!(face.doc.read().group(brows).unwrap().items[0], item);
    let moved = tree.index_from_item(item, 0);
    assert_eq!(moved.row(), 0);
    assert_eq!(moved.parent(), tree.index_from_item(brows.into(), 0));
}

#[test]
fn test_group_insert_lands_in_kind_order() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());
    let events = record_rows(&model);

    // A new slider group goes after the existing slider groups, not at the end.
    let row = face.doc.read().groups_of(GroupKind::Slider).len();
    let group = model.insert_item(ItemRef::Root, Some(row), |rig| rig.create_group("Eyes", GroupKind::Slider));
    assert_eq!(*events.lock(), vec![("about_insert", 2, 4), ("inserted", 2, 5)]);
    assert_eq!(model.index_from_item(group.into(), 0).row(), 2);
}

#[test]
fn test_remove_bracket() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());
    let events = record_rows(&model);

    let item = ItemRef::Slider(face.brow_down);
    model.remove_item(item, |rig| rig.remove_control(item)).unwrap();
    assert_eq!(*events.lock(), vec![("about_remove", 2, 3), ("removed", 2, 2)]);
}

#[test]
fn test_failed_edit_still_closes_bracket() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());
    let events = record_rows(&model);

    // browUp is used by combos and the traversal.
    let item = ItemRef::Slider(face.brow_up);
    let result = model.remove_item(item, |rig| rig.remove_control(item));
    assert!(matches!(result, Err(Error::InvalidTarget { .. })));
    assert_eq!(events.lock().len(), 2);
    assert_eq!(model.index_from_item(item, 0).row(), 0);
}

#[test]
fn test_move_bracket() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());
    let moves = Arc::new(Mutex::new(Vec::new()));
    for signal in [&model.signals().rows_about_to_be_moved, &model.signals().rows_moved] {
        let sink = moves.clone();
        signal.connect(move |(src, first, _, dest, row): &(ModelIndex, usize, usize, ModelIndex, usize)| {
            sink.lock().push((src.row(), *first, dest.row(), *row));
        });
    }

    let item = ItemRef::Slider(face.smile);
    let (brows, mouth) = (face.brows, face.mouth);
    model
        .move_item(item, brows.into(), Some(1), |rig| rig.move_control(item, brows, Some(1)))
        .unwrap();
    assert_eq!(*moves.lock(), vec![(1, 0, 0, 1); 2]);

    let rig = face.doc.read();
    assert_eq!(rig.group(brows).unwrap().items[1], item);
    assert!(rig.group(mouth).unwrap().items.is_empty());
    drop(rig);
    assert_eq!(model.parent(&model.index_from_item(item, 0)), model.index_from_item(brows.into(), 0));
}

#[test]
fn test_move_to_stale_group_emits_nothing() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());
    let hits = Arc::new(Mutex::new(0));
    let counter = hits.clone();
    model.signals().rows_about_to_be_moved.connect(move |_| *counter.lock() += 1);

    let stale = {
        let mut rig = face.doc.write();
        let group = rig.create_group("Spare", GroupKind::Slider);
        rig.remove_group(group).unwrap();
        group
    };
    let item = ItemRef::Slider(face.smile);
    let result = model.move_item(item, stale.into(), None, |rig| rig.move_control(item, stale, None));
    assert!(matches!(result, Err(Error::UnknownItem(_))));
    assert_eq!(*hits.lock(), 0);
}

#[test]
fn test_reset_bracket() {
    setup();
    let face = Face::new();
    let model = RigTreeModel::new(face.doc.clone());
    let events = Arc::new(Mutex::new(Vec::new()));
    let (about, done) = (events.clone(), events.clone());
    model.signals().model_about_to_reset.connect(move |_| about.lock().push("about"));
    model.signals().model_reset.connect(move |_| done.lock().push("reset"));

    let count = model.reset_model(|rig| {
        rig.create_group("Eyes", GroupKind::Slider);
        rig.group_count()
    });
    assert_eq!(count, 5);
    assert_eq!(*events.lock(), vec!["about", "reset"]);
}
