//! Persisted panel settings applied to live views.

mod common;

use common::{Face, setup};
use rigview::ViewSettings;
use rigview::model::{DependencyMode, ItemModel, ModelIndex, RigTreeModel, RigView};

const SETTINGS: &str = r#"
[sliders]
filter = "brow"
isolate = ["smile"]
hide_trivial_shapes = false

[combos]
require_all = true
requires = ["browUp", "browIn", "missing"]
hide_empty_progressions = false

[traversals]
filter = "trav"
"#;

#[test]
fn test_apply_and_capture() {
    setup();
    let face = Face::new();
    let tree = RigTreeModel::new(face.doc.clone());
    let sliders = RigView::sliders(tree.clone());
    let combos = RigView::combos(tree.clone());
    let traversals = RigView::traversals(tree);

    let settings = ViewSettings::from_toml_str(SETTINGS).unwrap();
    settings.apply_sliders(&sliders);
    settings.apply_traversals(&traversals);
    let missing = settings.apply_combos(&combos);
    assert_eq!(missing, ["missing"]);

    assert_eq!(sliders.name_filter().filter_string(), "brow");
    assert!(!sliders.trivial_filter().is_enabled());
    assert!(traversals.trivial_filter().is_enabled());
    let deps = combos.dependency_filter().unwrap();
    assert_eq!(deps.mode(), Some(DependencyMode::All));
    assert_eq!(deps.requires(), [face.brow_up, face.brow_in]);

    let model = combos.model();
    let root = model.index(0, 0, &ModelIndex::invalid());
    let group = model.index(0, 0, &root);
    assert_eq!(model.row_count(&group), 1);
    // Progressions are no longer hidden: two pairs plus the progression row.
    assert_eq!(model.row_count(&model.index(0, 0, &group)), 3);

    let captured = ViewSettings::capture(&sliders, &combos, &traversals);
    assert_eq!(captured.sliders, settings.sliders);
    assert_eq!(captured.traversals, settings.traversals);
    assert_eq!(captured.combos.requires, ["browUp", "browIn"]);
    assert!(captured.combos.require_all);
    assert!(!captured.combos.hide_empty_progressions);
}

#[test]
fn test_round_trip_through_toml() {
    setup();
    let settings = ViewSettings::from_toml_str(SETTINGS).unwrap();
    let text = settings.to_toml_string().unwrap();
    assert_eq!(ViewSettings::from_toml_str(&text).unwrap(), settings);
}
