//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use rigview::rig::{
    Axis, ComboId, Falloff, FalloffId, GroupId, GroupKind, Rig, RigDocument, SliderId, TraversalId,
};

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A small face rig.
///
/// ```text
/// face
/// ├─ Brows (slider)     browUp [rest, half, full], browIn [rest, full], browDown [rest, full]
/// ├─ Mouth (slider)     smile [rest, full]
/// ├─ Combos (combo)     upIn (browUp, browIn), upSmile (browUp, smile)
/// └─ Travs (traversal)  browTrav (progress browUp, multiplier browIn)
/// ```
pub struct Face {
    pub doc: Arc<RigDocument>,
    pub brows: GroupId,
    pub mouth: GroupId,
    pub combos: GroupId,
    pub travs: GroupId,
    pub brow_up: SliderId,
    pub brow_in: SliderId,
    pub brow_down: SliderId,
    pub smile: SliderId,
    pub up_in: ComboId,
    pub up_smile: ComboId,
    pub brow_trav: TraversalId,
    pub left: FalloffId,
    pub right: FalloffId,
}

fn slider(rig: &mut Rig, group: GroupId, name: &str, shapes: &[&str]) -> SliderId {
    let id = rig.create_slider(group, name).unwrap();
    let prog = rig.slider(id).unwrap().prog;
    let last = shapes.len().saturating_sub(1).max(1) as f64;
    for (i, shape) in shapes.iter().enumerate() {
        rig.add_prog_pair(prog, format!("{name}_{shape}"), i as f64 / last, i == 0)
            .unwrap();
    }
    id
}

fn combo(rig: &mut Rig, group: GroupId, name: &str, sliders: &[SliderId]) -> ComboId {
    let id = rig.create_combo(group, name).unwrap();
    for &s in sliders {
        rig.add_combo_pair(id, s, 1.0, None).unwrap();
    }
    let prog = rig.combo(id).unwrap().prog;
    rig.add_prog_pair(prog, format!("{name}_rest"), 0.0, true).unwrap();
    rig.add_prog_pair(prog, format!("{name}_full"), 1.0, false).unwrap();
    id
}

impl Face {
    pub fn new() -> Self {
        let mut rig = Rig::new("face");
        let brows = rig.create_group("Brows", GroupKind::Slider);
        let mouth = rig.create_group("Mouth", GroupKind::Slider);
        let combos = rig.create_group("Combos", GroupKind::Combo);
        let travs = rig.create_group("Travs", GroupKind::Traversal);

        let brow_up = slider(&mut rig, brows, "browUp", &["rest", "half", "full"]);
        let brow_in = slider(&mut rig, brows, "browIn", &["rest", "full"]);
        let brow_down = slider(&mut rig, brows, "browDown", &["rest", "full"]);
        let smile = slider(&mut rig, mouth, "smile", &["rest", "full"]);

        let up_in = combo(&mut rig, combos, "upIn", &[brow_up, brow_in]);
        let up_smile = combo(&mut rig, combos, "upSmile", &[brow_up, smile]);
        let brow_trav = rig
            .create_traversal(travs, "browTrav", brow_up.into(), brow_in.into())
            .unwrap();

        let left = rig.create_falloff(Falloff::planar("Left", Axis::X));
        let right = rig.create_falloff(Falloff::planar("Right", Axis::X));

        Self {
            doc: RigDocument::new(rig),
            brows,
            mouth,
            combos,
            travs,
            brow_up,
            brow_in,
            brow_down,
            smile,
            up_in,
            up_smile,
            brow_trav,
            left,
            right,
        }
    }
}
