//! Rig entities and the handles used to name them.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Handle of a [`Group`].
    pub struct GroupId;
    /// Handle of a [`Slider`].
    pub struct SliderId;
    /// Handle of a [`Combo`].
    pub struct ComboId;
    /// Handle of a [`Traversal`].
    pub struct TraversalId;
    /// Handle of a [`ComboPair`].
    pub struct ComboPairId;
    /// Handle of a [`TravPair`].
    pub struct TravPairId;
    /// Handle of a [`Progression`].
    pub struct ProgressionId;
    /// Handle of a [`ProgPair`].
    pub struct ProgPairId;
    /// Handle of a [`Falloff`].
    pub struct FalloffId;
}

/// A reference to any item of a rig.
///
/// This is the closed set of item variants the hierarchy navigator dispatches
/// over. It is `Copy` and compares by identity, so it can be stored in model
/// indexes without aliasing the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemRef {
    Root,
    Group(GroupId),
    Slider(SliderId),
    Combo(ComboId),
    Traversal(TraversalId),
    ComboPair(ComboPairId),
    TravPair(TravPairId),
    Progression(ProgressionId),
    ProgPair(ProgPairId),
    Falloff(FalloffId),
}

impl ItemRef {
    /// Returns the kind tag of this item.
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemRef::Root => ItemKind::Root,
            ItemRef::Group(_) => ItemKind::Group,
            ItemRef::Slider(_) => ItemKind::Slider,
            ItemRef::Combo(_) => ItemKind::Combo,
            ItemRef::Traversal(_) => ItemKind::Traversal,
            ItemRef::ComboPair(_) => ItemKind::ComboPair,
            ItemRef::TravPair(_) => ItemKind::TravPair,
            ItemRef::Progression(_) => ItemKind::Progression,
            ItemRef::ProgPair(_) => ItemKind::ProgPair,
            ItemRef::Falloff(_) => ItemKind::Falloff,
        }
    }

    /// Returns the class depth of this item (see [`ItemKind::class_depth`]).
    pub fn class_depth(&self) -> usize {
        self.kind().class_depth()
    }

    /// Returns `true` for sliders, combos and traversals.
    pub fn is_control(&self) -> bool {
        matches!(self, ItemRef::Slider(_) | ItemRef::Combo(_) | ItemRef::Traversal(_))
    }
}

impl From<SliderId> for ItemRef {
    fn from(id: SliderId) -> Self {
        ItemRef::Slider(id)
    }
}

impl From<ComboId> for ItemRef {
    fn from(id: ComboId) -> Self {
        ItemRef::Combo(id)
    }
}

impl From<TraversalId> for ItemRef {
    fn from(id: TraversalId) -> Self {
        ItemRef::Traversal(id)
    }
}

impl From<GroupId> for ItemRef {
    fn from(id: GroupId) -> Self {
        ItemRef::Group(id)
    }
}

impl From<ComboPairId> for ItemRef {
    fn from(id: ComboPairId) -> Self {
        ItemRef::ComboPair(id)
    }
}

impl From<TravPairId> for ItemRef {
    fn from(id: TravPairId) -> Self {
        ItemRef::TravPair(id)
    }
}

impl From<ProgressionId> for ItemRef {
    fn from(id: ProgressionId) -> Self {
        ItemRef::Progression(id)
    }
}

impl From<ProgPairId> for ItemRef {
    fn from(id: ProgPairId) -> Self {
        ItemRef::ProgPair(id)
    }
}

impl From<FalloffId> for ItemRef {
    fn from(id: FalloffId) -> Self {
        ItemRef::Falloff(id)
    }
}

/// The kind tag of an [`ItemRef`], without the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Root,
    Group,
    Slider,
    Combo,
    Traversal,
    ComboPair,
    TravPair,
    Progression,
    ProgPair,
    Falloff,
}

impl ItemKind {
    /// The nominal depth of this kind in the rig hierarchy.
    ///
    /// Selection coercion compares these depths, not the tree depth of a
    /// particular index: a slider's shapes sit one row below the slider in
    /// the tree but still have the shape depth.
    pub const fn class_depth(self) -> usize {
        match self {
            ItemKind::Root => 0,
            ItemKind::Group | ItemKind::Falloff => 1,
            ItemKind::Slider | ItemKind::Combo | ItemKind::Traversal => 2,
            ItemKind::ComboPair | ItemKind::TravPair | ItemKind::Progression => 3,
            ItemKind::ProgPair => 4,
        }
    }
}

/// Which kind of controls a group holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Slider,
    Combo,
    Traversal,
}

impl GroupKind {
    /// Returns `true` if `item` is a control this group kind may hold.
    pub fn holds(self, item: ItemRef) -> bool {
        matches!(
            (self, item),
            (GroupKind::Slider, ItemRef::Slider(_))
                | (GroupKind::Combo, ItemRef::Combo(_))
                | (GroupKind::Traversal, ItemRef::Traversal(_))
        )
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupKind::Slider => "slider",
            GroupKind::Combo => "combo",
            GroupKind::Traversal => "traversal",
        })
    }
}

/// A named bucket of controls of one kind.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub kind: GroupKind,
    pub items: Vec<ItemRef>,
}

/// A single weighted control driving one progression.
#[derive(Debug, Clone)]
pub struct Slider {
    pub name: String,
    pub enabled: bool,
    pub value: f64,
    pub group: GroupId,
    pub prog: ProgressionId,
}

/// A control activated by a combination of sliders.
#[derive(Debug, Clone)]
pub struct Combo {
    pub name: String,
    pub enabled: bool,
    pub group: GroupId,
    pub pairs: Vec<ComboPairId>,
    pub prog: ProgressionId,
}

/// One `(slider, weight)` entry of a combo.
#[derive(Debug, Clone)]
pub struct ComboPair {
    pub slider: SliderId,
    pub value: f64,
    pub combo: ComboId,
}

/// How a traversal uses one of its two controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravUsage {
    Progress,
    Multiplier,
}

impl TravUsage {
    /// The fixed child row of a pair with this usage under its traversal.
    pub const fn index(self) -> usize {
        match self {
            TravUsage::Progress => 0,
            TravUsage::Multiplier => 1,
        }
    }

    /// Lowercase tag shown in the usage column.
    pub const fn as_str(self) -> &'static str {
        match self {
            TravUsage::Progress => "progress",
            TravUsage::Multiplier => "multiplier",
        }
    }
}

/// A control that is driven along a path by a progress and a multiplier.
#[derive(Debug, Clone)]
pub struct Traversal {
    pub name: String,
    pub enabled: bool,
    pub group: GroupId,
    pub progress: TravPairId,
    pub multiplier: TravPairId,
    pub prog: ProgressionId,
}

/// One of the two `(control, weight)` links of a traversal.
#[derive(Debug, Clone)]
pub struct TravPair {
    /// A slider or combo.
    pub control: ItemRef,
    pub value: f64,
    pub usage: TravUsage,
    pub traversal: TraversalId,
}

/// The ordered shape targets a control interpolates between.
#[derive(Debug, Clone)]
pub struct Progression {
    pub name: String,
    /// The owning slider, combo or traversal.
    pub controller: ItemRef,
    pub pairs: Vec<ProgPairId>,
    pub falloffs: Vec<FalloffId>,
}

/// One weighted shape target of a progression.
#[derive(Debug, Clone)]
pub struct ProgPair {
    pub name: String,
    pub value: f64,
    pub is_rest: bool,
    pub prog: ProgressionId,
}

/// How a falloff splits a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SplitType {
    #[default]
    Planar,
    Map,
}

impl SplitType {
    /// Position in the `[planar, map]` choice list.
    pub const fn index(self) -> i64 {
        match self {
            SplitType::Planar => 0,
            SplitType::Map => 1,
        }
    }

    /// Parses a choice index.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(SplitType::Planar),
            1 => Some(SplitType::Map),
            _ => None,
        }
    }

    /// Parses a case-insensitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "planar" => Some(SplitType::Planar),
            "map" => Some(SplitType::Map),
            _ => None,
        }
    }
}

/// A falloff axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    /// Position in the `[x, y, z]` choice list.
    pub const fn index(self) -> i64 {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Parses a choice index.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }

    /// Parses a case-insensitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// A spatial weighting rule that progressions can subscribe to.
#[derive(Debug, Clone, PartialEq)]
pub struct Falloff {
    pub name: String,
    pub split_type: SplitType,
    pub axis: Axis,
    pub max_val: f64,
    pub max_handle: f64,
    pub min_handle: f64,
    pub min_val: f64,
    pub map_name: String,
}

impl Falloff {
    /// A planar falloff with the usual `1 / 0.66 / -0.66 / -1` handles.
    pub fn planar(name: impl Into<String>, axis: Axis) -> Self {
        Self {
            name: name.into(),
            split_type: SplitType::Planar,
            axis,
            max_val: 1.0,
            max_handle: 0.66,
            min_handle: -0.66,
            min_val: -1.0,
            map_name: String::new(),
        }
    }

    /// A map falloff reading weights from `map_name`.
    pub fn map(name: impl Into<String>, map_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            split_type: SplitType::Map,
            map_name: map_name.into(),
            ..Self::planar("", Axis::X)
        }
    }
}
