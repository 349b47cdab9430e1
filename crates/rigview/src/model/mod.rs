//! Item models over a rig.
//!
//! This module presents a [`Rig`](crate::rig::Rig) through the tree/list
//! model contract views are written against: index resolution, per-cell data
//! and flags, and begin/end change notifications.
//!
//! # Core Types
//!
//! - `ModelIndex`: Identifies a cell and the rig item behind it
//! - `ItemRole` / `ItemData`: What is asked of a cell and what comes back
//! - `ItemModel` / `RigItemModel`: The traits every model and proxy implements
//! - `Navigator`: Parent, row, child and child count for every item kind
//! - `StructuralEdit` / `ChangeBracket`: Insert, remove, move and reset brackets
//!
//! # Model Implementations
//!
//! - `RigTreeModel`: The whole rig as a three-column tree
//! - `FilterProxyModel`: Filters and sorts any rig model; proxies compose
//! - `RigView`: Slider, combo and traversal panels built from two proxies
//! - `GroupListModel`, `FalloffModel`, `FalloffDataModel`: Flat models
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────┐
//!  RigDocument ──────>│ RigTreeModel │──> FilterProxyModel ──> FilterProxyModel ──> view
//!  (RwLock<Rig>)      │  Navigator   │     (group kind)         (name, trivial, deps)
//!        │            └──────────────┘
//!        └──────────> GroupListModel, FalloffModel, FalloffDataModel
//! ```
//!
//! Models register with the document and are told about item data changes;
//! structural edits go through the brackets of [`StructuralEdit`].

mod coerce;
mod filters;
mod index;
mod list_model;
mod navigator;
mod proxy_model;
mod role;
mod traits;
mod transaction;
mod tree_model;
mod views;

pub use coerce::{
    coerce_index_to_child_type, coerce_index_to_parent_type, coerce_index_to_roots,
    coerce_index_to_type,
};
pub use filters::{
    DependencyFilter, DependencyMode, GroupKindFilter, NameFilter, RowFilter, TrivialShapeFilter,
};
pub use index::ModelIndex;
pub use list_model::{FALLOFF_HEADERS, FalloffDataModel, FalloffModel, GroupListModel};
pub use navigator::Navigator;
pub use proxy_model::FilterProxyModel;
pub use role::{CheckState, ItemData, ItemRole};
pub use traits::{ItemFlags, ItemModel, ModelSignals, Orientation, RigItemModel};
pub use transaction::{ChangeBracket, StructuralEdit};
pub use tree_model::{PROGRESSION_LABEL, RigTreeModel, TREE_HEADERS, TickBatch};
pub use views::RigView;
