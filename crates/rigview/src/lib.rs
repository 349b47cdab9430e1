//! Tree and list models over blendshape rigs.
//!
//! A blendshape rig is a hierarchy of sliders, combos and traversals, each
//! driving a progression of shapes. This crate presents such a rig through
//! the item-model contract a tree or list view is written against, and
//! provides the filter proxies that turn one tree into the slider, combo and
//! traversal panels of an editor.
//!
//! - [`rig`]: The item arena, the shared [`RigDocument`](rig::RigDocument)
//!   and the batch weight setters
//! - [`model`]: Indexes, the tree model, flat models, filter proxies and the
//!   begin/end change brackets
//! - [`config`]: Panel settings persisted as TOML
//!
//! # Example
//!
//! ```
//! use rigview::model::{ItemModel, ModelIndex, RigTreeModel, RigView};
//! use rigview::rig::{GroupKind, Rig, RigDocument};
//!
//! let mut rig = Rig::new("face");
//! let brows = rig.create_group("Brows", GroupKind::Slider);
//! rig.create_slider(brows, "browUp").unwrap();
//! rig.create_slider(brows, "browIn").unwrap();
//!
//! let tree = RigTreeModel::new(RigDocument::new(rig));
//! let sliders = RigView::sliders(tree);
//! sliders.name_filter().set_filter_string("up");
//! sliders.refresh();
//!
//! let model = sliders.model();
//! let root = model.index(0, 0, &ModelIndex::invalid());
//! let group = model.index(0, 0, &root);
//! assert_eq!(model.row_count(&group), 1);
//! ```
//!
//! # Logging
//!
//! Diagnostics go through `tracing` under the targets listed in
//! [`rigview_core::logging::targets`]. Install any subscriber to see them.

pub mod config;
pub mod error;
pub mod model;
pub mod rig;

pub use config::ViewSettings;
pub use error::{Error, Result};
