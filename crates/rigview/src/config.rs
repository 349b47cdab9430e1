//! Persisted view settings.
//!
//! [`ViewSettings`] stores what a user typed into the three editor panels:
//! filter strings, isolate lists, the trivial-shape toggle and, for combos,
//! the dependency filter. It round-trips through TOML:
//!
//! ```toml
//! [sliders]
//! filter = "brow"
//! isolate = []
//! hide_trivial_shapes = true
//!
//! [combos]
//! filter = ""
//! require_any = true
//! requires = ["browUp", "browIn"]
//! ```
//!
//! Missing keys take their defaults, so partial documents load fine. Required
//! sliders are stored by name and resolved against the rig when applied.

use serde::{Deserialize, Serialize};
use rigview_core::logging::targets;

use crate::error::Result;
use crate::model::{RigItemModel, RigView};

/// Settings of a slider or traversal panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Whitespace-separated name filter.
    pub filter: String,
    /// Names that are always shown.
    pub isolate: Vec<String>,
    pub hide_trivial_shapes: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            filter: String::new(),
            isolate: Vec::new(),
            hide_trivial_shapes: true,
        }
    }
}

impl FilterSettings {
    fn apply_to<S: RigItemModel + 'static>(&self, view: &RigView<S>) {
        view.name_filter().set_filter_string(&self.filter);
        view.name_filter().set_isolate_list(self.isolate.clone());
        view.trivial_filter().set_enabled(self.hide_trivial_shapes);
    }

    fn capture<S: RigItemModel + 'static>(view: &RigView<S>) -> Self {
        Self {
            filter: view.name_filter().filter_string(),
            isolate: view.name_filter().isolate_list(),
            hide_trivial_shapes: view.trivial_filter().is_enabled(),
        }
    }
}

/// Settings of the combo panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboFilterSettings {
    pub filter: String,
    pub isolate: Vec<String>,
    pub hide_trivial_shapes: bool,
    /// Hide progressions with two targets or fewer.
    pub hide_empty_progressions: bool,
    pub require_any: bool,
    pub require_all: bool,
    pub require_only: bool,
    /// Names of the required sliders.
    pub requires: Vec<String>,
}

impl Default for ComboFilterSettings {
    fn default() -> Self {
        Self {
            filter: String::new(),
            isolate: Vec::new(),
            hide_trivial_shapes: true,
            hide_empty_progressions: true,
            require_any: false,
            require_all: false,
            require_only: false,
            requires: Vec::new(),
        }
    }
}

impl ComboFilterSettings {
    fn base(&self) -> FilterSettings {
        FilterSettings {
            filter: self.filter.clone(),
            isolate: self.isolate.clone(),
            hide_trivial_shapes: self.hide_trivial_shapes,
        }
    }
}

/// The persisted state of the slider, combo and traversal panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub sliders: FilterSettings,
    pub combos: ComboFilterSettings,
    pub traversals: FilterSettings,
}

impl ViewSettings {
    /// Parses settings from TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serializes settings to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Pushes the slider settings into `view` and refreshes it.
    pub fn apply_sliders<S: RigItemModel + 'static>(&self, view: &RigView<S>) {
        self.sliders.apply_to(view);
        view.refresh();
    }

    /// Pushes the traversal settings into `view` and refreshes it.
    pub fn apply_traversals<S: RigItemModel + 'static>(&self, view: &RigView<S>) {
        self.traversals.apply_to(view);
        view.refresh();
    }

    /// Pushes the combo settings into `view` and refreshes it.
    ///
    /// Required slider names are resolved against the view's rig. Returns the
    /// names that matched no slider; they are left out of the filter.
    pub fn apply_combos<S: RigItemModel + 'static>(&self, view: &RigView<S>) -> Vec<String> {
        self.combos.base().apply_to(view);
        view.trivial_filter()
            .set_hide_progressions(self.combos.hide_empty_progressions);

        let mut missing = Vec::new();
        if let Some(dependencies) = view.dependency_filter() {
            let mut requires = Vec::with_capacity(self.combos.requires.len());
            {
                let rig = view.model().document().read();
                for name in &self.combos.requires {
                    match rig.slider_by_name(name) {
                        Some(id) => requires.push(id),
                        None => missing.push(name.clone()),
                    }
                }
            }
            if !missing.is_empty() {
                tracing::warn!(target: targets::PROXY, ?missing, "required sliders not found");
            }
            dependencies.set_requires(requires);
            dependencies.set_modes(self.combos.require_any, self.combos.require_all, self.combos.require_only);
        }
        view.refresh();
        missing
    }

    /// Reads the current settings back from the three views.
    pub fn capture<S: RigItemModel + 'static>(
        sliders: &RigView<S>,
        combos: &RigView<S>,
        traversals: &RigView<S>,
    ) -> Self {
        let base = FilterSettings::capture(combos);
        let mut combo_settings = ComboFilterSettings {
            filter: base.filter,
            isolate: base.isolate,
            hide_trivial_shapes: base.hide_trivial_shapes,
            hide_empty_progressions: combos.trivial_filter().hides_progressions(),
            ..ComboFilterSettings::default()
        };
        if let Some(dependencies) = combos.dependency_filter() {
            let (any, all, only) = dependencies.modes();
            combo_settings.require_any = any;
            combo_settings.require_all = all;
            combo_settings.require_only = only;
            let rig = combos.model().document().read();
            combo_settings.requires = dependencies
                .requires()
                .into_iter()
                .filter_map(|id| rig.slider(id).map(|s| s.name.clone()))
                .collect();
        }
        Self {
            sliders: FilterSettings::capture(sliders),
            combos: combo_settings,
            traversals: FilterSettings::capture(traversals),
        }
    }
}
