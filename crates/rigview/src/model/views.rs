//! Ready-made filtered views over a rig model.
//!
//! Each editor panel shows one collection kind through a two-stage chain:
//!
//! ```text
//! source ─▶ kind proxy (GroupKindFilter) ─▶ filter proxy (name, trivial shapes[, dependencies])
//! ```
//!
//! [`RigView`] owns both proxies and keeps handles on the predicates so the
//! panel can retune them; call [`RigView::refresh`] afterwards.

use std::sync::Arc;

use super::filters::{DependencyFilter, GroupKindFilter, NameFilter, RowFilter, TrivialShapeFilter};
use super::proxy_model::FilterProxyModel;
use super::traits::RigItemModel;
use crate::rig::GroupKind;

/// A filtered view of one collection kind.
pub struct RigView<S: RigItemModel + 'static> {
    kind: GroupKind,
    kind_proxy: Arc<FilterProxyModel<S>>,
    proxy: Arc<FilterProxyModel<FilterProxyModel<S>>>,
    names: Arc<NameFilter>,
    trivial: Arc<TrivialShapeFilter>,
    dependencies: Option<Arc<DependencyFilter>>,
}

impl<S: RigItemModel + 'static> RigView<S> {
    /// The slider panel: slider groups, with name and trivial-shape filters.
    pub fn sliders(source: Arc<S>) -> Self {
        Self::build(source, GroupKind::Slider, false, None)
    }

    /// The combo panel: combo groups, with name, trivial-shape and dependency
    /// filters. Progressions with two targets or fewer are hidden as well.
    pub fn combos(source: Arc<S>) -> Self {
        Self::build(source, GroupKind::Combo, true, Some(Arc::new(DependencyFilter::new())))
    }

    /// The traversal panel: traversal groups, with name and trivial-shape
    /// filters.
    pub fn traversals(source: Arc<S>) -> Self {
        Self::build(source, GroupKind::Traversal, false, None)
    }

    fn build(
        source: Arc<S>,
        kind: GroupKind,
        hide_progressions: bool,
        dependencies: Option<Arc<DependencyFilter>>,
    ) -> Self {
        let kind_proxy = FilterProxyModel::new(source, vec![Arc::new(GroupKindFilter::new(kind))]);
        let names = Arc::new(NameFilter::new());
        let trivial = Arc::new(TrivialShapeFilter::new(hide_progressions));

        let mut filters: Vec<Arc<dyn RowFilter>> = vec![names.clone(), trivial.clone()];
        if let Some(dependencies) = &dependencies {
            filters.push(dependencies.clone());
        }
        let proxy = FilterProxyModel::new(kind_proxy.clone(), filters);
        Self {
            kind,
            kind_proxy,
            proxy,
            names,
            trivial,
            dependencies,
        }
    }

    /// The collection kind shown.
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// The outermost proxy; this is what a view displays.
    pub fn model(&self) -> &Arc<FilterProxyModel<FilterProxyModel<S>>> {
        &self.proxy
    }

    /// The kind-restriction proxy under the filter proxy.
    pub fn kind_model(&self) -> &Arc<FilterProxyModel<S>> {
        &self.kind_proxy
    }

    pub fn name_filter(&self) -> &Arc<NameFilter> {
        &self.names
    }

    pub fn trivial_filter(&self) -> &Arc<TrivialShapeFilter> {
        &self.trivial
    }

    /// The dependency filter; only the combo view has one.
    pub fn dependency_filter(&self) -> Option<&Arc<DependencyFilter>> {
        self.dependencies.as_ref()
    }

    /// Re-runs the whole chain after a predicate changed.
    pub fn refresh(&self) {
        self.proxy.invalidate();
    }
}
