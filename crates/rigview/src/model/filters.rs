//! Row predicates for the proxy chain.
//!
//! A [`FilterProxyModel`](super::FilterProxyModel) holds an ordered list of
//! [`RowFilter`]s and shows a source row only if every filter accepts the
//! row's item. Filters see the rig through a shared borrow and keep their own
//! settings behind interior mutability, so a view can retune a filter and then
//! invalidate the proxy that uses it.
//!
//! | filter                 | applies to                                  |
//! |------------------------|---------------------------------------------|
//! | [`GroupKindFilter`]    | groups                                      |
//! | [`NameFilter`]         | sliders, combos, combo pairs, progressions, shapes |
//! | [`TrivialShapeFilter`] | shapes (and optionally progressions)        |
//! | [`DependencyFilter`]   | combos                                      |

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use rigview_core::logging::targets;

use super::navigator::Navigator;
use crate::rig::{GroupKind, ItemRef, Rig, SliderId};

/// A predicate deciding whether a row is shown.
pub trait RowFilter: Send + Sync {
    /// Returns `true` if `item` should be shown.
    ///
    /// Items a filter has no opinion about must be accepted.
    fn accepts(&self, rig: &Rig, item: ItemRef) -> bool;
}

// =============================================================================
// Group kind
// =============================================================================

/// Shows only the groups of one kind.
#[derive(Debug, Clone, Copy)]
pub struct GroupKindFilter {
    kind: GroupKind,
}

impl GroupKindFilter {
    pub fn new(kind: GroupKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }
}

impl RowFilter for GroupKindFilter {
    fn accepts(&self, rig: &Rig, item: ItemRef) -> bool {
        match item {
            ItemRef::Group(id) => rig.group(id).is_some_and(|g| g.kind == self.kind),
            _ => true,
        }
    }
}

// =============================================================================
// Name
// =============================================================================

#[derive(Default)]
struct NameFilterState {
    tokens: Vec<String>,
    patterns: Vec<Regex>,
    isolate: Vec<String>,
}

/// Shows items whose name matches the filter string or the isolate list.
///
/// The filter string is split on whitespace. A token containing `*` is a
/// wildcard token where each `*` stands for any run of characters; any other
/// token is matched fuzzily, its characters in order with anything between
/// them. Matching is case-insensitive and may start anywhere in the name.
///
/// A name passes if it matches any token or is in the isolate list. A
/// container whose own name fails is tested again through its first child,
/// recursively, so a slider stays visible when its first shape matches.
#[derive(Default)]
pub struct NameFilter {
    state: RwLock<NameFilterState>,
}

impl NameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the filter string and recompiles its tokens.
    pub fn set_filter_string(&self, filter: &str) {
        let tokens: Vec<String> = filter.split_whitespace().map(str::to_owned).collect();
        let patterns = tokens.iter().filter_map(|token| compile_token(token)).collect();
        tracing::debug!(target: targets::PROXY, ?tokens, "name filter rebuilt");
        let mut state = self.state.write();
        state.tokens = tokens;
        state.patterns = patterns;
    }

    /// The filter string, tokens joined by single spaces.
    pub fn filter_string(&self) -> String {
        self.state.read().tokens.join(" ")
    }

    pub fn set_isolate_list(&self, names: Vec<String>) {
        self.state.write().isolate = names;
    }

    pub fn isolate_list(&self) -> Vec<String> {
        self.state.read().isolate.clone()
    }

    /// Returns `true` if a filter string or an isolate list is set.
    pub fn is_active(&self) -> bool {
        let state = self.state.read();
        !state.tokens.is_empty() || !state.isolate.is_empty()
    }

    /// Tests a single name, without container recursion.
    pub fn matches_name(&self, name: &str) -> bool {
        let state = self.state.read();
        if state.tokens.is_empty() && state.isolate.is_empty() {
            return true;
        }
        state.patterns.iter().any(|p| p.is_match(name)) || state.isolate.iter().any(|n| n == name)
    }

    fn check_children(&self, nav: &Navigator<'_>, item: ItemRef) -> bool {
        if nav.rig().item_name(item).is_some_and(|name| self.matches_name(name)) {
            return true;
        }
        let count = nav.child_count(Some(item));
        for row in 0..count {
            if let Some(child) = nav.child(Some(item), row) {
                return self.check_children(nav, child);
            }
        }
        false
    }
}

impl RowFilter for NameFilter {
    fn accepts(&self, rig: &Rig, item: ItemRef) -> bool {
        if !self.is_active() {
            return true;
        }
        match item {
            ItemRef::ProgPair(_)
            | ItemRef::Slider(_)
            | ItemRef::Combo(_)
            | ItemRef::ComboPair(_)
            | ItemRef::Progression(_) => self.check_children(&Navigator::new(rig), item),
            _ => true,
        }
    }
}

/// Builds the case-insensitive pattern for one filter token.
fn compile_token(token: &str) -> Option<Regex> {
    let pattern = if token.contains('*') {
        token.split('*').map(regex::escape).collect::<Vec<_>>().join(".*")
    } else {
        token
            .chars()
            .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
            .collect::<Vec<_>>()
            .join(".*?")
    };
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(error) => {
            tracing::warn!(target: targets::PROXY, token, %error, "filter token skipped");
            None
        }
    }
}

// =============================================================================
// Trivial shapes
// =============================================================================

/// Hides shapes that add nothing to a view: the rest shape, and every shape
/// of a progression with two targets or fewer.
pub struct TrivialShapeFilter {
    enabled: AtomicBool,
    hide_progressions: AtomicBool,
}

impl TrivialShapeFilter {
    /// Creates an enabled filter. With `hide_progressions`, progressions with
    /// two targets or fewer are hidden as well.
    pub fn new(hide_progressions: bool) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            hide_progressions: AtomicBool::new(hide_progressions),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_hide_progressions(&self, hide: bool) {
        self.hide_progressions.store(hide, Ordering::Relaxed);
    }

    pub fn hides_progressions(&self) -> bool {
        self.hide_progressions.load(Ordering::Relaxed)
    }
}

impl RowFilter for TrivialShapeFilter {
    fn accepts(&self, rig: &Rig, item: ItemRef) -> bool {
        if !self.is_enabled() {
            return true;
        }
        match item {
            ItemRef::ProgPair(id) => {
                let Some(pair) = rig.prog_pair(id) else {
                    return true;
                };
                let siblings = rig.progression(pair.prog).map_or(0, |p| p.pairs.len());
                siblings > 2 && !pair.is_rest
            }
            ItemRef::Progression(id) if self.hides_progressions() => {
                rig.progression(id).is_none_or(|p| p.pairs.len() > 2)
            }
            _ => true,
        }
    }
}

// =============================================================================
// Dependencies
// =============================================================================

/// How a combo's sliders are compared with the required set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyMode {
    /// The combo uses at least one required slider.
    Any,
    /// The combo uses every required slider.
    All,
    /// The combo uses required sliders and nothing else.
    Only,
}

#[derive(Default)]
struct DependencyState {
    requires: Vec<SliderId>,
    any: bool,
    all: bool,
    only: bool,
}

impl DependencyState {
    fn mode(&self) -> Option<DependencyMode> {
        if self.any {
            Some(DependencyMode::Any)
        } else if self.all {
            Some(DependencyMode::All)
        } else if self.only {
            Some(DependencyMode::Only)
        } else {
            None
        }
    }
}

/// Shows combos according to the sliders they depend on.
///
/// The three modes are exclusive. When several are switched on the first of
/// any, all, only wins. With no mode or an empty required set, every combo
/// passes.
#[derive(Default)]
pub struct DependencyFilter {
    state: RwLock<DependencyState>,
}

impl DependencyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_requires(&self, sliders: Vec<SliderId>) {
        self.state.write().requires = sliders;
    }

    pub fn requires(&self) -> Vec<SliderId> {
        self.state.read().requires.clone()
    }

    /// Sets the mode switches.
    pub fn set_modes(&self, any: bool, all: bool, only: bool) {
        let mut state = self.state.write();
        state.any = any;
        state.all = all;
        state.only = only;
        if [any, all, only].iter().filter(|on| **on).count() > 1 {
            tracing::warn!(
                target: targets::PROXY,
                any,
                all,
                only,
                effective = ?state.mode(),
                "conflicting dependency modes"
            );
        }
    }

    /// The raw mode switches as `(any, all, only)`.
    pub fn modes(&self) -> (bool, bool, bool) {
        let state = self.state.read();
        (state.any, state.all, state.only)
    }

    /// The mode in effect after priority resolution.
    pub fn mode(&self) -> Option<DependencyMode> {
        self.state.read().mode()
    }
}

impl RowFilter for DependencyFilter {
    fn accepts(&self, rig: &Rig, item: ItemRef) -> bool {
        let ItemRef::Combo(id) = item else {
            return true;
        };
        let state = self.state.read();
        let Some(mode) = state.mode() else {
            return true;
        };
        if state.requires.is_empty() {
            return true;
        }
        let used = rig.combo_sliders(id);
        match mode {
            DependencyMode::Any => state.requires.iter().any(|r| used.contains(r)),
            DependencyMode::All => state.requires.iter().all(|r| used.contains(r)),
            DependencyMode::Only => used.iter().all(|s| state.requires.contains(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_token() {
        let filter = NameFilter::new();
        filter.set_filter_string("sl*r");
        assert!(filter.matches_name("slider"));
        assert!(filter.matches_name("browSLIDER"));
        assert!(!filter.matches_name("sxlr"));
        assert!(!filter.matches_name("rls"));
    }

    #[test]
    fn test_fuzzy_token() {
        let filter = NameFilter::new();
        filter.set_filter_string("sdr");
        assert!(filter.matches_name("SlideR"));
        assert!(!filter.matches_name("rds"));

        filter.set_filter_string("slr");
        assert!(filter.matches_name("sxlr"));
    }

    #[test]
    fn test_tokens_and_isolate_are_alternatives() {
        let filter = NameFilter::new();
        assert!(filter.matches_name("anything"));
        assert!(!filter.is_active());

        filter.set_filter_string("  brow   lip ");
        assert_eq!(filter.filter_string(), "brow lip");
        filter.set_isolate_list(vec!["jawOpen".into()]);
        assert!(filter.matches_name("browUp"));
        assert!(filter.matches_name("lipPress"));
        assert!(filter.matches_name("jawOpen"));
        assert!(!filter.matches_name("jawClench"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let filter = NameFilter::new();
        filter.set_filter_string("a.b");
        assert!(filter.matches_name("xa.by"));
        assert!(!filter.matches_name("axb"));
        filter.set_filter_string("(*)");
        assert!(filter.matches_name("shape(1)"));
    }

    #[test]
    fn test_dependency_priority() {
        let filter = DependencyFilter::new();
        assert_eq!(filter.mode(), None);
        filter.set_modes(false, true, true);
        assert_eq!(filter.mode(), Some(DependencyMode::All));
        filter.set_modes(true, true, true);
        assert_eq!(filter.mode(), Some(DependencyMode::Any));
        assert_eq!(filter.modes(), (true, true, true));
    }
}
