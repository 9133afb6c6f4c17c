//! Selection state: visible municipalities and the active year range.

use std::collections::HashSet;

use crate::config::DEFAULT_VISIBLE_COUNT;
use crate::data::Dataset;
use crate::models::{YearExtent, YearRange};


/// Which municipalities are plotted and over which years.
///
/// Mutated only through the command methods below. Each command leaves the
/// caller responsible for recomputing derived data and redrawing.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    visible: HashSet<String>,
    range: Option<YearRange>,
}


impl SelectionState {
    /// Default session state: the first 15 names in dataset order and the
    /// full year extent.
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            visible: dataset
                .names()
                .take(DEFAULT_VISIBLE_COUNT)
                .map(String::from)
                .collect(),
            range: Some(dataset.year_extent().full_range()),
        }
    }

    pub fn select_all(&mut self, dataset: &Dataset) {
        self.visible = dataset.names().map(String::from).collect();
    }

    pub fn clear_all(&mut self) {
        self.visible.clear();
    }

    /// Replace the selection with the members of `names` present in the dataset.
    pub fn select_category(&mut self, dataset: &Dataset, names: &[&str]) {
        self.visible = names
            .iter()
            .filter(|name| dataset.contains(name))
            .map(|name| name.to_string())
            .collect();
    }

    /// Flip membership of `name`. Returns the new membership.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.visible.remove(name) {
            false
        } else {
            self.visible.insert(name.to_string());
            true
        }
    }

    /// Replace the year range, clamped to the extent.
    ///
    /// No-op before the range has been initialised.
    pub fn set_year_range(&mut self, start: i32, end: i32, extent: YearExtent) -> Option<YearRange> {
        let range = YearRange::clamped(start, end, extent);
        self.range.as_mut().map(|current| {
            *current = range;
            range
        })
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.visible.contains(name)
    }

    pub fn visible(&self) -> &HashSet<String> {
        &self.visible
    }

    pub fn has_selection(&self) -> bool {
        !self.visible.is_empty()
    }

    pub fn range(&self) -> Option<YearRange> {
        self.range
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Category;

    fn dataset(n: usize) -> Dataset {
        let body: Vec<String> = (0..n)
            .map(|i| format!(r#""m{i}": [{{"year": 1980, "population": 1}}, {{"year": 2025, "population": 2}}]"#))
            .collect();
        Dataset::from_json_str(&format!("{{{}}}", body.join(","))).unwrap()
    }

    #[test]
    fn test_initial_takes_first_15() {
        let ds = dataset(20);
        let state = SelectionState::initial(&ds);
        assert_eq!(state.visible().len(), 15);
        assert!(state.is_visible("m0"));
        assert!(state.is_visible("m14"));
        assert!(!state.is_visible("m15"));
        assert_eq!(state.range(), Some(ds.year_extent().full_range()));
    }

    #[test]
    fn test_initial_small_dataset() {
        let ds = dataset(3);
        assert_eq!(SelectionState::initial(&ds).visible().len(), 3);
    }

    #[test]
    fn test_select_all_and_clear() {
        let ds = dataset(20);
        let mut state = SelectionState::initial(&ds);
        state.select_all(&ds);
        assert_eq!(state.visible().len(), 20);
        state.clear_all();
        assert!(!state.has_selection());
    }

    #[test]
    fn test_toggle_is_self_inverse() {
        let ds = dataset(20);
        let mut state = SelectionState::initial(&ds);
        for name in ["m0", "m19", "unknown"] {
            let before = state.is_visible(name);
            state.toggle(name);
            assert_ne!(state.is_visible(name), before);
            state.toggle(name);
            assert_eq!(state.is_visible(name), before);
        }
    }

    #[test]
    fn test_select_category_drops_unknown_names() {
        let ds = Dataset::from_json_str(
            r#"{"港区": [{"year": 2000, "population": 1}], "町田市": [{"year": 2000, "population": 1}]}"#,
        )
        .unwrap();
        let mut state = SelectionState::initial(&ds);
        state.select_category(&ds, Category::Wards23.members());
        assert_eq!(state.visible().len(), 1);
        assert!(state.is_visible("港区"));

        state.select_category(&ds, &["X"]);
        assert!(!state.has_selection());
    }

    #[test]
    fn test_set_year_range_clamps() {
        let ds = dataset(1);
        let mut state = SelectionState::initial(&ds);
        let range = state.set_year_range(2050, 2060, ds.year_extent()).unwrap();
        assert_eq!((range.start(), range.end()), (2025, 2025));
        assert_eq!(state.range(), Some(range));
    }

    #[test]
    fn test_set_year_range_before_init_is_noop() {
        let ds = dataset(1);
        let mut state = SelectionState::default();
        assert_eq!(state.set_year_range(1990, 2000, ds.year_extent()), None);
        assert_eq!(state.range(), None);
    }
}
