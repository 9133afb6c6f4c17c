//! Range filtering of visible series and end-year population totals.

use std::collections::HashSet;

use crate::data::Dataset;
use crate::models::{DerivedSeries, StatsSnapshot, YearRange};
use crate::state::SelectionState;


/// What the chart area should show for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartView {
    /// Year range not initialised yet.
    Pending,
    /// No municipality selected.
    NoSelection,
    /// Municipalities selected, but none has a record inside the range.
    NoDataInRange,
    /// Series to draw, in dataset order.
    Series(Vec<DerivedSeries>),
}


impl ChartView {
    /// Message shown in place of the chart, if any.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ChartView::Pending => Some("年範囲を初期化しています..."),
            ChartView::NoSelection => Some("表示する自治体を選択してください"),
            ChartView::NoDataInRange => Some("選択した期間にはデータがありません"),
            ChartView::Series(_) => None,
        }
    }

    pub fn series(&self) -> &[DerivedSeries] {
        match self {
            ChartView::Series(series) => series,
            _ => &[],
        }
    }
}


/// Range-filtered, year-sorted records of every visible municipality.
///
/// Output follows dataset order. Municipalities left with no records in the
/// range are dropped, and names not in the dataset contribute nothing.
pub fn visible_data(
    dataset: &Dataset,
    visible: &HashSet<String>,
    range: YearRange,
) -> Vec<DerivedSeries> {
    dataset
        .series()
        .iter()
        .filter(|s| visible.contains(&s.name))
        .filter_map(|s| {
            let mut values: Vec<_> = s
                .records
                .iter()
                .filter(|r| range.contains(r.year))
                .copied()
                .collect();
            if values.is_empty() {
                return None;
            }
            values.sort_by_key(|r| r.year);
            Some(DerivedSeries { name: s.name.clone(), values })
        })
        .collect()
}


/// Summary figures for the current view.
///
/// The population total covers every municipality in the dataset at the
/// range's end year, independent of which series are visible.
pub fn stats(dataset: &Dataset, derived: &[DerivedSeries], range: YearRange) -> StatsSnapshot {
    let end = range.end();
    let totals: Vec<u64> = dataset
        .series()
        .iter()
        .filter_map(|s| s.records.iter().find(|r| r.year == end))
        .map(|r| r.population)
        .collect();

    StatsSnapshot {
        // Saturates rather than overflowing on absurd inputs.
        total_population: totals.iter().fold(0u64, |acc, &p| acc.saturating_add(p)),
        contributing: totals.len(),
        visible_count: derived.len(),
        period_label: range.period_label(),
    }
}


/// Recompute the chart view and stats from scratch.
pub fn derive_view(dataset: &Dataset, selection: &SelectionState) -> (ChartView, Option<StatsSnapshot>) {
    let Some(range) = selection.range() else {
        return (ChartView::Pending, None);
    };

    if !selection.has_selection() {
        return (ChartView::NoSelection, Some(stats(dataset, &[], range)));
    }

    let derived = visible_data(dataset, selection.visible(), range);
    let snapshot = stats(dataset, &derived, range);
    let view = if derived.is_empty() {
        ChartView::NoDataInRange
    } else {
        ChartView::Series(derived)
    };

    (view, Some(snapshot))
}
