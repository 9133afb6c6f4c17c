//! Population records and the value types derived from them.

use serde::{Deserialize, Serialize};


/// A single yearly population figure for one municipality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub year: i32,
    pub population: u64,
}


impl Record {
    pub fn new(year: i32, population: u64) -> Self {
        Self { year, population }
    }
}


/// Global minimum and maximum `year` across every loaded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearExtent {
    pub min: i32,
    pub max: i32,
}


impl YearExtent {
    /// Compute the extent of a set of records.
    ///
    /// Returns `None` when there are no records at all; callers must treat
    /// that as a load failure instead of defaulting to zero.
    pub fn from_records<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().fold(None, |extent, record| match extent {
            None => Some(Self { min: record.year, max: record.year }),
            Some(e) => Some(Self {
                min: e.min.min(record.year),
                max: e.max.max(record.year),
            }),
        })
    }

    /// Clamp a year into `[min, max]`.
    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min, self.max)
    }

    /// The range covering the whole extent.
    pub fn full_range(&self) -> YearRange {
        YearRange { start: self.min, end: self.max }
    }
}


/// Inclusive `[start, end]` year window.
///
/// Only constructible through [`YearRange::clamped`] or
/// [`YearExtent::full_range`], so `start <= end` and both bounds lie inside
/// the extent it was built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}


impl YearRange {
    /// Build a range from arbitrary input.
    ///
    /// `start` is clamped to the extent first, then `end` is clamped to
    /// `[clamped_start, extent.max]`.
    pub fn clamped(start: i32, end: i32, extent: YearExtent) -> Self {
        let start = extent.clamp(start);
        let end = end.min(extent.max).max(start);
        Self { start, end }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// Live slider label, e.g. `1990年 - 2000年`.
    pub fn label(&self) -> String {
        format!("{}年 - {}年", self.start, self.end)
    }

    /// Compact label used by the stats panel, e.g. `1990年-2000年`.
    pub fn period_label(&self) -> String {
        format!("{}年-{}年", self.start, self.end)
    }
}


/// Year-filtered, year-sorted points for one municipality, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedSeries {
    pub name: String,
    pub values: Vec<Record>,
}


impl DerivedSeries {
    /// Last point of the series (where its label is anchored).
    pub fn last(&self) -> Option<&Record> {
        self.values.last()
    }

    pub fn max_population(&self) -> Option<u64> {
        self.values.iter().map(|r| r.population).max()
    }
}


/// Summary figures shown next to the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Sum over the whole dataset of the populations recorded at the end year.
    pub total_population: u64,
    /// Number of municipalities that have a record at the end year.
    pub contributing: usize,
    /// Number of series actually drawn.
    pub visible_count: usize,
    pub period_label: String,
}


impl StatsSnapshot {
    /// `1,234人`, or `-` when no municipality has a record at the end year.
    pub fn total_label(&self) -> String {
        if self.contributing == 0 {
            "-".to_string()
        } else {
            format!("{}人", format_thousands(self.total_population))
        }
    }
}


/// Format a number with comma thousands separators.
pub fn format_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}


#[cfg(test)]
mod tests {
    use super::*;

    fn extent(min: i32, max: i32) -> YearExtent {
        YearExtent { min, max }
    }

    #[test]
    fn test_extent_from_records() {
        let records = vec![Record::new(2000, 1), Record::new(1980, 2), Record::new(2025, 3)];
        assert_eq!(YearExtent::from_records(&records), Some(extent(1980, 2025)));
    }

    #[test]
    fn test_extent_empty_is_none() {
        let records: Vec<Record> = vec![];
        assert_eq!(YearExtent::from_records(&records), None);
    }

    #[test]
    fn test_range_clamps_above_extent() {
        let range = YearRange::clamped(2050, 2060, extent(1980, 2025));
        assert_eq!((range.start(), range.end()), (2025, 2025));
    }

    #[test]
    fn test_range_reversed_input_collapses() {
        let range = YearRange::clamped(2000, 1990, extent(1980, 2025));
        assert_eq!((range.start(), range.end()), (2000, 2000));
    }

    #[test]
    fn test_range_always_ordered_and_inside() {
        let e = extent(1980, 2025);
        for a in (1900..2100).step_by(7) {
            for b in (1900..2100).step_by(11) {
                let r = YearRange::clamped(a, b, e);
                assert!(r.start() <= r.end());
                assert!(r.start() >= e.min && r.end() <= e.max);
            }
        }
    }

    #[test]
    fn test_labels() {
        let range = YearRange::clamped(1990, 2000, extent(1980, 2025));
        assert_eq!(range.label(), "1990年 - 2000年");
        assert_eq!(range.period_label(), "1990年-2000年");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_total_label() {
        let mut stats = StatsSnapshot {
            total_population: 12345,
            contributing: 2,
            visible_count: 1,
            period_label: String::new(),
        };
        assert_eq!(stats.total_label(), "12,345人");
        stats.contributing = 0;
        assert_eq!(stats.total_label(), "-");
    }
}
