//! Data models for municipality population series.

mod population;

#[allow(unused_imports)]
pub use population::{
    format_thousands,
    DerivedSeries,
    Record,
    StatsSnapshot,
    YearExtent,
    YearRange,
};
