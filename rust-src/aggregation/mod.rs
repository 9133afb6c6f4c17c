//! Filter/aggregate engine: derives what to draw from the dataset and selection.

mod visible;

#[allow(unused_imports)]
pub use visible::{
    derive_view,
    stats,
    visible_data,
    ChartView,
};
