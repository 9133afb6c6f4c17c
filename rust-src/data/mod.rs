//! Dataset loading and municipality categories.

mod categories;
mod dataset;

#[allow(unused_imports)]
pub use categories::{Category, EXCLUDED_KEYS};
#[allow(unused_imports)]
pub use dataset::{Dataset, LoadError, MunicipalitySeries};
