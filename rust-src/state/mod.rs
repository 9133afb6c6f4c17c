//! View state: municipality selection, year range, and the range control bridge.

mod range_control;
mod selection;

#[allow(unused_imports)]
pub use range_control::{Origin, RangeControl, RangeWidget, WidgetEvent};
#[allow(unused_imports)]
pub use selection::SelectionState;
