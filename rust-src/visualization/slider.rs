//! Two-handle year slider for the terminal dashboard.

use crate::models::YearExtent;
use crate::state::{RangeWidget, WidgetEvent};


/// Keyboard-driven range slider with integer steps.
///
/// Moving a handle fires `Update` on every step; releasing fires a single
/// `Change`. Setting values from code fires both.
#[derive(Debug, Clone)]
pub struct TerminalSlider {
    min: f64,
    max: f64,
    values: [f64; 2],
    active: usize,
    dragging: bool,
}


impl TerminalSlider {
    pub fn new(extent: YearExtent) -> Self {
        let (min, max) = (extent.min as f64, extent.max as f64);
        Self {
            min,
            max,
            values: [min, max],
            active: 0,
            dragging: false,
        }
    }

    /// Drag the active handle by `steps` years.
    pub fn nudge(&mut self, steps: i32) -> Vec<WidgetEvent> {
        let i = self.active;
        let (lo, hi) = if i == 0 {
            (self.min, self.values[1])
        } else {
            (self.values[0], self.max)
        };
        let moved = (self.values[i] + steps as f64).clamp(lo, hi);
        if moved == self.values[i] {
            return Vec::new();
        }

        self.values[i] = moved;
        self.dragging = true;
        vec![WidgetEvent::Update(self.values)]
    }

    /// Let go of the handle, committing any drag in progress.
    pub fn release(&mut self) -> Vec<WidgetEvent> {
        if !self.dragging {
            return Vec::new();
        }
        self.dragging = false;
        vec![WidgetEvent::Change(self.values)]
    }

    pub fn switch_handle(&mut self) {
        self.active = 1 - self.active;
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Position of a handle as a fraction of the track, in `[0, 1]`.
    pub fn fraction(&self, handle: usize) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        (self.values[handle] - self.min) / span
    }
}


impl RangeWidget for TerminalSlider {
    fn set(&mut self, values: [f64; 2]) -> Vec<WidgetEvent> {
        let start = values[0].round().clamp(self.min, self.max);
        let end = values[1].round().clamp(start, self.max);
        self.values = [start, end];
        self.dragging = false;
        vec![WidgetEvent::Update(self.values), WidgetEvent::Change(self.values)]
    }

    fn values(&self) -> [f64; 2] {
        self.values
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> TerminalSlider {
        TerminalSlider::new(YearExtent { min: 1980, max: 2025 })
    }

    #[test]
    fn test_nudge_emits_update_and_release_emits_change() {
        let mut s = slider();
        assert_eq!(s.nudge(2), vec![WidgetEvent::Update([1982.0, 2025.0])]);
        assert!(s.is_dragging());
        assert_eq!(s.release(), vec![WidgetEvent::Change([1982.0, 2025.0])]);
        assert!(s.release().is_empty());
    }

    #[test]
    fn test_handles_cannot_cross() {
        let mut s = slider();
        s.set([2000.0, 2000.0]);
        assert!(s.nudge(1).is_empty());
        s.switch_handle();
        assert!(s.nudge(-1).is_empty());
        assert_eq!(s.values(), [2000.0, 2000.0]);
    }

    #[test]
    fn test_set_fires_both_notifications() {
        let mut s = slider();
        let events = s.set([1990.2, 1999.7]);
        assert_eq!(
            events,
            vec![
                WidgetEvent::Update([1990.0, 2000.0]),
                WidgetEvent::Change([1990.0, 2000.0]),
            ]
        );
    }

    #[test]
    fn test_fraction() {
        let mut s = slider();
        s.set([1980.0, 2025.0]);
        assert_eq!(s.fraction(0), 0.0);
        assert_eq!(s.fraction(1), 1.0);
    }
}
