//! Bridge between the selected year range and a range-editing widget.
//!
//! Widgets report every handle movement, including movements caused by the
//! program itself. Each batch of widget notifications is tagged with its
//! [`Origin`], and only user-originated commits are turned into range
//! commands. Live label updates are applied regardless of origin.

use tracing::debug;

use crate::models::YearRange;


/// Where a batch of widget notifications came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Programmatic,
    User,
}


/// Notification emitted by a range widget, carrying both handle values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    /// Fired continuously while a handle moves.
    Update([f64; 2]),
    /// Fired when a movement is committed.
    Change([f64; 2]),
}


/// An external control that displays and edits a numeric range.
pub trait RangeWidget {
    /// Move both handles. Returns the notifications this fires.
    fn set(&mut self, values: [f64; 2]) -> Vec<WidgetEvent>;

    /// Current handle values.
    fn values(&self) -> [f64; 2];
}


/// Keeps a [`RangeWidget`] and its live label in step with the selection.
#[derive(Debug)]
pub struct RangeControl<W> {
    widget: W,
    label: String,
}


impl<W: RangeWidget> RangeControl<W> {
    pub fn new(widget: W, initial: YearRange) -> Self {
        let mut control = Self { widget, label: initial.label() };
        control.programmatic_set(initial);
        control
    }

    /// Push a range into the widget without re-entering the user command path.
    pub fn programmatic_set(&mut self, range: YearRange) {
        let events = self.widget.set([range.start() as f64, range.end() as f64]);
        self.label = range.label();
        let committed = self.dispatch(events, Origin::Programmatic);
        debug_assert!(committed.is_none());
    }

    /// Run a user interaction against the widget.
    ///
    /// Returns the rounded `(start, end)` pair if the interaction committed a
    /// new range.
    pub fn interact<F>(&mut self, f: F) -> Option<(i32, i32)>
    where
        F: FnOnce(&mut W) -> Vec<WidgetEvent>,
    {
        let events = f(&mut self.widget);
        self.dispatch(events, Origin::User)
    }

    /// Apply a batch of widget notifications.
    pub fn dispatch<I>(&mut self, events: I, origin: Origin) -> Option<(i32, i32)>
    where
        I: IntoIterator<Item = WidgetEvent>,
    {
        let mut committed = None;
        for event in events {
            match event {
                WidgetEvent::Update(values) => {
                    let (start, end) = round_pair(values);
                    self.label = format!("{}年 - {}年", start, end);
                }
                WidgetEvent::Change(values) => match origin {
                    Origin::User => committed = Some(round_pair(values)),
                    Origin::Programmatic => {
                        debug!(?values, "suppressed programmatic change notification");
                    }
                },
            }
        }
        committed
    }

    /// Live `N年 - N年` label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }
}


fn round_pair(values: [f64; 2]) -> (i32, i32) {
    (values[0].round() as i32, values[1].round() as i32)
}
