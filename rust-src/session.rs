//! Chart session: applies user commands and keeps selection, legend, range
//! control and the rendered chart consistent with one another.
//!
//! Every command mutates the selection, then the view is derived and drawn
//! again from scratch. The dataset and color assignment never change after
//! construction.

use tracing::{debug, info, warn};

use crate::aggregation::{derive_view, ChartView};
use crate::config::{EARLY_YEARS, RECENT_YEARS};
use crate::data::{Category, Dataset};
use crate::models::{StatsSnapshot, YearExtent};
use crate::state::{RangeControl, RangeWidget, SelectionState, WidgetEvent};
use crate::visualization::{
    tooltip_text, ChartInput, ColorAssignment, ExportError, Exporter, RenderedChart, Renderer,
    Viewport,
};


/// Fixed year windows offered as one-key commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    All,
    Early,
    Recent,
}


impl RangePreset {
    /// Requested bounds, intersected with the extent.
    pub fn bounds(self, extent: YearExtent) -> (i32, i32) {
        match self {
            RangePreset::All => (extent.min, extent.max),
            RangePreset::Early => (extent.min.max(EARLY_YEARS.0), extent.max.min(EARLY_YEARS.1)),
            RangePreset::Recent => (extent.min.max(RECENT_YEARS.0), extent.max.min(RECENT_YEARS.1)),
        }
    }

    pub fn from_arg(arg: &str) -> Option<RangePreset> {
        match arg {
            "all" => Some(RangePreset::All),
            "early" => Some(RangePreset::Early),
            "recent" => Some(RangePreset::Recent),
            _ => None,
        }
    }
}


/// A user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectAll,
    ClearAll,
    SelectCategory(Category),
    /// Select exactly these names (unknown names are dropped).
    SelectNames(Vec<String>),
    Toggle(String),
    SetRange { start: i32, end: i32 },
    Preset(RangePreset),
    Hover(String),
    Unhover,
    Resize(Viewport),
}


/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub name: String,
    pub color: &'static str,
    pub active: bool,
    pub category: Option<Category>,
}


/// Live chart state for one dataset.
pub struct Session<R, W> {
    dataset: Dataset,
    colors: ColorAssignment,
    selection: SelectionState,
    range_control: RangeControl<W>,
    renderer: R,
    viewport: Viewport,
    highlight: Option<String>,
    view: ChartView,
    stats: Option<StatsSnapshot>,
    chart: Option<RenderedChart>,
    renders: usize,
}


impl<R: Renderer, W: RangeWidget> Session<R, W> {
    /// Start a session with the default selection and draw it.
    pub fn new(dataset: Dataset, renderer: R, widget: W, viewport: Viewport) -> Self {
        let colors = ColorAssignment::assign(dataset.names());
        let selection = SelectionState::initial(&dataset);
        let initial_range = dataset.year_extent().full_range();

        let mut session = Self {
            range_control: RangeControl::new(widget, initial_range),
            dataset,
            colors,
            selection,
            renderer,
            viewport,
            highlight: None,
            view: ChartView::Pending,
            stats: None,
            chart: None,
            renders: 0,
        };
        session.refresh();
        session
    }

    /// Apply a command and redraw as needed.
    pub fn apply(&mut self, command: Command) {
        debug!(?command, "applying command");

        match command {
            Command::SelectAll => self.selection.select_all(&self.dataset),
            Command::ClearAll => self.selection.clear_all(),
            Command::SelectCategory(category) => {
                self.selection.select_category(&self.dataset, category.members())
            }
            Command::SelectNames(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                self.selection.select_category(&self.dataset, &names);
            }
            Command::Toggle(name) => {
                self.selection.toggle(&name);
            }
            Command::SetRange { start, end } => return self.set_year_range(start, end),
            Command::Preset(preset) => {
                let (start, end) = preset.bounds(self.dataset.year_extent());
                return self.set_year_range(start, end);
            }
            Command::Hover(name) => {
                if self.view.series().iter().any(|s| s.name == name) {
                    self.highlight = Some(name);
                    self.redraw();
                }
                return;
            }
            Command::Unhover => {
                if self.highlight.take().is_some() {
                    self.redraw();
                }
                return;
            }
            Command::Resize(viewport) => {
                self.viewport = viewport;
                if self.selection.has_selection() {
                    self.redraw();
                }
                return;
            }
        }

        self.refresh();
    }

    /// Feed a user interaction with the range widget through the control.
    ///
    /// Only committed, user-originated changes reach the selection.
    pub fn slider_input<F>(&mut self, f: F)
    where
        F: FnOnce(&mut W) -> Vec<WidgetEvent>,
    {
        if let Some((start, end)) = self.range_control.interact(f) {
            info!(start, end, "year range changed from slider");
            let extent = self.dataset.year_extent();
            if self.selection.set_year_range(start, end, extent).is_some() {
                self.refresh();
            }
        }
    }

    fn set_year_range(&mut self, start: i32, end: i32) {
        let extent = self.dataset.year_extent();
        let Some(range) = self.selection.set_year_range(start, end, extent) else {
            return;
        };
        self.range_control.programmatic_set(range);
        self.refresh();
    }

    /// Recompute the view and stats, then redraw.
    fn refresh(&mut self) {
        self.highlight = None;
        let (view, stats) = derive_view(&self.dataset, &self.selection);
        self.view = view;
        self.stats = stats;
        self.redraw();
    }

    /// Discard the current chart and build a new one from the view.
    fn redraw(&mut self) {
        self.chart = None;

        let (ChartView::Series(series), Some(range)) = (&self.view, self.selection.range()) else {
            return;
        };

        let input = ChartInput {
            series,
            colors: &self.colors,
            range,
            highlight: self.highlight.as_deref(),
        };
        self.chart = Some(self.renderer.render(&input, self.viewport));
        self.renders += 1;
        debug!(renders = self.renders, width = self.viewport.width, "chart redrawn");
    }

    /// Serialize the current chart as SVG.
    pub fn export_vector(&self, exporter: &dyn Exporter) -> Result<Vec<u8>, ExportError> {
        let chart = self.chart.as_ref().ok_or(ExportError::NoChartRendered)?;
        exporter.serialize_vector(chart)
    }

    /// Serialize the current chart as PNG.
    pub fn export_raster(&self, exporter: &dyn Exporter) -> Result<Vec<u8>, ExportError> {
        let chart = self.chart.as_ref().ok_or(ExportError::NoChartRendered)?;
        exporter.serialize_raster(chart).inspect_err(|e| warn!(error = %e, "raster export failed"))
    }

    /// Legend rows in dataset order, active when visible.
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.dataset
            .names()
            .map(|name| LegendEntry {
                name: name.to_string(),
                color: self.colors.color_of(name),
                active: self.selection.is_visible(name),
                category: Category::of(name),
            })
            .collect()
    }

    /// Tooltip for the hovered series' last point.
    pub fn hover_tooltip(&self) -> Option<String> {
        let name = self.highlight.as_deref()?;
        let series = self.view.series().iter().find(|s| s.name == name)?;
        series.last().map(|r| tooltip_text(name, r))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn colors(&self) -> &ColorAssignment {
        &self.colors
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn view(&self) -> &ChartView {
        &self.view
    }

    pub fn stats(&self) -> Option<&StatsSnapshot> {
        self.stats.as_ref()
    }

    #[cfg(test)]
    pub fn chart(&self) -> Option<&RenderedChart> {
        self.chart.as_ref()
    }

    pub fn highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    /// Live label of the range control.
    pub fn range_label(&self) -> &str {
        self.range_control.label()
    }

    pub fn widget(&self) -> &W {
        self.range_control.widget()
    }

    #[cfg(test)]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[cfg(test)]
    pub fn render_count(&self) -> usize {
        self.renders
    }
}
