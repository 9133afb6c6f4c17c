//! Visualization layer: palette, chart rendering, export, and the terminal dashboard.

mod chart;
mod dashboard;
mod export;
mod palette;
mod slider;

#[allow(unused_imports)]
pub use chart::{
    plot_height,
    series_class,
    tooltip_text,
    ChartInput,
    RenderedChart,
    Renderer,
    SvgRenderer,
    Viewport,
};
pub use dashboard::{render_dashboard, DashboardState};
#[allow(unused_imports)]
pub use export::{
    open_file,
    write_artifact,
    EmbeddedStyles,
    ExportError,
    Exporter,
    StyleSource,
    StylesheetFile,
    SvgExporter,
};
#[allow(unused_imports)]
pub use palette::{hex_to_rgb, palette, ColorAssignment};
pub use slider::TerminalSlider;
