//! Export of the rendered chart as SVG or PNG bytes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::chart::RenderedChart;


// Rules shipped with every exported chart.
const CHART_CSS: [&str; 10] = [
    "text { font-family: \"Hiragino Sans\", \"Noto Sans CJK JP\", \"Noto Sans JP\", sans-serif; }",
    ".line { fill: none; stroke-width: 2px; }",
    ".dot { fill: #ffffff; stroke-width: 1.5px; }",
    ".axis path, .axis line { stroke: #333333; }",
    ".axis text { font-size: 12px; fill: #333333; }",
    ".axis-label { font-size: 14px; fill: #333333; }",
    ".grid-line line { stroke: #000000; }",
    ".line-group { opacity: 1; }",
    ".line-group.inactive { opacity: 0.1; }",
    ".line-group:hover .line { stroke-width: 3px; }",
];

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";


/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no chart is currently rendered")]
    NoChartRendered,

    #[error("failed to read styles from {source_name}: {reason}")]
    StyleRead { source_name: String, reason: String },

    #[error("failed to decode chart image: {0}")]
    ImageDecode(String),

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}


impl ExportError {
    /// Alert text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ExportError::NoChartRendered => "チャートが表示されていません。".to_string(),
            ExportError::ImageDecode(_) | ExportError::Encode(_) => {
                "PNGの生成に失敗しました。".to_string()
            }
            other => other.to_string(),
        }
    }
}


/// A source of CSS rules inlined into exported markup.
pub trait StyleSource {
    fn name(&self) -> String;
    fn css_rules(&self) -> Result<Vec<String>, ExportError>;
}


/// The chart's built-in stylesheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedStyles;


impl StyleSource for EmbeddedStyles {
    fn name(&self) -> String {
        "embedded chart styles".to_string()
    }

    fn css_rules(&self) -> Result<Vec<String>, ExportError> {
        Ok(CHART_CSS.iter().map(|r| r.to_string()).collect())
    }
}


/// A user-supplied CSS file.
#[derive(Debug, Clone)]
pub struct StylesheetFile {
    path: PathBuf,
}


impl StylesheetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}


impl StyleSource for StylesheetFile {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn css_rules(&self) -> Result<Vec<String>, ExportError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| ExportError::StyleRead {
            source_name: self.name(),
            reason: e.to_string(),
        })?;
        Ok(vec![text.trim().to_string()])
    }
}


/// Capability that serializes a drawn chart into image bytes.
pub trait Exporter {
    fn serialize_vector(&self, chart: &RenderedChart) -> Result<Vec<u8>, ExportError>;
    fn serialize_raster(&self, chart: &RenderedChart) -> Result<Vec<u8>, ExportError>;
}


/// SVG/PNG exporter with style inlining.
pub struct SvgExporter {
    sources: Vec<Box<dyn StyleSource>>,
}


impl Default for SvgExporter {
    fn default() -> Self {
        Self::new()
    }
}


impl SvgExporter {
    /// Exporter inlining only the built-in styles.
    pub fn new() -> Self {
        Self { sources: vec![Box::new(EmbeddedStyles)] }
    }

    /// Add user stylesheets after the built-in styles.
    pub fn with_stylesheets<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources
            .extend(paths.into_iter().map(|p| Box::new(StylesheetFile::new(p)) as Box<dyn StyleSource>));
        self
    }

    #[cfg(test)]
    fn with_source(mut self, source: Box<dyn StyleSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Concatenate every readable style source. Unreadable sources are
    /// logged and skipped.
    pub fn collect_css(&self) -> String {
        let mut css = String::new();
        for source in &self.sources {
            match source.css_rules() {
                Ok(rules) => {
                    for rule in rules {
                        css.push_str(&rule);
                        css.push('\n');
                    }
                }
                Err(e) => warn!(source = %source.name(), error = %e, "skipping style source"),
            }
        }
        css.trim().to_string()
    }

    /// Standalone SVG document for a chart.
    pub fn svg_document(&self, chart: &RenderedChart) -> String {
        let css = self.collect_css();
        let style = if css.is_empty() {
            String::new()
        } else {
            format!("<style type=\"text/css\">{}</style>\n", escape_css(&css))
        };

        format!(
            r#"<svg xmlns="{}" xmlns:xlink="{}" width="{}" height="{}" viewBox="{}" preserveAspectRatio="xMidYMid meet">
{}{}
</svg>"#,
            SVG_NS,
            XLINK_NS,
            chart.width(),
            chart.height(),
            chart.view_box(),
            style,
            chart.body()
        )
    }
}


impl Exporter for SvgExporter {
    fn serialize_vector(&self, chart: &RenderedChart) -> Result<Vec<u8>, ExportError> {
        Ok(self.svg_document(chart).into_bytes())
    }

    fn serialize_raster(&self, chart: &RenderedChart) -> Result<Vec<u8>, ExportError> {
        let svg = self.svg_document(chart);

        let mut fontdb = resvg::usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        let mut options = resvg::usvg::Options::default();
        options.fontdb = Arc::new(fontdb);

        let tree = resvg::usvg::Tree::from_str(&svg, &options)
            .map_err(|e| ExportError::ImageDecode(e.to_string()))?;

        let size = tree.size();
        let width = size.width().ceil() as u32;
        let height = size.height().ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            ExportError::ImageDecode(format!("cannot allocate a {width}x{height} canvas"))
        })?;

        // Opaque white background first.
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        let png = pixmap.encode_png().map_err(|e| ExportError::Encode(e.to_string()))?;
        debug!(width, height, bytes = png.len(), "rasterized chart");
        Ok(png)
    }
}


/// Write an exported artifact, creating the parent directory if needed.
pub fn write_artifact(bytes: &[u8], path: &Path) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, bytes).map_err(io_err)
}


/// Open file with default application.
pub fn open_file(path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.to_string_lossy()])
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    Ok(())
}


/// CSS goes into element content, so only `<` and `&` need escaping.
fn escape_css(css: &str) -> String {
    css.replace('&', "&amp;").replace('<', "&lt;")
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DerivedSeries, Record, YearExtent, YearRange};
    use crate::visualization::chart::{ChartInput, Renderer, SvgRenderer, Viewport};
    use crate::visualization::palette::ColorAssignment;
    use tempfile::TempDir;

    struct BrokenSource;

    impl StyleSource for BrokenSource {
        fn name(&self) -> String {
            "broken".to_string()
        }

        fn css_rules(&self) -> Result<Vec<String>, ExportError> {
            Err(ExportError::StyleRead { source_name: self.name(), reason: "denied".into() })
        }
    }

    fn chart() -> RenderedChart {
        let colors = ColorAssignment::assign(["A"]);
        let data = vec![DerivedSeries {
            name: "A".into(),
            values: vec![Record::new(1990, 100), Record::new(2000, 200)],
        }];
        let range = YearRange::clamped(1990, 2000, YearExtent { min: 1990, max: 2000 });
        let input = ChartInput { series: &data, colors: &colors, range, highlight: None };
        SvgRenderer.render(&input, Viewport { width: 800 })
    }

    #[test]
    fn test_vector_has_namespaces_dimensions_and_styles() {
        let chart = chart();
        let svg = String::from_utf8(SvgExporter::new().serialize_vector(&chart).unwrap()).unwrap();

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("xmlns:xlink=\"http://www.w3.org/1999/xlink\""));
        assert!(svg.contains(&format!("width=\"{}\"", chart.width())));
        assert!(svg.contains(&format!("height=\"{}\"", chart.height())));
        assert!(svg.contains("<style type=\"text/css\">"));
        assert!(svg.contains(".line-group.inactive"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_unreadable_style_source_is_skipped() {
        let exporter = SvgExporter::new().with_source(Box::new(BrokenSource));
        let css = exporter.collect_css();
        assert!(css.contains(".line {"));
    }

    #[test]
    fn test_missing_stylesheet_file_is_skipped() {
        let exporter = SvgExporter::new().with_stylesheets(["/nonexistent/style.css"]);
        assert!(exporter.serialize_vector(&chart()).is_ok());
    }

    #[test]
    fn test_stylesheet_file_is_inlined() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("extra.css");
        std::fs::write(&path, ".ward-label { fill: red; }\n").unwrap();

        let css = SvgExporter::new().with_stylesheets([&path]).collect_css();
        assert!(css.ends_with(".ward-label { fill: red; }"));
    }

    #[test]
    fn test_raster_is_png() {
        let png = SvgExporter::new().serialize_raster(&chart()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_write_artifact_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.svg");
        write_artifact(b"<svg/>", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"<svg/>");
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(ExportError::NoChartRendered.user_message(), "チャートが表示されていません。");
        assert_eq!(ExportError::ImageDecode("x".into()).user_message(), "PNGの生成に失敗しました。");
    }
}
