//! SVG line chart rendering.
//!
//! The renderer is a pure function of the derived series, the color
//! assignment, the selected range and the container width. Every call builds
//! a complete chart from scratch.

use std::sync::OnceLock;

use regex::Regex;

use super::palette::ColorAssignment;
use crate::models::{format_thousands, DerivedSeries, Record, YearRange};


// Layout
const MARGIN_TOP: f64 = 20.0;
const MARGIN_RIGHT: f64 = 180.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MARGIN_LEFT: f64 = 60.0;
const MIN_PLOT_HEIGHT: f64 = 800.0;
const PX_PER_SERIES: f64 = 16.0;
const X_TICKS: usize = 10;
const Y_TICKS: usize = 8;
const TICK_SIZE: f64 = 6.0;
const POINT_RADIUS: f64 = 3.0;


/// Measured size of the area the chart is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Container width in px.
    pub width: u32,
}


/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ChartInput<'a> {
    pub series: &'a [DerivedSeries],
    pub colors: &'a ColorAssignment,
    pub range: YearRange,
    /// Hovered municipality; all other series are drawn inactive.
    pub highlight: Option<&'a str>,
}


/// A drawn chart: the SVG body plus its pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    width: f64,
    height: f64,
    body: String,
}


impl RenderedChart {
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Inner markup (everything inside the root `<svg>`).
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", num(self.width), num(self.height))
    }
}


/// Capability that turns derived data into a drawn chart.
pub trait Renderer {
    fn render(&self, input: &ChartInput<'_>, viewport: Viewport) -> RenderedChart;
}


/// Renders charts as SVG markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;


impl Renderer for SvgRenderer {
    fn render(&self, input: &ChartInput<'_>, viewport: Viewport) -> RenderedChart {
        let width = (viewport.width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let height = plot_height(input.series.len());

        let x = LinearScale::new(
            (input.range.start() as f64, input.range.end() as f64),
            (0.0, width),
        );
        let y_max = input
            .series
            .iter()
            .filter_map(DerivedSeries::max_population)
            .max()
            .filter(|&m| m > 0)
            .map(|m| m as f64 * 1.1)
            .unwrap_or(1.0);
        let y = LinearScale::new((0.0, y_max), (height, 0.0));

        let mut parts = vec![format!(
            r#"<g class="chart-area" transform="translate({},{})">"#,
            num(MARGIN_LEFT),
            num(MARGIN_TOP)
        )];

        parts.push(render_grid(&y, width));
        parts.push(render_x_axis(&x, width, height));
        parts.push(render_y_axis(&y, height));

        for series in input.series {
            let inactive = input.highlight.is_some_and(|h| h != series.name);
            parts.push(render_series(series, input.colors.color_of(&series.name), &x, &y, inactive));
        }

        parts.push("</g>".to_string());

        RenderedChart {
            width: width + MARGIN_LEFT + MARGIN_RIGHT,
            height: height + MARGIN_TOP + MARGIN_BOTTOM,
            body: parts.join("\n"),
        }
    }
}


/// Plot height for a number of series: `max(800, n * 16) * 2/3`.
pub fn plot_height(series_count: usize) -> f64 {
    MIN_PLOT_HEIGHT.max(series_count as f64 * PX_PER_SERIES) * (2.0 / 3.0)
}


/// Tooltip text for a hovered point.
pub fn tooltip_text(name: &str, record: &Record) -> String {
    format!("{}\n{}年: {}人", name, record.year, format_thousands(record.population))
}


/// CSS class distinguishing one series path.
pub fn series_class(name: &str) -> String {
    static NON_WORD: OnceLock<Option<Regex>> = OnceLock::new();
    let stripped = match NON_WORD.get_or_init(|| Regex::new(r"[^\w]").ok()) {
        Some(re) => re.replace_all(name, "").into_owned(),
        None => name.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect(),
    };
    format!("ward-{}", stripped)
}


/// Linear map from a data domain to a pixel range.
#[derive(Debug, Clone, Copy)]
struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}


impl LinearScale {
    fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (v - d0) / span };
        r0 + t * (r1 - r0)
    }

    fn ticks(&self, count: usize) -> Ticks {
        ticks(self.domain.0, self.domain.1, count)
    }
}


/// Evenly spaced "nice" tick values and the step between them.
#[derive(Debug, Clone, PartialEq)]
struct Ticks {
    values: Vec<f64>,
    step: f64,
}


fn ticks(start: f64, stop: f64, count: usize) -> Ticks {
    let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
    if count == 0 || lo == hi {
        return Ticks { values: vec![lo], step: 1.0 };
    }

    let step = nice_step(lo, hi, count);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    let values = (first..=last).map(|i| i as f64 * step).collect();

    Ticks { values, step }
}


/// Step of 1, 2 or 5 times a power of ten giving roughly `count` intervals.
fn nice_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;

    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    power * factor
}


fn format_value_tick(v: f64, step: f64) -> String {
    if step >= 1.0 {
        return format_thousands(v.round().max(0.0) as u64);
    }
    let decimals = (-(step.log10() + 1e-9).floor()).max(0.0) as usize;
    format!("{:.*}", decimals, v)
}


fn render_grid(y: &LinearScale, width: f64) -> String {
    let mut parts = vec![r#"<g class="grid-line" opacity="0.1">"#.to_string()];
    for v in y.ticks(Y_TICKS).values {
        let py = num(y.map(v));
        parts.push(format!(
            r#"<line x1="0" x2="{}" y1="{}" y2="{}" stroke="currentColor"/>"#,
            num(width), py, py
        ));
    }
    parts.push("</g>".to_string());
    parts.join("\n")
}


fn render_x_axis(x: &LinearScale, width: f64, height: f64) -> String {
    let mut parts = vec![
        format!(r#"<g class="axis axis-x" transform="translate(0,{})">"#, num(height)),
        format!(
            r#"<path class="domain" d="M0,{t}V0H{w}V{t}" fill="none" stroke="currentColor"/>"#,
            t = num(TICK_SIZE),
            w = num(width)
        ),
    ];

    // Year ticks are integers only.
    for v in x.ticks(X_TICKS).values.into_iter().filter(|v| v.fract() == 0.0) {
        parts.push(format!(
            r#"<g class="tick" transform="translate({},0)"><line y2="{}" stroke="currentColor"/><text y="9" dy="0.71em" text-anchor="middle">{}</text></g>"#,
            num(x.map(v)),
            num(TICK_SIZE),
            v as i64
        ));
    }

    parts.push(format!(
        r#"<text class="axis-label" x="{}" y="35" text-anchor="middle">年</text>"#,
        num(width / 2.0)
    ));
    parts.push("</g>".to_string());
    parts.join("\n")
}


fn render_y_axis(y: &LinearScale, height: f64) -> String {
    let mut parts = vec![
        r#"<g class="axis axis-y">"#.to_string(),
        format!(
            r#"<path class="domain" d="M-{t},{h}H0V0H-{t}" fill="none" stroke="currentColor"/>"#,
            t = num(TICK_SIZE),
            h = num(height)
        ),
    ];

    let ticks = y.ticks(Y_TICKS);
    for &v in &ticks.values {
        parts.push(format!(
            r#"<g class="tick" transform="translate(0,{})"><line x2="-{}" stroke="currentColor"/><text x="-9" dy="0.32em" text-anchor="end">{}</text></g>"#,
            num(y.map(v)),
            num(TICK_SIZE),
            format_value_tick(v, ticks.step)
        ));
    }

    parts.push(format!(
        r#"<text class="axis-label" transform="rotate(-90)" x="{}" y="-45" text-anchor="middle">人口（人）</text>"#,
        num(-height / 2.0)
    ));
    parts.push("</g>".to_string());
    parts.join("\n")
}


fn render_series(
    series: &DerivedSeries,
    color: &str,
    x: &LinearScale,
    y: &LinearScale,
    inactive: bool,
) -> String {
    let name = escape_xml(&series.name);
    let class = if inactive { "line-group inactive" } else { "line-group" };

    let path: Vec<String> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let cmd = if i == 0 { 'M' } else { 'L' };
            format!("{}{},{}", cmd, num(x.map(r.year as f64)), num(y.map(r.population as f64)))
        })
        .collect();

    let mut parts = vec![
        format!(r#"<g class="{}" data-ward="{}">"#, class, name),
        format!(
            r#"<path class="line {}" d="{}" fill="none" style="stroke: {};"/>"#,
            escape_xml(&series_class(&series.name)),
            path.join(""),
            color
        ),
    ];

    for r in &series.values {
        parts.push(format!(
            r#"<circle class="dot" cx="{}" cy="{}" r="{}" style="stroke: {};"><title>{}</title></circle>"#,
            num(x.map(r.year as f64)),
            num(y.map(r.population as f64)),
            num(POINT_RADIUS),
            color,
            escape_xml(&tooltip_text(&series.name, r))
        ));
    }

    if let Some(last) = series.last() {
        parts.push(format!(
            r#"<text class="ward-label" x="{}" y="{}" fill="{}" style="font-weight: bold; font-size: 11px;">{}</text>"#,
            num(x.map(last.year as f64) + 8.0),
            num(y.map(last.population as f64) + 4.0),
            color,
            name
        ));
    }

    parts.push("</g>".to_string());
    parts.join("\n")
}


/// Format a coordinate with at most two decimals.
fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}


pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YearExtent;

    fn range(start: i32, end: i32) -> YearRange {
        YearRange::clamped(start, end, YearExtent { min: 1980, max: 2025 })
    }

    fn series(name: &str, points: &[(i32, u64)]) -> DerivedSeries {
        DerivedSeries {
            name: name.to_string(),
            values: points.iter().map(|&(y, p)| Record::new(y, p)).collect(),
        }
    }

    #[test]
    fn test_plot_height() {
        assert!((plot_height(0) - 533.333).abs() < 0.01);
        assert!((plot_height(50) - 533.333).abs() < 0.01);
        assert!((plot_height(60) - 640.0).abs() < 0.01);
    }

    #[test]
    fn test_ticks_nice_steps() {
        let t = ticks(0.0, 1100.0, 8);
        assert_eq!(t.step, 100.0);
        assert_eq!(t.values.first(), Some(&0.0));
        assert_eq!(t.values.last(), Some(&1100.0));

        let t = ticks(1980.0, 2025.0, 10);
        assert_eq!(t.step, 5.0);
        assert_eq!(t.values.len(), 10);
    }

    #[test]
    fn test_ticks_degenerate_domain() {
        assert_eq!(ticks(2025.0, 2025.0, 10).values, vec![2025.0]);
    }

    #[test]
    fn test_scale_degenerate_maps_to_middle() {
        let s = LinearScale::new((2025.0, 2025.0), (0.0, 100.0));
        assert_eq!(s.map(2025.0), 50.0);
    }

    #[test]
    fn test_format_value_tick() {
        assert_eq!(format_value_tick(200000.0, 50000.0), "200,000");
        assert_eq!(format_value_tick(0.2, 0.1), "0.2");
    }

    #[test]
    fn test_series_class_strips_non_word() {
        assert_eq!(series_class("a-b c"), "ward-abc");
        assert_eq!(series_class("港区"), "ward-港区");
        assert_eq!(series_class("新宿(旧)_2"), "ward-新宿旧_2");
    }

    #[test]
    fn test_render_dimensions_and_content() {
        let colors = ColorAssignment::assign(["A", "B"]);
        let data = vec![series("A", &[(1990, 100), (2000, 200)]), series("B", &[(1995, 50)])];
        let input = ChartInput { series: &data, colors: &colors, range: range(1990, 2000), highlight: None };

        let chart = SvgRenderer.render(&input, Viewport { width: 960 });
        assert_eq!(chart.width(), 960.0);
        assert!((chart.height() - (plot_height(2) + 60.0)).abs() < 1e-9);

        let body = chart.body();
        assert_eq!(body.matches(r#"class="line-group""#).count(), 2);
        assert_eq!(body.matches(r#"class="dot""#).count(), 3);
        assert!(body.contains(">年</text>"));
        assert!(body.contains("人口（人）"));
        assert!(body.contains(colors.color_of("B")));
    }

    #[test]
    fn test_render_highlight_dims_others() {
        let colors = ColorAssignment::assign(["A", "B", "C"]);
        let data = vec![series("A", &[(1990, 1)]), series("B", &[(1990, 2)]), series("C", &[(1990, 3)])];
        let input = ChartInput { series: &data, colors: &colors, range: range(1990, 2000), highlight: Some("B") };

        let body = SvgRenderer.render(&input, Viewport { width: 800 }).body().to_string();
        assert_eq!(body.matches("line-group inactive").count(), 2);
        assert!(body.contains(r#"<g class="line-group" data-ward="B">"#));
    }

    #[test]
    fn test_render_no_points_uses_unit_domain() {
        let colors = ColorAssignment::default();
        let input = ChartInput { series: &[], colors: &colors, range: range(1990, 2000), highlight: None };
        let body = SvgRenderer.render(&input, Viewport { width: 800 }).body().to_string();
        assert!(body.contains(">1.0"));
    }

    #[test]
    fn test_render_narrow_container() {
        let colors = ColorAssignment::default();
        let input = ChartInput { series: &[], colors: &colors, range: range(1990, 2000), highlight: None };
        let chart = SvgRenderer.render(&input, Viewport { width: 100 });
        assert_eq!(chart.width(), 241.0);
    }

    #[test]
    fn test_escape_names() {
        let colors = ColorAssignment::assign(["<x&y>"]);
        let data = vec![series("<x&y>", &[(1990, 1)])];
        let input = ChartInput { series: &data, colors: &colors, range: range(1990, 2000), highlight: None };
        let body = SvgRenderer.render(&input, Viewport { width: 800 }).body().to_string();
        assert!(body.contains("&lt;x&amp;y&gt;"));
        assert!(!body.contains("<x&y>"));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(1.256), "1.26");
        assert_eq!(num(-0.001), "0");
    }
}
