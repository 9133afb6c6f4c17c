//! Terminal dashboard: stats cards, legend, line chart and year slider.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use super::chart::Renderer;
use super::palette::hex_to_rgb;
use super::slider::TerminalSlider;
use crate::models::format_thousands;
use crate::session::Session;
use crate::state::RangeWidget;


const LEGEND_WIDTH: u16 = 30;
const KEY_HELP: &str = "a 全選択  c 全解除  1/2/3 区分  space 切替  h ハイライト  r/e/n 期間  ←/→ スライダー  tab 端点  enter 確定  s SVG  p PNG  q 終了";


/// Terminal-only UI state that is not part of the chart session.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Legend row under the cursor.
    pub cursor: usize,
    /// Last status or alert message.
    pub notification: Option<String>,
}


/// Draw the whole dashboard for one frame.
pub fn render_dashboard<R: Renderer>(
    frame: &mut Frame,
    session: &Session<R, TerminalSlider>,
    state: &DashboardState,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats
            Constraint::Min(0),    // Legend + chart
            Constraint::Length(4), // Slider
            Constraint::Length(2), // Footer
        ])
        .split(frame.area());

    render_stats(frame, session, rows[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LEGEND_WIDTH), Constraint::Min(0)])
        .split(rows[1]);

    render_legend(frame, session, state, main[0]);
    render_chart(frame, session, main[1]);
    render_slider(frame, session, rows[2]);
    render_footer(frame, state, rows[3]);
}


fn render_stats<R: Renderer>(frame: &mut Frame, session: &Session<R, TerminalSlider>, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let (total, visible, period) = match session.stats() {
        Some(s) => (s.total_label(), s.visible_count.to_string(), s.period_label.clone()),
        None => ("-".to_string(), "-".to_string(), "-".to_string()),
    };

    let card = |title: &'static str, value: String| {
        Paragraph::new(value)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White).bold())
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
    };

    frame.render_widget(card(" 総人口 ", total), cards[0]);
    frame.render_widget(card(" 表示中の自治体 ", visible), cards[1]);
    frame.render_widget(card(" 期間 ", period), cards[2]);
}


/// Legend rows with color swatches. Hidden municipalities are dimmed.
fn render_legend<R: Renderer>(
    frame: &mut Frame,
    session: &Session<R, TerminalSlider>,
    state: &DashboardState,
    area: Rect,
) {
    let entries = session.legend();
    let height = area.height.saturating_sub(2).max(1) as usize;
    let offset = state.cursor.saturating_sub(height - 1);

    let lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, entry)| {
            let (r, g, b) = hex_to_rgb(entry.color);
            let swatch_color = if entry.active { Color::Rgb(r, g, b) } else { Color::DarkGray };
            let mut text_style = if entry.active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if i == state.cursor {
                text_style = text_style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            let mark = if entry.active { "[x]" } else { "[ ]" };

            Line::from(vec![
                Span::styled("■ ", Style::default().fg(swatch_color)),
                Span::styled(format!("{} {}", mark, entry.name), text_style),
            ])
        })
        .collect();

    let title = format!(" 自治体 {}/{} ", session.selection().visible().len(), entries.len());
    let legend = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(legend, area);
}


fn render_chart<R: Renderer>(frame: &mut Frame, session: &Session<R, TerminalSlider>, area: Rect) {
    let title = match session.hover_tooltip() {
        Some(tooltip) => format!(" {} ", tooltip.replace('\n', " ")),
        None => " 中国籍人口の推移 ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let (Some(range), None) = (session.selection().range(), session.view().placeholder()) else {
        let message = session.view().placeholder().unwrap_or_default();
        let placeholder = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let series = session.view().series();
    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| s.values.iter().map(|r| (r.year as f64, r.population as f64)).collect())
        .collect();

    let highlight = session.highlight();
    let datasets: Vec<Dataset> = series
        .iter()
        .zip(&points)
        .map(|(s, data)| {
            let color = match highlight {
                Some(h) if h != s.name => Color::DarkGray,
                _ => {
                    let (r, g, b) = hex_to_rgb(session.colors().color_of(&s.name));
                    Color::Rgb(r, g, b)
                }
            };
            Dataset::default()
                .name(s.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let (x_min, x_max) = (range.start() as f64, range.end() as f64);
    let x_bounds = if x_min == x_max { [x_min - 0.5, x_max + 0.5] } else { [x_min, x_max] };
    let y_max = series
        .iter()
        .filter_map(|s| s.max_population())
        .max()
        .filter(|&m| m > 0)
        .map(|m| m as f64 * 1.1)
        .unwrap_or(1.0);

    let x_labels: Vec<Span> = [range.start(), (range.start() + range.end()) / 2, range.end()]
        .iter()
        .map(|year| Span::from(year.to_string()))
        .collect();
    let y_labels: Vec<Span> = [0.0, y_max / 2.0, y_max]
        .iter()
        .map(|v| Span::from(format_thousands(v.round() as u64)))
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("年")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("人口（人）")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(y_labels),
        )
        .legend_position(None);

    frame.render_widget(chart, area);
}


/// Track with both handles; the active one is highlighted.
fn render_slider<R: Renderer>(frame: &mut Frame, session: &Session<R, TerminalSlider>, area: Rect) {
    let slider = session.widget();
    let width = area.width.saturating_sub(4).max(2) as usize;
    let position = |handle: usize| ((slider.fraction(handle) * (width - 1) as f64).round() as usize).min(width - 1);

    let handles = [position(0), position(1)];
    let mut track: Vec<Span> = Vec::with_capacity(width);
    for col in 0..width {
        let span = if col == handles[slider.active()] {
            Span::styled("●", Style::default().fg(Color::Yellow).bold())
        } else if col == handles[1 - slider.active()] {
            Span::styled("●", Style::default().fg(Color::White))
        } else if col > handles[0] && col < handles[1] {
            Span::styled("━", Style::default().fg(Color::Cyan))
        } else {
            Span::styled("─", Style::default().fg(Color::DarkGray))
        };
        track.push(span);
    }

    let [lo, hi] = slider.values();
    let status = if slider.is_dragging() { " (未確定)" } else { "" };
    let lines = vec![
        Line::from(track),
        Line::from(vec![
            Span::styled(session.range_label().to_string(), Style::default().fg(Color::Yellow)),
            Span::styled(status, Style::default().fg(Color::Gray)),
            Span::styled(
                format!("   [{} - {}]", lo as i32, hi as i32),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let block = Block::default()
        .title(" 期間 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}


fn render_footer(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let notification = state.notification.clone().unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(KEY_HELP, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(notification, Style::default().fg(Color::White).bg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
