//! Interactive dashboard: key bindings drive the chart session.

use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use super::shared::{data_path, new_session, ChartSession};
use crate::config::{Settings, DEFAULT_CONTAINER_WIDTH, PNG_FILE_NAME, SVG_FILE_NAME};
use crate::data::{Category, Dataset};
use crate::session::{Command, RangePreset};
use crate::visualization::{render_dashboard, write_artifact, DashboardState, SvgExporter, Viewport};


const POLL_INTERVAL: Duration = Duration::from_millis(250);
// Approximate pixel width of one terminal cell.
const CELL_WIDTH_PX: u32 = 8;
const LOAD_FAILED: &str = "データを読み込めませんでした。";


/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Session(Command),
    ToggleCursor,
    HoverCursor,
    CursorUp,
    CursorDown,
    Nudge(i32),
    SwitchHandle,
    Release,
    ExportVector,
    ExportRaster,
    Quit,
}


fn key_action(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char('a') => Action::Session(Command::SelectAll),
        KeyCode::Char('c') => Action::Session(Command::ClearAll),
        KeyCode::Char('1') => Action::Session(Command::SelectCategory(Category::Wards23)),
        KeyCode::Char('2') => Action::Session(Command::SelectCategory(Category::Tama)),
        KeyCode::Char('3') => Action::Session(Command::SelectCategory(Category::Islands)),
        KeyCode::Char('r') => Action::Session(Command::Preset(RangePreset::All)),
        KeyCode::Char('e') => Action::Session(Command::Preset(RangePreset::Early)),
        KeyCode::Char('n') => Action::Session(Command::Preset(RangePreset::Recent)),
        KeyCode::Char(' ') => Action::ToggleCursor,
        KeyCode::Char('h') => Action::HoverCursor,
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Left => Action::Nudge(-1),
        KeyCode::Right => Action::Nudge(1),
        KeyCode::Tab => Action::SwitchHandle,
        KeyCode::Enter => Action::Release,
        KeyCode::Char('s') => Action::ExportVector,
        KeyCode::Char('p') => Action::ExportRaster,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}


/// Chart width for a terminal `cols` wide, unless pinned by `--width`.
fn viewport_for(cols: u16, pinned: Option<u32>) -> Viewport {
    let width = pinned.unwrap_or(match cols {
        0 => DEFAULT_CONTAINER_WIDTH,
        cols => cols as u32 * CELL_WIDTH_PX,
    });
    Viewport { width }
}


/// Raw mode and the alternate screen, left again on drop.
struct TerminalGuard;


impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // From here on, any early return restores the terminal.
        let guard = TerminalGuard;
        stdout().execute(EnterAlternateScreen)?;
        install_panic_hook();
        Ok(guard)
    }
}


impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}


fn restore_terminal() -> std::io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?.execute(Show)?;
    Ok(())
}


/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous(info);
    }));
}


struct App {
    session: ChartSession,
    state: DashboardState,
    exporter: SvgExporter,
    output_dir: PathBuf,
    pinned_width: Option<u32>,
}


impl App {
    /// Returns `false` once the user asks to quit.
    fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::Session(command) => self.session.apply(command),
            Action::ToggleCursor => {
                if let Some(name) = self.cursor_name() {
                    self.session.apply(Command::Toggle(name));
                }
            }
            Action::HoverCursor => {
                if self.session.highlight().is_some() {
                    self.session.apply(Command::Unhover);
                } else if let Some(name) = self.cursor_name() {
                    self.session.apply(Command::Hover(name));
                }
            }
            Action::CursorUp => self.state.cursor = self.state.cursor.saturating_sub(1),
            Action::CursorDown => {
                if self.state.cursor + 1 < self.session.dataset().len() {
                    self.state.cursor += 1;
                }
            }
            Action::Nudge(steps) => self.session.slider_input(|s| s.nudge(steps)),
            Action::SwitchHandle => self.session.slider_input(|s| {
                s.switch_handle();
                Vec::new()
            }),
            Action::Release => self.session.slider_input(|s| s.release()),
            Action::ExportVector => self.export(true),
            Action::ExportRaster => self.export(false),
            Action::Quit => return false,
        }
        true
    }

    fn cursor_name(&self) -> Option<String> {
        self.session.dataset().names().nth(self.state.cursor).map(String::from)
    }

    fn export(&mut self, vector: bool) {
        let (result, file_name) = if vector {
            (self.session.export_vector(&self.exporter), SVG_FILE_NAME)
        } else {
            (self.session.export_raster(&self.exporter), PNG_FILE_NAME)
        };
        let path = self.output_dir.join(file_name);

        let message = match result.and_then(|bytes| write_artifact(&bytes, &path)) {
            Ok(()) => {
                info!(path = %path.display(), "chart exported");
                format!("保存しました: {}", path.display())
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                e.user_message()
            }
        };
        self.state.notification = Some(message);
    }

    fn resize(&mut self, cols: u16) {
        if self.pinned_width.is_none() {
            self.session.apply(Command::Resize(viewport_for(cols, None)));
        }
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| render_dashboard(frame, &self.session, &self.state))?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = key_action(key.code) {
                        if !self.handle(action) {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(cols, _) => self.resize(cols),
                _ => {}
            }
        }
    }
}


/// Run the view command.
pub fn run(data: Option<PathBuf>, output_dir: Option<PathBuf>, width: Option<u32>) -> Result<()> {
    let settings = Settings::load()?;
    let path = data_path(data, &settings);

    let dataset = match Dataset::load(&path) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("{LOAD_FAILED}");
            return Err(e).with_context(|| format!("Failed to load dataset: {}", path.display()));
        }
    };
    info!(path = %path.display(), municipalities = dataset.len(), "dataset loaded");

    let (cols, _) = crossterm::terminal::size().unwrap_or((0, 0));
    let mut app = App {
        session: new_session(dataset, viewport_for(cols, width).width),
        state: DashboardState::default(),
        exporter: SvgExporter::new().with_stylesheets(settings.stylesheets.iter().cloned()),
        output_dir: output_dir.unwrap_or_else(|| settings.output_dir.clone()),
        pinned_width: width,
    };

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    app.run_loop(&mut terminal)
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app(output_dir: PathBuf) -> App {
        let dataset = Dataset::from_json_str(
            r#"{
                "港区": [{"year": 1990, "population": 100}, {"year": 2000, "population": 200}],
                "町田市": [{"year": 1995, "population": 50}]
            }"#,
        )
        .unwrap();
        App {
            session: new_session(dataset, 800),
            state: DashboardState::default(),
            exporter: SvgExporter::new(),
            output_dir,
            pinned_width: None,
        }
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_action(KeyCode::Char('a')), Some(Action::Session(Command::SelectAll)));
        assert_eq!(
            key_action(KeyCode::Char('2')),
            Some(Action::Session(Command::SelectCategory(Category::Tama)))
        );
        assert_eq!(key_action(KeyCode::Char('j')), Some(Action::CursorDown));
        assert_eq!(key_action(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(key_action(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_viewport_for() {
        assert_eq!(viewport_for(0, None).width, DEFAULT_CONTAINER_WIDTH);
        assert_eq!(viewport_for(100, None).width, 800);
        assert_eq!(viewport_for(100, Some(1200)).width, 1200);
    }

    #[test]
    fn test_cursor_toggle_and_bounds() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path().to_path_buf());
        app.handle(Action::CursorDown);
        app.handle(Action::CursorDown);
        assert_eq!(app.state.cursor, 1);
        app.handle(Action::ToggleCursor);
        assert!(!app.session.selection().is_visible("町田市"));
    }

    #[test]
    fn test_hover_key_toggles_highlight() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path().to_path_buf());
        app.handle(Action::HoverCursor);
        assert_eq!(app.session.highlight(), Some("港区"));
        app.handle(Action::HoverCursor);
        assert_eq!(app.session.highlight(), None);
    }

    #[test]
    fn test_slider_keys_commit_on_enter() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path().to_path_buf());
        app.handle(Action::SwitchHandle);
        app.handle(Action::Nudge(-3));
        assert_eq!(app.session.selection().range().unwrap().end(), 2000);
        app.handle(Action::Release);
        assert_eq!(app.session.selection().range().unwrap().end(), 1997);
    }

    #[test]
    fn test_export_writes_fixed_name() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path().to_path_buf());
        app.handle(Action::ExportVector);
        assert!(dir.path().join(SVG_FILE_NAME).exists());
        assert!(app.state.notification.unwrap().starts_with("保存しました"));
    }

    #[test]
    fn test_export_without_chart_alerts() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path().to_path_buf());
        app.handle(Action::Session(Command::ClearAll));
        app.handle(Action::ExportVector);
        assert_eq!(app.state.notification.as_deref(), Some("チャートが表示されていません。"));
        assert!(!dir.path().join(SVG_FILE_NAME).exists());
    }

    #[test]
    fn test_terminal_restore_is_safe_when_never_entered() {
        drop(TerminalGuard);
        assert!(restore_terminal().is_ok());
    }

    #[test]
    fn test_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path().to_path_buf());
        assert!(!app.handle(Action::Quit));
    }
}
