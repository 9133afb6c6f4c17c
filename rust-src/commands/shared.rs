//! Dataset loading and selection flags shared by the headless commands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::cli::SelectionArgs;
use crate::config::Settings;
use crate::data::{Category, Dataset};
use crate::session::{Command, RangePreset, Session};
use crate::visualization::{SvgRenderer, TerminalSlider, Viewport};


/// Session type every command drives.
pub type ChartSession = Session<SvgRenderer, TerminalSlider>;


/// Resolve the dataset path: flag (or `POPCHART_DATA`) first, then settings.
pub fn data_path(flag: Option<PathBuf>, settings: &Settings) -> PathBuf {
    flag.unwrap_or_else(|| settings.data_path.clone())
}


/// Load the dataset, attaching the path to any failure.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let dataset = Dataset::load(path)
        .with_context(|| format!("Failed to load dataset: {}", path.display()))?;
    info!(path = %path.display(), municipalities = dataset.len(), "dataset loaded");
    Ok(dataset)
}


/// Start a session sized for `width` px.
pub fn new_session(dataset: Dataset, width: u32) -> ChartSession {
    let slider = TerminalSlider::new(dataset.year_extent());
    Session::new(dataset, SvgRenderer, slider, Viewport { width })
}


/// Apply `--select`/`--ward` and the range flags to a fresh session.
pub fn apply_selection(session: &mut ChartSession, args: &SelectionArgs) -> Result<()> {
    if !args.wards.is_empty() {
        let (known, unknown): (Vec<String>, Vec<String>) = args
            .wards
            .iter()
            .cloned()
            .partition(|name| session.dataset().contains(name));
        for name in &unknown {
            warn!(ward = %name, "municipality not in dataset, ignoring");
        }
        session.apply(Command::SelectNames(known));
    } else {
        match args.select.as_str() {
            "top" => {}
            "all" => session.apply(Command::SelectAll),
            other => match Category::from_arg(other) {
                Some(category) => session.apply(Command::SelectCategory(category)),
                None => bail!("Unknown selection: {other}"),
            },
        }
    }

    if let Some(range) = &args.range {
        match RangePreset::from_arg(range) {
            Some(preset) => session.apply(Command::Preset(preset)),
            None => bail!("Unknown range preset: {range}"),
        }
    }

    if args.from.is_some() || args.to.is_some() {
        let current = session
            .selection()
            .range()
            .context("Year range is not initialised")?;
        session.apply(Command::SetRange {
            start: args.from.unwrap_or(current.start()),
            end: args.to.unwrap_or(current.end()),
        });
    }

    Ok(())
}
