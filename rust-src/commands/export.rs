//! Export command for chart artifacts.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use super::shared::{apply_selection, data_path, load_dataset, new_session};
use crate::cli::SelectionArgs;
use crate::config::{Settings, PNG_FILE_NAME, SVG_FILE_NAME};
use crate::visualization::{open_file, write_artifact, SvgExporter};


/// Run the export command.
pub fn run(
    svg: bool,
    should_open: bool,
    data: Option<PathBuf>,
    selection: &SelectionArgs,
    width: Option<u32>,
    output: Option<PathBuf>,
) -> Result<()> {
    let settings = Settings::load()?;
    let dataset = load_dataset(&data_path(data, &settings))?;

    let mut session = new_session(dataset, width.unwrap_or(settings.chart_width));
    apply_selection(&mut session, selection)?;

    // Determine format and output path
    let (format_type, file_name) = if svg { ("svg", SVG_FILE_NAME) } else { ("png", PNG_FILE_NAME) };
    let output_path = output.unwrap_or_else(|| settings.output_dir.join(file_name));

    let exporter = SvgExporter::new().with_stylesheets(settings.stylesheets.iter().cloned());

    println!("Exporting to {}...", format_type.to_uppercase());
    let bytes = if svg {
        session.export_vector(&exporter)?
    } else {
        session.export_raster(&exporter)?
    };
    write_artifact(&bytes, &output_path)?;
    info!(path = %output_path.display(), bytes = bytes.len(), "chart exported");

    println!("\x1b[32m+ Exported to: {}\x1b[0m", output_path.display());

    // Open if requested
    if should_open {
        println!("Opening {}...", format_type.to_uppercase());
        open_file(&output_path)?;
    }

    Ok(())
}
