//! List command - every municipality with its color and coverage.

use std::path::PathBuf;

use anyhow::Result;

use super::shared::{data_path, load_dataset, new_session, ChartSession};
use crate::config::Settings;
use crate::data::Category;


/// Run the list command.
pub fn run(data: Option<PathBuf>) -> Result<()> {
    let settings = Settings::load()?;
    let dataset = load_dataset(&data_path(data, &settings))?;
    let session = new_session(dataset, settings.chart_width);

    for line in rows(&session) {
        println!("{line}");
    }
    Ok(())
}


/// One line per legend entry, with the record coverage from the dataset.
fn rows(session: &ChartSession) -> Vec<String> {
    session
        .legend()
        .into_iter()
        .zip(session.dataset().series())
        .map(|(entry, s)| {
            let span = match (s.records.first(), s.records.last()) {
                (Some(first), Some(last)) => format!("{}-{}", first.year, last.year),
                _ => "-".to_string(),
            };
            let category = entry.category.map(Category::label).unwrap_or("-");
            format!("{}\t{}\t{} records\t{}\t{}", entry.name, entry.color, s.records.len(), span, category)
        })
        .collect()
}
