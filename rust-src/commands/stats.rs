//! Stats command - show the stats panel and a summary of drawn series.

use std::path::PathBuf;

use anyhow::Result;

use super::shared::{apply_selection, data_path, load_dataset, new_session, ChartSession};
use crate::cli::SelectionArgs;
use crate::config::Settings;
use crate::models::format_thousands;


/// Run the stats command.
pub fn run(data: Option<PathBuf>, selection: &SelectionArgs) -> Result<()> {
    let settings = Settings::load()?;
    let dataset = load_dataset(&data_path(data, &settings))?;

    let mut session = new_session(dataset, settings.chart_width);
    apply_selection(&mut session, selection)?;

    print!("{}", report(&session));
    Ok(())
}


/// Plain-text report of the current stats and derived series.
fn report(session: &ChartSession) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(60)));
    out.push_str(&format!("{:^60}\n", "Tokyo Chinese Population"));
    out.push_str(&format!("{}\n\n", "=".repeat(60)));

    out.push_str("SUMMARY\n");
    out.push_str(&format!("{}\n", "-".repeat(40)));
    if let Some(stats) = session.stats() {
        out.push_str(&format!("  Total population:    {:>15}\n", stats.total_label()));
        out.push_str(&format!("  Reporting:           {:>15}\n", stats.contributing));
        out.push_str(&format!("  Visible series:      {:>15}\n", stats.visible_count));
        out.push_str(&format!("  Period:              {:>15}\n", stats.period_label));
    }

    if let Some(message) = session.view().placeholder() {
        out.push_str(&format!("\n{}\n", message));
        return out;
    }

    out.push_str("\nSERIES\n");
    out.push_str(&format!("{}\n", "-".repeat(40)));
    for series in session.view().series() {
        let (first, last) = match (series.values.first(), series.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => continue,
        };
        out.push_str(&format!(
            "  {}  points={} years={}-{} last={}\n",
            series.name,
            series.values.len(),
            first.year,
            last.year,
            format_thousands(last.population)
        ));
    }

    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use crate::session::Command;

    fn session() -> ChartSession {
        let dataset = Dataset::from_json_str(
            r#"{
                "A": [{"year": 1990, "population": 100}, {"year": 2000, "population": 2000}],
                "B": [{"year": 1995, "population": 50}]
            }"#,
        )
        .unwrap();
        crate::commands::shared::new_session(dataset, 800)
    }

    #[test]
    fn test_report_lists_series() {
        let text = report(&session());
        assert!(text.contains("2,000人"));
        assert!(text.contains("A  points=2 years=1990-2000 last=2,000"));
        assert!(text.contains("B  points=1 years=1995-1995 last=50"));
    }

    #[test]
    fn test_report_shows_placeholder_without_selection() {
        let mut s = session();
        s.apply(Command::ClearAll);
        let text = report(&s);
        assert!(text.contains("表示する自治体を選択してください"));
        assert!(!text.contains("SERIES"));
    }
}
