//! `sticky run`: replay a scenario script and print the resulting layout.

use std::io::IsTerminal;
use std::path::PathBuf;

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config;
use crate::error::AppError;
use crate::sim::{
    MemoryLayout, RegionSnapshot, ScenarioReport, StepRecord, StepStatus, load_scenario,
    run_scenario,
};
use crate::sticky::{MessageLevel, PinSize};

/// Longest content name shown in the region table.
const MAX_CONTENT_CHARS: usize = 28;

/// Options of the `run` command.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Scenario script, or `-` for stdin.
    pub script: PathBuf,
    /// Print the report as JSON.
    pub json: bool,
    /// Print every step while running.
    pub trace: bool,
    /// Fail if any step failed.
    pub strict: bool,
}

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Dock")]
    dock: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Selected")]
    selected: String,
    #[tabled(rename = "Sticky")]
    sticky: String,
    #[tabled(rename = "Pin")]
    pin: String,
    #[tabled(rename = "Protected")]
    protected: String,
}

impl From<&RegionSnapshot> for RegionRow {
    fn from(region: &RegionSnapshot) -> Self {
        Self {
            id: region.id.to_string(),
            content: output::truncate(&region.content, MAX_CONTENT_CHARS),
            dock: region.dock.map_or_else(|| "-".to_string(), |side| side.to_string()),
            size: format!("{}x{}", region.width, region.height),
            selected: output::format_bool(region.selected),
            sticky: output::format_bool(region.sticky),
            pin: region
                .sticky_size
                .and_then(|size| PinSize::new(size).ok())
                .map_or_else(|| "-".to_string(), |size| size.to_string()),
            protected: output::format_bool(region.no_delete_others),
        }
    }
}

/// Renders regions as a table.
fn region_table(regions: &[RegionSnapshot]) -> String {
    let rows: Vec<RegionRow> = regions.iter().map(RegionRow::from).collect();
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .with(Modify::new(Columns::new(3..4)).with(Alignment::right()))
        .with(Modify::new(Columns::new(4..8)).with(Alignment::center()))
        .to_string()
}

/// Formats one step result as a single line.
fn step_line(record: &StepRecord) -> String {
    let marker = match record.status {
        StepStatus::Ok => "✓".green(),
        StepStatus::Refused => "⊘".yellow(),
        StepStatus::Failed => "✗".red(),
    };
    format!("{marker} {:>3}. {:<15} {}", record.index, record.action.bold(), record.detail)
}

fn print_messages(record: &StepRecord) {
    for message in &record.messages {
        let label = match message.level {
            MessageLevel::Notice => "notice:".cyan(),
            MessageLevel::Warning => "warning:".yellow(),
        };
        println!("        {label} {}", message.text);
    }
}

fn print_trace(record: &StepRecord, layout: &MemoryLayout) {
    println!("{}", step_line(record));
    print_messages(record);
    println!("{}", region_table(&layout.snapshot()));
}

fn print_report(report: &ScenarioReport, traced: bool) {
    if !traced {
        for record in &report.steps {
            println!("{}", step_line(record));
            print_messages(record);
        }
        println!();
    }

    let state = if report.enabled { "enabled".green() } else { "disabled".red() };
    println!(
        "{}",
        format!(
            "Regions ({}) in {}x{} frame, sticky {state}",
            report.regions.len(),
            report.frame.width,
            report.frame.height
        )
        .bold()
    );
    println!("{}", region_table(&report.regions));

    let failures = report.failures().count();
    if failures > 0 {
        println!("{} {failures} step(s) failed", "Error:".red());
    }
}

/// Runs a scenario script.
///
/// # Errors
///
/// Returns an error if the configuration or the script cannot be loaded, or
/// if `strict` is set and a step failed.
pub fn execute(options: &RunOptions) -> Result<(), AppError> {
    let config = config::try_init()?;
    let scenario = load_scenario(&options.script)?;
    tracing::info!(
        script = %options.script.display(),
        steps = scenario.steps.len(),
        "running scenario"
    );

    let trace = options.trace && !options.json;
    let report = run_scenario(&scenario, config, |record, layout| {
        if trace {
            print_trace(record, layout);
        }
    });

    if options.json {
        let value = serde_json::to_value(&report)?;
        if std::io::stdout().is_terminal() {
            output::print_highlighted_json(&value);
        } else {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    } else {
        print_report(&report, trace);
    }

    let count = report.failures().count();
    if options.strict && count > 0 {
        return Err(AppError::StepsFailed { count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StickyWindowsConfig;
    use crate::sim::parse_scenario;

    fn sample_report() -> ScenarioReport {
        let scenario = parse_scenario(
            r#"{
                "frame": { "width": 100, "height": 40 },
                "enabled": true,
                "steps": [
                    { "action": "stick", "content": "*a very long compilation buffer name*", "side": "bottom", "size": 0.25 },
                    { "action": "delete", "region": 1 },
                    { "action": "unstick", "region": 1 }
                ]
            }"#,
        )
        .unwrap();
        run_scenario(&scenario, &StickyWindowsConfig::default(), |_, _| {})
    }

    #[test]
    fn test_region_row_formats_sticky_region() {
        let report = sample_report();
        let sticky = report.regions.iter().find(|r| r.sticky).unwrap();
        let row = RegionRow::from(sticky);

        assert_eq!(row.dock, "bottom");
        assert_eq!(row.pin, "25%");
        assert_eq!(row.size, "100x10");
        assert!(row.content.ends_with('…'));
        assert!(row.content.chars().count() <= MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_region_row_formats_body_region() {
        let report = sample_report();
        let body = report.regions.iter().find(|r| !r.sticky).unwrap();
        let row = RegionRow::from(body);

        assert_eq!(row.dock, "-");
        assert_eq!(row.pin, "-");
    }

    #[test]
    fn test_region_table_lists_every_region() {
        let report = sample_report();
        let table = region_table(&report.regions);
        assert!(table.contains("#1"));
        assert!(table.contains("#2"));
        assert!(table.contains("Protected"));
    }

    #[test]
    fn test_step_line_shows_status_and_detail() {
        let report = sample_report();
        assert!(step_line(&report.steps[1]).contains("refused to delete #1"));
        assert!(step_line(&report.steps[2]).contains("not sticky"));
    }

    #[test]
    fn test_execute_missing_script_is_scenario_error() {
        let options = RunOptions {
            script: PathBuf::from("/nonexistent/sticky/scenario.jsonc"),
            json: false,
            trace: false,
            strict: false,
        };
        assert!(matches!(execute(&options), Err(AppError::ScenarioError(_))));
    }
}
