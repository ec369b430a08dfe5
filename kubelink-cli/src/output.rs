//! Output formatting for CLI
//!
//! Tables, JSON or YAML for query results; colored status lines for
//! mutating operations.

use colored::Colorize;
use kubelink_api::MutationOutcome;
use kubelink_common::InfoTable;
use serde::Serialize;
use tabled::builder::Builder;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Print an info table in the specified format
pub fn print_info_table(table: &InfoTable, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(table),
        OutputFormat::Json => print_json(table)?,
        OutputFormat::Yaml => print_yaml(table)?,
    }
    Ok(())
}

/// Print rows as a table, one column per data shape field
pub fn print_table(table: &InfoTable) {
    if table.is_empty() {
        println!("{}", "No results found".yellow());
        return;
    }

    println!("{}", render_table(table));
}

/// Render rows with unset cells shown as "-"
pub fn render_table(table: &InfoTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.shape().field_names().map(str::to_string));

    for row in table.rows() {
        builder.push_record(row.cells().map(|(_, cell)| {
            cell.map(|v| v.to_display_string())
                .unwrap_or_else(|| "-".to_string())
        }));
    }

    builder.build().to_string()
}

#[derive(Serialize)]
struct OutcomeReport<'a> {
    status: &'a str,
    #[serde(flatten)]
    outcome: &'a MutationOutcome,
}

/// Print the result of a scale, delete or create request
pub fn print_outcome(operation: &str, outcome: &MutationOutcome, format: OutputFormat) -> anyhow::Result<()> {
    let report = OutcomeReport {
        status: outcome.legacy_status(),
        outcome,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Yaml => print_yaml(&report)?,
        OutputFormat::Table => match outcome {
            MutationOutcome::Applied => print_success(&format!("{}: {}", operation, outcome)),
            MutationOutcome::NotFound => print_warning(&format!("{}: {}", operation, outcome)),
            MutationOutcome::Failed(_) => print_error(&format!("{}: {}", operation, outcome)),
        },
    }
    Ok(())
}

/// Print data as pretty-printed JSON
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    println!("{}", yaml);
    Ok(())
}

/// Print a success message with green checkmark
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

/// Print an error message with red X
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Print a warning message with yellow triangle
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubelink_common::{BaseType, DataShape, Primitive};

    #[test]
    fn test_render_table_marks_unset_cells() {
        let shape = DataShape::new("PodShape")
            .with_field("podName", BaseType::String)
            .with_field("podStatus", BaseType::String);
        let mut table = InfoTable::new(shape);
        let mut row = table.new_row();
        row.set("podName", Primitive::String("web-1".into()));
        table.add_row(row).unwrap();

        let rendered = render_table(&table);
        assert!(rendered.contains("podName"));
        assert!(rendered.contains("web-1"));
        assert!(rendered.contains('-'));
    }

    #[test]
    fn test_outcome_report_keeps_legacy_status() {
        let report = OutcomeReport {
            status: MutationOutcome::NotFound.legacy_status(),
            outcome: &MutationOutcome::NotFound,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "API Request was successful");
        assert_eq!(json["outcome"], "not_found");
    }
}
