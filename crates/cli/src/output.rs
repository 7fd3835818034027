//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use report_lib::csv::format_value;
use report_lib::ReportRow;
use tabled::{settings::Style, Table, Tabled};

/// Format used to echo the report on stdout
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShowFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// Table row for a report entry
#[derive(Tabled)]
struct RowView {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "CPU Req (m)")]
    cpu_request: String,
    #[tabled(rename = "CPU Lim (m)")]
    cpu_limit: String,
    #[tabled(rename = "Mem Req (Mi)")]
    memory_request: String,
    #[tabled(rename = "Mem Lim (Mi)")]
    memory_limit: String,
}

impl From<&ReportRow> for RowView {
    fn from(row: &ReportRow) -> Self {
        Self {
            namespace: row.namespace.clone(),
            pod: row.pod_name.clone(),
            container: row.container_name.clone(),
            cpu_request: format_value(row.cpu_request_m),
            cpu_limit: format_value(row.cpu_limit_m),
            memory_request: format_value(row.memory_request_mi),
            memory_limit: format_value(row.memory_limit_mi),
        }
    }
}

/// Render report rows in the requested format
pub fn render_rows(rows: &[ReportRow], format: ShowFormat) -> anyhow::Result<String> {
    match format {
        ShowFormat::Table => {
            if rows.is_empty() {
                return Ok("No containers found".yellow().to_string());
            }
            let views: Vec<RowView> = rows.iter().map(RowView::from).collect();
            Ok(Table::new(views).with(Style::rounded()).to_string())
        }
        ShowFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}
