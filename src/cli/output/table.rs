//! Table output formatting for CLI commands
//!
//! Budget rows, configured sites and credential checks rendered with
//! comfy-table. Colors are dropped when `NO_COLOR` is set or the terminal is
//! dumb.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::env;

use crate::cli::commands::check::CredentialStatus;
use crate::domain::models::{BudgetTable, SiteConfig};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Budget rows in vendor order
    pub fn format_budget(&self, rows: &BudgetTable) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&[
            "Category", "Planned", "Realized", "Year", "Month", "Locality", "Service",
        ]));

        for entry in rows.entries() {
            table.add_row(vec![
                Cell::new(&entry.category),
                self.amount_cell(entry.planned, None),
                self.amount_cell(entry.realized, Some(entry.planned)),
                Cell::new(entry.year),
                Cell::new(&entry.month),
                Cell::new(&entry.locality),
                Cell::new(&entry.service),
            ]);
        }

        table.to_string()
    }

    /// Configured locality/service pairs
    pub fn format_sites(&self, sites: &[SiteConfig]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Locality", "Service"]));

        for site in sites {
            table.add_row(vec![Cell::new(&site.locality), Cell::new(&site.service)]);
        }

        table.to_string()
    }

    /// Which credential sections resolve
    pub fn format_credentials(&self, statuses: &[CredentialStatus]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Section", "Status", "Variables"]));

        for status in statuses {
            let label = if status.resolved { "ok" } else { "missing" };
            let status_cell = if self.use_colors {
                Cell::new(label).fg(if status.resolved {
                    Color::Green
                } else {
                    Color::Red
                })
            } else {
                let icon = if status.resolved { "✓" } else { "✗" };
                Cell::new(format!("{icon} {label}"))
            };

            table.add_row(vec![
                Cell::new(&status.section),
                status_cell,
                Cell::new(status.variables.join(", ")),
            ]);
        }

        table.to_string()
    }

    /// Right-aligned amount; realized values are colored against the plan
    fn amount_cell(&self, value: f64, planned: Option<f64>) -> Cell {
        let cell = Cell::new(format_amount(value)).set_alignment(CellAlignment::Right);
        match planned {
            Some(planned) if self.use_colors && value > planned => cell.fg(Color::Red),
            Some(_) if self.use_colors => cell.fg(Color::Green),
            _ => cell,
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

/// Check if color output is supported
pub fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    !matches!(env::var("TERM"), Ok(term) if term == "dumb")
}

/// Two decimals with thousands separators: `1234567.5` → `"1,234,567.50"`
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}
