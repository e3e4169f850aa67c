//! Horizontal grouped bar chart of planned vs realized values.
//!
//! Each category gets two bars scaled against the largest value on the
//! chart, each followed by its amount.

use console::style;

use crate::cli::output::table::format_amount;
use crate::domain::models::{BudgetEntry, BudgetQuery};

/// Heading printed above the chart
pub const CHART_HEADING: &str = "PLANNED x REALIZED";

/// Value axis label
pub const AXIS_LABEL: &str = "Value (R$)";

const DEFAULT_BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '█';

/// Renders the planned vs realized chart
#[derive(Debug, Clone, Copy)]
pub struct BarChart {
    bar_width: usize,
    use_colors: bool,
}

impl BarChart {
    pub const fn new(use_colors: bool) -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
            use_colors,
        }
    }

    #[must_use]
    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width.max(1);
        self
    }

    /// Render `rows` (already filtered to chartable entries) for `query`
    pub fn render(&self, query: &BudgetQuery, rows: &[&BudgetEntry]) -> String {
        let label_width = rows
            .iter()
            .map(|entry| entry.category.chars().count())
            .max()
            .unwrap_or(0)
            .max("Realized".len());
        let max_value = rows
            .iter()
            .flat_map(|entry| [entry.planned, entry.realized])
            .fold(0.0_f64, f64::max);

        let mut lines = vec![
            self.paint_heading(CHART_HEADING),
            String::new(),
            self.paint_title(&query.title()),
            String::new(),
        ];

        for entry in rows {
            lines.push(self.paint_category(&entry.category));
            lines.push(self.bar_line("Planned", entry.planned, max_value, label_width, Series::Planned));
            lines.push(self.bar_line("Realized", entry.realized, max_value, label_width, Series::Realized));
        }

        lines.push(String::new());
        lines.push(format!(
            "{:>width$}  {AXIS_LABEL}",
            "",
            width = label_width
        ));

        lines.join("\n")
    }

    fn bar_line(
        &self,
        label: &str,
        value: f64,
        max_value: f64,
        label_width: usize,
        series: Series,
    ) -> String {
        let length = bar_length(value, max_value, self.bar_width);
        let bar = BAR_CHAR.to_string().repeat(length);
        let bar = if self.use_colors {
            match series {
                Series::Planned => style(bar).blue().to_string(),
                Series::Realized => style(bar).green().to_string(),
            }
        } else {
            bar
        };

        format!(
            "{label:>label_width$} │{bar} {}",
            format_amount(value)
        )
    }

    fn paint_heading(&self, text: &str) -> String {
        if self.use_colors {
            style(text).bold().underlined().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_title(&self, text: &str) -> String {
        if self.use_colors {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_category(&self, text: &str) -> String {
        if self.use_colors {
            style(text).cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Series {
    Planned,
    Realized,
}

/// Bar length for `value` on a chart whose largest value is `max_value`
///
/// Non-positive values draw nothing; positive values draw at least one cell.
fn bar_length(value: f64, max_value: f64, bar_width: usize) -> usize {
    if value <= 0.0 || max_value <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let cells = ((value / max_value) * bar_width as f64).round() as usize;
    cells.clamp(1, bar_width)
}
