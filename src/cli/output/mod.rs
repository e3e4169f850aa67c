//! CLI output formatting
//!
//! Commands build a serializable result and hand it to [`output`], which
//! prints either the human rendering or pretty JSON on stdout. Notices go to
//! stderr.

pub mod chart;
pub mod progress;
pub mod table;

use console::style;
use serde::Serialize;

use crate::domain::models::{Notice, NoticeLevel};

pub use chart::BarChart;
pub use progress::{create_spinner, ProgressBarExt};
pub use table::{supports_color, TableFormatter};

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// One notice as a single line, `warning: ...` or `error: ...`
pub fn format_notice(notice: &Notice, use_colors: bool) -> String {
    let label = match notice.level {
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };

    if !use_colors {
        return format!("{label}: {}", notice.message);
    }
    let painted = match notice.level {
        NoticeLevel::Warning => style(label).yellow().bold(),
        NoticeLevel::Error => style(label).red().bold(),
    };
    format!("{painted}: {}", notice.message)
}

/// Print notices on stderr in the order they were raised
pub fn print_notices(notices: &[Notice]) {
    let use_colors = supports_color();
    for notice in notices {
        eprintln!("{}", format_notice(notice, use_colors));
    }
}
