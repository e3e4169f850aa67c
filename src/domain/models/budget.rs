use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Earliest year the dashboard offers
pub const FIRST_YEAR: i32 = 2018;

/// Query validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("locality cannot be empty")]
    EmptyLocality,

    #[error("service cannot be empty")]
    EmptyService,

    #[error("invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("invalid year {0}: must be {FIRST_YEAR} or later")]
    InvalidYear(i32),

    #[error("invalid year {year}: must not be after {current}")]
    FutureYear { year: i32, current: i32 },
}

/// Filters selected for one report fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetQuery {
    pub locality: String,
    pub service: String,
    pub year: i32,
    pub month: u32,
}

impl BudgetQuery {
    pub fn new(
        locality: impl Into<String>,
        service: impl Into<String>,
        year: i32,
        month: u32,
    ) -> Result<Self, QueryError> {
        let locality = locality.into();
        let service = service.into();

        if locality.trim().is_empty() {
            return Err(QueryError::EmptyLocality);
        }
        if service.trim().is_empty() {
            return Err(QueryError::EmptyService);
        }
        if !(1..=12).contains(&month) {
            return Err(QueryError::InvalidMonth(month));
        }
        if year < FIRST_YEAR {
            return Err(QueryError::InvalidYear(year));
        }

        Ok(Self {
            locality,
            service,
            year,
            month,
        })
    }

    /// Two-digit, zero-padded month (`"05"`)
    pub fn month_label(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Chart title: `"{service} - {locality} - {MM}/{year}"`
    pub fn title(&self) -> String {
        format!(
            "{} - {} - {}/{}",
            self.service,
            self.locality,
            self.month_label(),
            self.year
        )
    }
}

impl fmt::Display for BudgetQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.locality, self.service)
    }
}

/// One category line as reported by the financial API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedCategory {
    #[serde(rename = "cCodCateg", default, skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,

    #[serde(rename = "cDesCateg", default)]
    pub category: Option<String>,

    #[serde(rename = "nValorPrevisto", default)]
    pub planned: Option<f64>,

    #[serde(rename = "nValorRealizado", default)]
    pub realized: Option<f64>,

    /// Vendor fields the dashboard does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A normalized row of the result table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,
    pub category: String,
    pub planned: f64,
    pub realized: f64,
    pub year: i32,
    pub month: String,
    pub locality: String,
    pub service: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BudgetEntry {
    /// Normalize a reported line and tag it with the query it answers
    pub fn from_reported(reported: ReportedCategory, query: &BudgetQuery) -> Self {
        Self {
            category_code: reported.category_code,
            category: reported.category.unwrap_or_default(),
            planned: round_cents(reported.planned.unwrap_or_default()),
            realized: round_cents(reported.realized.unwrap_or_default()),
            year: query.year,
            month: query.month_label(),
            locality: query.locality.clone(),
            service: query.service.clone(),
            extra: reported.extra,
        }
    }

    /// Whether the row carries anything worth charting
    pub fn has_positive_value(&self) -> bool {
        self.planned > 0.0 || self.realized > 0.0
    }
}

/// Round to 2 decimal places; sign is preserved
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Ordered rows answering one query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BudgetTable {
    entries: Vec<BudgetEntry>,
}

impl BudgetTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize every reported line, preserving vendor order
    pub fn from_reported(reported: Vec<ReportedCategory>, query: &BudgetQuery) -> Self {
        Self {
            entries: reported
                .into_iter()
                .map(|line| BudgetEntry::from_reported(line, query))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[BudgetEntry] {
        &self.entries
    }

    /// Rows with a positive planned or realized value
    pub fn chartable(&self) -> Vec<&BudgetEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.has_positive_value())
            .collect()
    }
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message meant for the person running the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything one fetch produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchOutcome {
    pub rows: BudgetTable,
    pub notices: Vec<Notice>,
    /// Number of API calls issued
    pub attempts: u32,
}

impl FetchOutcome {
    pub fn has_errors(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| notice.level == NoticeLevel::Error)
    }
}
