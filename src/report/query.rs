//! Report query value objects.
//!
//! A [`ReportQuery`] is immutable once constructed: the audit battery builds
//! each query from constants, hands it to the fetcher, and never touches it
//! again. The date range is always the last 90 days through today — the
//! audit window is not user-parameterized.

use chrono::{Duration, NaiveDate, Utc};

/// Length of the audit window in days.
pub const AUDIT_WINDOW_DAYS: i64 = 90;

/// Inclusive date range covered by every report in the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The audit window: 90 days back through today (UTC).
    pub fn audit_window() -> Self {
        let end = Utc::now().date_naive();
        Self {
            start: end - Duration::days(AUDIT_WINDOW_DAYS),
            end,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// Single equality filter on one dimension (e.g. `eventName == "purchase"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionFilter {
    pub dimension: String,
    pub value: String,
}

/// One parameterized report request against the GA4 Data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    metrics: Vec<String>,
    dimensions: Vec<String>,
    filter: Option<DimensionFilter>,
    date_range: DateRange,
}

impl ReportQuery {
    /// An unsegmented totals query (at most one response row).
    ///
    /// # Panics
    ///
    /// Panics if `metrics` is empty — queries are built from compile-time
    /// constants and an empty metric list is a programming error.
    pub fn aggregate(metrics: &[&str]) -> Self {
        assert!(!metrics.is_empty(), "a report query needs at least one metric");
        Self {
            metrics: metrics.iter().map(|m| (*m).to_string()).collect(),
            dimensions: Vec::new(),
            filter: None,
            date_range: DateRange::audit_window(),
        }
    }

    /// A segmented query over the given dimensions, same panic contract as
    /// [`ReportQuery::aggregate`].
    pub fn dimensional(metrics: &[&str], dimensions: &[&str]) -> Self {
        let mut query = Self::aggregate(metrics);
        query.dimensions = dimensions.iter().map(|d| (*d).to_string()).collect();
        query
    }

    /// Attach the single equality filter. Consumes and returns the query so
    /// construction stays a one-shot expression.
    pub fn with_filter(mut self, dimension: &str, value: &str) -> Self {
        self.filter = Some(DimensionFilter {
            dimension: dimension.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn filter(&self) -> Option<&DimensionFilter> {
        self.filter.as_ref()
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
