//! KPI extraction and guarded derived ratios.
//!
//! All division operations are safe against zero denominators and yield
//! `0.0` rather than NaN / Infinity — the zero result is the contract, not
//! an error. Rounding is half-to-even to 2 decimal places throughout.

use serde::Serialize;

use crate::error::{AuditError, AuditResult};

use super::table::ReportTable;

// Primary metric names as they appear in report metric headers.
pub const SESSIONS: &str = "sessions";
pub const TOTAL_USERS: &str = "totalUsers";
pub const ENGAGED_SESSIONS: &str = "engagedSessions";
pub const PURCHASE_REVENUE: &str = "purchaseRevenue";
pub const PURCHASE_EVENT_COUNT: &str = "purchaseEventCount";

// Derived metric names.
pub const SESSIONS_PER_USER: &str = "sessions_per_user";
pub const ENGAGEMENT_RATE: &str = "engagement_rate";
pub const PURCHASE_EVENT_COUNT_PER_USER: &str = "purchase_event_count_per_user";
pub const PERCENT_UNASSIGNED_SESSIONS: &str = "percent_unassigned_sessions";

/// Channel-grouping label GA4 assigns to traffic it could not attribute.
const UNASSIGNED_CHANNEL: &str = "Unassigned";

/// One named scalar metric, primary (copied from a fetched value) or
/// derived (computed from other metrics).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedMetric {
    pub name: String,
    pub value: f64,
}

/// Ordered, uniquely-named metric set for one audit run. Insertion order is
/// preserved — it drives the order of the executive summary and the export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NamedMetrics {
    entries: Vec<NamedMetric>,
}

impl NamedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a metric. Names are unique within a computation; re-inserting
    /// an existing name is a programming error.
    pub fn insert(&mut self, name: &str, value: f64) {
        debug_assert!(
            self.get(name).is_none(),
            "metric '{name}' inserted twice"
        );
        self.entries.push(NamedMetric {
            name: name.to_string(),
            value,
        });
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }

    /// Like [`NamedMetrics::get`] but a missing name is an error — used by
    /// derivations whose inputs are required.
    pub fn require(&self, name: &str) -> AuditResult<f64> {
        self.get(name)
            .ok_or_else(|| AuditError::MissingMetric(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedMetric> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Share of total sessions held by one segment (device mix).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentShare {
    pub label: String,
    pub sessions: f64,
    /// Percent of total sessions, rounded to 2 decimals. `0.0` when the
    /// total is zero.
    pub percent: f64,
}

/// Round half-to-even to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `numerator / denominator` rounded to 2 decimals, `0.0` when the
/// denominator is zero. Never NaN, never infinite, never panics.
pub fn safe_ratio2(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        round2(numerator / denominator)
    }
}

/// Percentage safe against a zero denominator, rounded to 2 decimals.
pub fn safe_pct2(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        round2(numerator / denominator * 100.0)
    }
}

/// Extract named metrics from an unsegmented aggregate table.
///
/// The table is contractually zero-or-one row. Zero rows is a hard
/// [`AuditError::EmptyAggregateResult`]; more than one row means the query
/// was not actually an aggregate and is rejected as malformed.
pub fn extract_aggregate(table: &ReportTable, context: &str) -> AuditResult<NamedMetrics> {
    let row = match table.rows() {
        [] => return Err(AuditError::EmptyAggregateResult(context.to_string())),
        [row] => row,
        rows => {
            return Err(AuditError::MalformedRow(format!(
                "aggregate '{context}' returned {} rows, expected at most one",
                rows.len()
            )));
        }
    };

    let mut metrics = NamedMetrics::new();
    for (idx, header) in table.metric_headers().iter().enumerate() {
        metrics.insert(header, table.metric_f64(row, idx)?);
    }
    Ok(metrics)
}

/// Compute the three core derived ratios in place. Requires the primary
/// metrics named above to be present already.
pub fn derive_ratios(metrics: &mut NamedMetrics) -> AuditResult<()> {
    let sessions = metrics.require(SESSIONS)?;
    let users = metrics.require(TOTAL_USERS)?;
    let engaged = metrics.require(ENGAGED_SESSIONS)?;
    let purchases = metrics.require(PURCHASE_EVENT_COUNT)?;

    metrics.insert(SESSIONS_PER_USER, safe_ratio2(sessions, users));
    metrics.insert(ENGAGEMENT_RATE, safe_ratio2(engaged, sessions));
    metrics.insert(
        PURCHASE_EVENT_COUNT_PER_USER,
        safe_ratio2(purchases, users),
    );
    Ok(())
}

/// Percent of sessions in the `Unassigned` channel, from a sessions-by-
/// channel-grouping table (one dimension, sessions as first metric).
///
/// An empty table is meaningful here (no segmented data) and yields `0.0`.
pub fn percent_unassigned(channels: &ReportTable) -> AuditResult<f64> {
    let mut unassigned = 0.0;
    let mut total = 0.0;
    for row in channels.rows() {
        let sessions = channels.metric_f64(row, 0)?;
        let channel = row.dimension_values.first().ok_or_else(|| {
            AuditError::MalformedRow("channel row missing its dimension value".into())
        })?;
        if channel == UNASSIGNED_CHANNEL {
            unassigned += sessions;
        }
        total += sessions;
    }
    Ok(safe_pct2(unassigned, total))
}

/// Per-segment share of total sessions, preserving fetch-response order.
/// Used for the device-mix section.
pub fn segment_shares(table: &ReportTable) -> AuditResult<Vec<SegmentShare>> {
    let mut counts = Vec::with_capacity(table.rows().len());
    let mut total = 0.0;
    for row in table.rows() {
        let sessions = table.metric_f64(row, 0)?;
        let label = row.dimension_values.first().ok_or_else(|| {
            AuditError::MalformedRow("segment row missing its dimension value".into())
        })?;
        total += sessions;
        counts.push((label.clone(), sessions));
    }
    Ok(counts
        .into_iter()
        .map(|(label, sessions)| SegmentShare {
            label,
            sessions,
            percent: safe_pct2(sessions, total),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
