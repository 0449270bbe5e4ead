//! Top-N ranking for single-dimension event reports.

use serde::Serialize;

use crate::error::{AuditError, AuditResult};

use super::table::ReportTable;

/// Fixed size of the top-events list.
pub const TOP_N: usize = 10;

/// One ranked (label, count) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub label: String,
    pub count: i64,
}

/// Rank a one-dimension, one-metric table descending by count, truncated to
/// [`TOP_N`]. The sort is stable: equal counts keep their original
/// fetch-response order, since no other tie-break is defined.
///
/// `label_prefix` is typically `"Event"`, producing `Event - page_view`.
pub fn top_entries(table: &ReportTable, label_prefix: &str) -> AuditResult<Vec<RankedEntry>> {
    if table.dimension_headers().len() != 1 || table.metric_headers().is_empty() {
        return Err(AuditError::MalformedRow(format!(
            "ranking expects one dimension and one metric, got {} and {}",
            table.dimension_headers().len(),
            table.metric_headers().len()
        )));
    }

    let mut entries = Vec::with_capacity(table.rows().len());
    for row in table.rows() {
        let label = row.dimension_values.first().ok_or_else(|| {
            AuditError::MalformedRow("ranked row missing its dimension value".into())
        })?;
        let raw = row.metric_values.first().ok_or_else(|| {
            AuditError::MalformedRow("ranked row missing its metric value".into())
        })?;
        let count = raw.parse::<i64>().map_err(|_| {
            AuditError::MalformedRow(format!("event count '{raw}' is not an integer"))
        })?;
        entries.push(RankedEntry {
            label: format!("{label_prefix} - {label}"),
            count,
        });
    }

    // Vec::sort_by is stable, which is what keeps ties in fetch order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(TOP_N);
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
