//! Typed report tables, parsed and validated once at the fetch boundary.
//!
//! Downstream stages (KPI extraction, joining, ranking) never index into
//! raw JSON: the fetcher converts the wire response into a [`ReportTable`]
//! whose row shape has already been checked against the headers. A table
//! with zero rows is valid — it means "no data for this query and range",
//! not a failure.

use crate::error::{AuditError, AuditResult};

/// One response row: dimension values and metric values in header order.
/// Metric values are numeric-typed strings as returned by the API; dimension
/// values are opaque labels (`"Organic Search"`, `"(not set)"`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub dimension_values: Vec<String>,
    pub metric_values: Vec<String>,
}

/// Result of executing a [`ReportQuery`](super::query::ReportQuery).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    dimension_headers: Vec<String>,
    metric_headers: Vec<String>,
    rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Build a table, enforcing the shape invariant: every row carries one
    /// value per dimension header and one per metric header.
    pub fn new(
        dimension_headers: Vec<String>,
        metric_headers: Vec<String>,
        rows: Vec<ReportRow>,
    ) -> AuditResult<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.dimension_values.len() != dimension_headers.len() {
                return Err(AuditError::MalformedRow(format!(
                    "row {idx} has {} dimension values, expected {}",
                    row.dimension_values.len(),
                    dimension_headers.len()
                )));
            }
            if row.metric_values.len() != metric_headers.len() {
                return Err(AuditError::MalformedRow(format!(
                    "row {idx} has {} metric values, expected {}",
                    row.metric_values.len(),
                    metric_headers.len()
                )));
            }
        }
        Ok(Self {
            dimension_headers,
            metric_headers,
            rows,
        })
    }

    pub fn dimension_headers(&self) -> &[String] {
        &self.dimension_headers
    }

    pub fn metric_headers(&self) -> &[String] {
        &self.metric_headers
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a metric header by name.
    pub fn metric_index(&self, name: &str) -> Option<usize> {
        self.metric_headers.iter().position(|h| h == name)
    }

    /// Parse one metric cell as `f64`, failing with [`AuditError::MalformedRow`]
    /// when the cell is not a numeric-typed string.
    pub fn metric_f64(&self, row: &ReportRow, metric_idx: usize) -> AuditResult<f64> {
        let raw = row.metric_values.get(metric_idx).ok_or_else(|| {
            AuditError::MalformedRow(format!("missing metric value at index {metric_idx}"))
        })?;
        raw.parse::<f64>().map_err(|_| {
            AuditError::MalformedRow(format!("metric value '{raw}' is not numeric"))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn row(dims: &[&str], metrics: &[&str]) -> ReportRow {
        ReportRow {
            dimension_values: dims.iter().map(|d| (*d).to_string()).collect(),
            metric_values: metrics.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    #[test]
    fn empty_table_is_valid() {
        let table = ReportTable::new(vec!["channel".into()], vec!["sessions".into()], vec![])
            .expect("empty table");
        assert!(table.is_empty());
    }

    #[test]
    fn jagged_dimension_row_is_rejected() {
        let result = ReportTable::new(
            vec!["channel".into(), "sourceMedium".into()],
            vec!["sessions".into()],
            vec![row(&["Direct"], &["10"])],
        );
        assert!(matches!(result, Err(AuditError::MalformedRow(_))));
    }

    #[test]
    fn jagged_metric_row_is_rejected() {
        let result = ReportTable::new(
            vec![],
            vec!["sessions".into(), "totalUsers".into()],
            vec![row(&[], &["10"])],
        );
        assert!(matches!(result, Err(AuditError::MalformedRow(_))));
    }

    #[test]
    fn metric_parse_rejects_non_numeric() {
        let table = ReportTable::new(
            vec![],
            vec!["sessions".into()],
            vec![row(&[], &["not-a-number"])],
        )
        .expect("table");
        let err = table.metric_f64(&table.rows()[0], 0).unwrap_err();
        assert!(matches!(err, AuditError::MalformedRow(_)));
    }

    #[test]
    fn metric_parse_reads_numeric_strings() {
        let table = ReportTable::new(vec![], vec!["sessions".into()], vec![row(&[], &["1234"])])
            .expect("table");
        assert_eq!(table.metric_f64(&table.rows()[0], 0).expect("value"), 1234.0);
    }
}
