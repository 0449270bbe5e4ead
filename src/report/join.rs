//! One-directional keyed join across two independently fetched reports.
//!
//! The base table (sessions by segment) drives iteration and output order;
//! the value table (conversions by segment) is looked up by composite key,
//! defaulting to zero when a segment has no conversions. Value-table keys
//! absent from the base table are silently dropped — that asymmetry is the
//! contract, not an accident: a segment that produced conversions but no
//! sessions inside the window has no base quantity to rate against.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{AuditError, AuditResult};

use super::kpi::safe_pct2;
use super::table::ReportTable;

/// Ordered tuple of dimension values used purely as a join key. Equality is
/// exact string equality per component, no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CompositeKey(Vec<String>);

impl CompositeKey {
    pub fn components(&self) -> &[String] {
        &self.0
    }
}

/// One joined segment: base quantity, paired quantity (0 if absent on the
/// value side), and the derived percentage ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRow {
    pub key: CompositeKey,
    pub label: String,
    pub base: f64,
    pub value: f64,
    /// `value / base * 100`, rounded to 2 decimals; `0.0` when base is zero.
    pub ratio: f64,
}

impl JoinedRow {
    /// Display rendering of the ratio. The numeric [`JoinedRow::ratio`]
    /// stays available unformatted.
    pub fn display_ratio(&self) -> String {
        format!("{}%", self.ratio)
    }
}

/// Join two tables sharing the same two-dimension header shape and compute
/// the per-segment conversion ratio.
///
/// Output preserves the base table's row order, which is the order segments
/// appear in the final report. `label_prefix` is typically `"CVR"`,
/// producing labels like `CVR - Organic Search (google / organic)`.
pub fn join_ratio(
    base: &ReportTable,
    value: &ReportTable,
    label_prefix: &str,
) -> AuditResult<Vec<JoinedRow>> {
    if base.dimension_headers().len() != 2 {
        return Err(AuditError::MalformedRow(format!(
            "join base table has {} dimensions, expected 2",
            base.dimension_headers().len()
        )));
    }
    if base.dimension_headers() != value.dimension_headers() {
        return Err(AuditError::MalformedRow(format!(
            "join tables disagree on dimensions: {:?} vs {:?}",
            base.dimension_headers(),
            value.dimension_headers()
        )));
    }

    // First metric column of the value table, keyed by segment.
    let mut values: HashMap<CompositeKey, f64> = HashMap::with_capacity(value.rows().len());
    for row in value.rows() {
        let key = CompositeKey(row.dimension_values.clone());
        values.insert(key, value.metric_f64(row, 0)?);
    }

    let mut joined = Vec::with_capacity(base.rows().len());
    for row in base.rows() {
        let key = CompositeKey(row.dimension_values.clone());
        let base_qty = base.metric_f64(row, 0)?;
        let paired = values.get(&key).copied().unwrap_or(0.0);
        let label = format!(
            "{label_prefix} - {} ({})",
            row.dimension_values[0], row.dimension_values[1]
        );
        joined.push(JoinedRow {
            key,
            label,
            base: base_qty,
            value: paired,
            ratio: safe_pct2(paired, base_qty),
        });
    }
    Ok(joined)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::table::{ReportRow, ReportTable};

    fn segmented(metric: &str, rows: &[(&str, &str, &str)]) -> ReportTable {
        ReportTable::new(
            vec![
                "sessionDefaultChannelGrouping".into(),
                "sessionSourceMedium".into(),
            ],
            vec![metric.to_string()],
            rows.iter()
                .map(|(channel, medium, count)| ReportRow {
                    dimension_values: vec![(*channel).to_string(), (*medium).to_string()],
                    metric_values: vec![(*count).to_string()],
                })
                .collect(),
        )
        .expect("table")
    }

    #[test]
    fn joins_by_key_in_base_order_and_drops_extra_value_rows() {
        let base = segmented("sessions", &[("A", "X", "10"), ("A", "Y", "5")]);
        let value = segmented("conversions", &[("A", "X", "3"), ("B", "Z", "99")]);
        let joined = join_ratio(&base, &value, "CVR").expect("join");

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].label, "CVR - A (X)");
        assert_eq!(joined[0].ratio, 30.0);
        assert_eq!(joined[1].label, "CVR - A (Y)");
        assert_eq!(joined[1].ratio, 0.0);
        assert_eq!(joined[1].value, 0.0);
    }

    #[test]
    fn zero_base_is_guarded() {
        let base = segmented("sessions", &[("A", "X", "0")]);
        let value = segmented("conversions", &[("A", "X", "5")]);
        let joined = join_ratio(&base, &value, "CVR").expect("join");
        assert_eq!(joined[0].ratio, 0.0);
        assert!(!joined[0].ratio.is_nan());
    }

    #[test]
    fn display_ratio_keeps_numeric_value_accessible() {
        let base = segmented("sessions", &[("A", "X", "8")]);
        let value = segmented("conversions", &[("A", "X", "1")]);
        let joined = join_ratio(&base, &value, "CVR").expect("join");
        assert_eq!(joined[0].ratio, 12.5);
        assert_eq!(joined[0].display_ratio(), "12.5%");
    }

    #[test]
    fn mismatched_dimension_headers_are_rejected() {
        let base = segmented("sessions", &[("A", "X", "10")]);
        let value = ReportTable::new(
            vec!["deviceCategory".into(), "sessionSourceMedium".into()],
            vec!["conversions".into()],
            vec![],
        )
        .expect("table");
        let err = join_ratio(&base, &value, "CVR").unwrap_err();
        assert!(matches!(err, AuditError::MalformedRow(_)));
    }

    #[test]
    fn empty_base_yields_empty_join() {
        let base = segmented("sessions", &[]);
        let value = segmented("conversions", &[("A", "X", "3")]);
        assert!(join_ratio(&base, &value, "CVR").expect("join").is_empty());
    }
}
