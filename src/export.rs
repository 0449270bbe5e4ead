//! Flat export table and CSV serialization.
//!
//! The export is a two-column `(Metric, Value)` table with a fixed section
//! order: core KPIs, configuration-audit rows, device-mix rows, conversion
//! rows, top-event rows. The ordering is part of the contract — exports
//! must be reproducible row-for-row across runs of the same data.
//!
//! Numeric values are carried as numbers until the final CSV rendering, so
//! the exported figure is exactly the figure presented on screen; display
//! strings (percent suffixes, verdict text) are formatted from the same
//! already-rounded numbers.

use std::path::Path;

use crate::error::AuditResult;
use crate::report::audit::AuditReport;

/// A cell in the export's value column: a raw number or a pre-formatted
/// display string (percentages, verdicts).
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for ExportValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // f64 Display renders the shortest exact form: 12 not 12.0,
            // 0.75 not 0.750000. The export never re-rounds.
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

/// One `(metric, value)` export row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub metric: String,
    pub value: ExportValue,
}

impl ExportRow {
    fn number(metric: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            value: ExportValue::Number(value),
        }
    }

    fn text(metric: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: ExportValue::Text(value.into()),
        }
    }
}

/// Flatten an [`AuditReport`] into export rows in the contractual order.
pub fn export_rows(report: &AuditReport) -> Vec<ExportRow> {
    let mut rows = Vec::new();

    // Core KPIs, in extraction/derivation order.
    for metric in report.kpis.iter() {
        rows.push(ExportRow::number(&metric.name, metric.value));
    }

    // Configuration audit.
    rows.push(ExportRow::text(
        "data_retention",
        report.retention.verdict.to_string(),
    ));
    rows.push(ExportRow::text("data_streams", report.streams.to_string()));

    // Device mix.
    for share in &report.device_mix {
        rows.push(ExportRow::text(
            format!("Device - {}", share.label),
            format!("{}%", share.percent),
        ));
    }

    // Conversion rate per segment, in base-table order.
    for row in &report.conversions {
        rows.push(ExportRow::text(&row.label, row.display_ratio()));
    }

    // Top events.
    for entry in &report.top_events {
        rows.push(ExportRow::number(&entry.label, entry.count as f64));
    }

    rows
}

/// Quote a CSV field per RFC 4180 when it carries a comma, quote, or
/// line break.
fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') || raw.contains('\r') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Render the export as UTF-8 CSV with the `Metric,Value` header row.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::from("Metric,Value\n");
    for row in rows {
        out.push_str(&csv_field(&row.metric));
        out.push(',');
        out.push_str(&csv_field(&row.value.to_string()));
        out.push('\n');
    }
    out
}

/// Write the CSV export to disk.
pub fn write_csv(path: &Path, rows: &[ExportRow]) -> AuditResult<()> {
    std::fs::write(path, to_csv(rows))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote CSV export");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_cells_render_shortest_form() {
        assert_eq!(ExportValue::Number(12.0).to_string(), "12");
        assert_eq!(ExportValue::Number(0.75).to_string(), "0.75");
        assert_eq!(ExportValue::Number(34.2).to_string(), "34.2");
    }

    #[test]
    fn csv_has_header_and_rows() {
        let rows = vec![
            ExportRow::number("sessions", 1200.0),
            ExportRow::text("data_retention", "too short"),
        ];
        let csv = to_csv(&rows);
        assert_eq!(csv, "Metric,Value\nsessions,1200\ndata_retention,too short\n");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let rows = vec![ExportRow::text("CVR - Direct ((direct) / (none))", "1,5%")];
        let csv = to_csv(&rows);
        assert!(csv.contains("\"1,5%\""));
        // Metric label has no comma, so it stays bare.
        assert!(csv.contains("CVR - Direct ((direct) / (none)),"));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let rows = vec![ExportRow::text("Event - say \"hi\"", "3")];
        let csv = to_csv(&rows);
        assert!(csv.contains("\"Event - say \"\"hi\"\"\",3"));
    }

    #[test]
    fn write_csv_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("audit.csv");
        let rows = vec![ExportRow::number("sessions", 7.0)];
        write_csv(&path, &rows).expect("write");
        let on_disk = std::fs::read_to_string(&path).expect("read");
        assert_eq!(on_disk, "Metric,Value\nsessions,7\n");
    }
}
