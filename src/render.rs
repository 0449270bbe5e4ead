//! Terminal rendering of the audit summary.
//!
//! The renderer consumes the report structures unmodified — every number it
//! prints is the same number the export carries. `--json` emits the whole
//! report for machine consumption instead.

use colored::Colorize;

use crate::checks::RetentionVerdict;
use crate::report::audit::AuditReport;

fn section(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Print the executive summary for one audit run.
pub fn print_summary(report: &AuditReport) {
    println!(
        "{} {} ({})",
        "GA4 audit for".bold(),
        report.property.cyan(),
        report.range
    );

    section("Core KPIs");
    for metric in report.kpis.iter() {
        println!("  {:<32} {}", metric.name, metric.value);
    }

    section("Configuration");
    let verdict = match report.retention.verdict {
        RetentionVerdict::Ok => report.retention.verdict.to_string().green(),
        RetentionVerdict::TooShort => report.retention.verdict.to_string().red(),
    };
    println!(
        "  {:<32} {} ({})",
        "data retention", verdict, report.retention.setting
    );
    println!("  {:<32} {}", "data streams", report.streams);

    section("Device mix");
    for share in &report.device_mix {
        println!("  {:<32} {}%", share.label, share.percent);
    }
    if report.device_mix.is_empty() {
        println!("  (no data)");
    }

    section("Conversion rate by segment");
    for row in &report.conversions {
        println!("  {:<48} {}", row.label, row.display_ratio());
    }
    if report.conversions.is_empty() {
        println!("  (no data)");
    }

    section("Top events");
    for entry in &report.top_events {
        println!("  {:<48} {}", entry.label, entry.count);
    }
    if report.top_events.is_empty() {
        println!("  (no data)");
    }
}

/// Serialize the full report as pretty JSON.
pub fn to_json(report: &AuditReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
