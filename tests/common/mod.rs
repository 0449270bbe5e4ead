//! Shared stub fetchers for pipeline-level tests.
//!
//! The stubs dispatch on query shape (dimensions + filter), mirroring the
//! fixed audit battery, and involve no tokens or HTTP.

use serde_json::Value;

use ga_audit::AuditResult;
use ga_audit::ga4::admin::{AdminFetcher, AdminResource};
use ga_audit::ga4::data::ReportFetcher;
use ga_audit::report::query::ReportQuery;
use ga_audit::report::table::{ReportRow, ReportTable};

pub fn aggregate_table(headers: &[&str], values: &[&str]) -> ReportTable {
    ReportTable::new(
        vec![],
        headers.iter().map(|h| (*h).to_string()).collect(),
        vec![ReportRow {
            dimension_values: vec![],
            metric_values: values.iter().map(|v| (*v).to_string()).collect(),
        }],
    )
    .expect("aggregate table")
}

pub fn one_dim_table(dimension: &str, metric: &str, rows: &[(&str, &str)]) -> ReportTable {
    ReportTable::new(
        vec![dimension.to_string()],
        vec![metric.to_string()],
        rows.iter()
            .map(|(label, count)| ReportRow {
                dimension_values: vec![(*label).to_string()],
                metric_values: vec![(*count).to_string()],
            })
            .collect(),
    )
    .expect("one-dim table")
}

pub fn two_dim_table(metric: &str, rows: &[(&str, &str, &str)]) -> ReportTable {
    ReportTable::new(
        vec![
            "sessionDefaultChannelGrouping".to_string(),
            "sessionSourceMedium".to_string(),
        ],
        vec![metric.to_string()],
        rows.iter()
            .map(|(channel, medium, count)| ReportRow {
                dimension_values: vec![(*channel).to_string(), (*medium).to_string()],
                metric_values: vec![(*count).to_string()],
            })
            .collect(),
    )
    .expect("two-dim table")
}

/// Canned report responses for one healthy e-commerce property.
pub struct StubReports;

impl ReportFetcher for StubReports {
    fn fetch_report(&self, query: &ReportQuery) -> AuditResult<ReportTable> {
        let dims: Vec<&str> = query.dimensions().iter().map(String::as_str).collect();
        let filtered = query.filter().is_some();
        let table = match (dims.as_slice(), filtered) {
            ([], false) => aggregate_table(
                &["sessions", "totalUsers", "engagedSessions", "purchaseRevenue"],
                &["1200", "400", "900", "5230.5"],
            ),
            ([], true) => aggregate_table(&["eventCount"], &["60"]),
            (["sessionDefaultChannelGrouping"], false) => one_dim_table(
                "sessionDefaultChannelGrouping",
                "sessions",
                &[("Unassigned", "20"), ("Direct", "80")],
            ),
            (["deviceCategory"], false) => one_dim_table(
                "deviceCategory",
                "sessions",
                &[("desktop", "60"), ("mobile", "40")],
            ),
            (["sessionDefaultChannelGrouping", "sessionSourceMedium"], false) => two_dim_table(
                "sessions",
                &[
                    ("Organic Search", "google / organic", "10"),
                    ("Direct", "(direct) / (none)", "5"),
                ],
            ),
            (["sessionDefaultChannelGrouping", "sessionSourceMedium"], true) => two_dim_table(
                "eventCount",
                &[
                    ("Organic Search", "google / organic", "3"),
                    // Segment with conversions but no base sessions: must
                    // be dropped by the one-directional join.
                    ("Referral", "partner / referral", "99"),
                ],
            ),
            (["eventName"], false) => one_dim_table(
                "eventName",
                "eventCount",
                &[("page_view", "100"), ("session_start", "100"), ("purchase", "50")],
            ),
            _ => panic!("unexpected query shape: {dims:?} filtered={filtered}"),
        };
        Ok(table)
    }
}

/// Like [`StubReports`] but the core aggregate comes back rowless.
pub struct EmptyAggregateReports;

impl ReportFetcher for EmptyAggregateReports {
    fn fetch_report(&self, query: &ReportQuery) -> AuditResult<ReportTable> {
        if query.dimensions().is_empty() && query.filter().is_none() {
            return Ok(ReportTable::new(
                vec![],
                query.metrics().to_vec(),
                vec![],
            )
            .expect("empty table"));
        }
        StubReports.fetch_report(query)
    }
}

/// Admin stub: two-month retention, web stream present.
pub struct StubAdmin;

impl AdminFetcher for StubAdmin {
    fn fetch_admin_resource(&self, _property: &str, kind: AdminResource) -> AuditResult<Value> {
        Ok(match kind {
            AdminResource::RetentionSettings => {
                serde_json::json!({"eventDataRetention": "TWO_MONTHS"})
            }
            AdminResource::WebStreams => {
                serde_json::json!({"webDataStreams": [{"name": "properties/1/webDataStreams/9"}]})
            }
            AdminResource::IosStreams => serde_json::json!({"iosAppDataStreams": []}),
            AdminResource::AndroidStreams => serde_json::json!({"androidAppDataStreams": []}),
        })
    }
}
