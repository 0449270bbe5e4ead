//! GA4 Data API client: `runReport` over one property.
//!
//! The wire response is parsed into a typed [`ReportTable`] here, once,
//! with its shape validated — downstream stages never touch raw JSON.

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};
use crate::report::query::ReportQuery;
use crate::report::table::{ReportRow, ReportTable};

use super::auth::AccessToken;
use super::property_resource;

const DATA_API_BASE: &str = "https://analyticsdata.googleapis.com/v1beta";

/// Boundary seam for report execution. The audit pipeline depends on this
/// trait only; tests substitute a canned-table stub.
pub trait ReportFetcher {
    fn fetch_report(&self, query: &ReportQuery) -> AuditResult<ReportTable>;
}

/// Blocking `runReport` client bound to one property for the session.
pub struct DataApiClient {
    http: reqwest::blocking::Client,
    token: AccessToken,
    property: String,
}

impl DataApiClient {
    pub fn new(token: AccessToken, property: &str) -> AuditResult<Self> {
        Ok(Self {
            http: super::http_client()?,
            token,
            property: property_resource(property),
        })
    }
}

impl ReportFetcher for DataApiClient {
    fn fetch_report(&self, query: &ReportQuery) -> AuditResult<ReportTable> {
        let endpoint = format!("{DATA_API_BASE}/{}:runReport", self.property);
        tracing::debug!(%endpoint, metrics = ?query.metrics(), dimensions = ?query.dimensions(), "runReport");

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(self.token.as_str())
            .json(&RunReportRequest::from_query(query))
            .send()
            .map_err(|source| AuditError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let body = super::check_response(&endpoint, response)?;
        let parsed: RunReportResponse = serde_json::from_value(body).map_err(|err| {
            AuditError::MalformedRow(format!("unexpected runReport response shape: {err}"))
        })?;
        parsed.into_table()
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReportRequest {
    date_ranges: Vec<ApiDateRange>,
    metrics: Vec<ApiName>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dimensions: Vec<ApiName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension_filter: Option<ApiFilterExpression>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiDateRange {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Serialize)]
struct ApiName {
    name: String,
}

#[derive(Debug, Serialize)]
struct ApiFilterExpression {
    filter: ApiFilter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiFilter {
    field_name: String,
    string_filter: ApiStringFilter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiStringFilter {
    match_type: String,
    value: String,
}

impl RunReportRequest {
    fn from_query(query: &ReportQuery) -> Self {
        let range = query.date_range();
        Self {
            date_ranges: vec![ApiDateRange {
                start_date: range.start.format("%Y-%m-%d").to_string(),
                end_date: range.end.format("%Y-%m-%d").to_string(),
            }],
            metrics: query
                .metrics()
                .iter()
                .map(|name| ApiName { name: name.clone() })
                .collect(),
            dimensions: query
                .dimensions()
                .iter()
                .map(|name| ApiName { name: name.clone() })
                .collect(),
            dimension_filter: query.filter().map(|filter| ApiFilterExpression {
                filter: ApiFilter {
                    field_name: filter.dimension.clone(),
                    string_filter: ApiStringFilter {
                        match_type: "EXACT".to_string(),
                        value: filter.value.clone(),
                    },
                },
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunReportResponse {
    #[serde(default)]
    dimension_headers: Vec<ApiHeader>,
    #[serde(default)]
    metric_headers: Vec<ApiHeader>,
    #[serde(default)]
    rows: Vec<ApiRow>,
}

#[derive(Debug, Deserialize)]
struct ApiHeader {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRow {
    #[serde(default)]
    dimension_values: Vec<ApiValue>,
    #[serde(default)]
    metric_values: Vec<ApiValue>,
}

#[derive(Debug, Deserialize)]
struct ApiValue {
    #[serde(default)]
    value: String,
}

impl RunReportResponse {
    fn into_table(self) -> AuditResult<ReportTable> {
        ReportTable::new(
            self.dimension_headers.into_iter().map(|h| h.name).collect(),
            self.metric_headers.into_iter().map(|h| h.name).collect(),
            self.rows
                .into_iter()
                .map(|row| ReportRow {
                    dimension_values: row.dimension_values.into_iter().map(|v| v.value).collect(),
                    metric_values: row.metric_values.into_iter().map(|v| v.value).collect(),
                })
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_into_validated_table() {
        let body = serde_json::json!({
            "dimensionHeaders": [{"name": "sessionDefaultChannelGrouping"}],
            "metricHeaders": [{"name": "sessions", "type": "TYPE_INTEGER"}],
            "rows": [
                {
                    "dimensionValues": [{"value": "Organic Search"}],
                    "metricValues": [{"value": "1543"}]
                },
                {
                    "dimensionValues": [{"value": "(not set)"}],
                    "metricValues": [{"value": "12"}]
                }
            ],
            "rowCount": 2
        });
        let parsed: RunReportResponse = serde_json::from_value(body).expect("parse");
        let table = parsed.into_table().expect("table");
        assert_eq!(table.dimension_headers(), ["sessionDefaultChannelGrouping"]);
        assert_eq!(table.metric_headers(), ["sessions"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0].dimension_values[0], "Organic Search");
    }

    #[test]
    fn rowless_response_is_a_valid_empty_table() {
        let body = serde_json::json!({
            "metricHeaders": [{"name": "sessions"}],
            "rowCount": 0
        });
        let parsed: RunReportResponse = serde_json::from_value(body).expect("parse");
        let table = parsed.into_table().expect("table");
        assert!(table.is_empty());
        assert_eq!(table.metric_headers(), ["sessions"]);
    }

    #[test]
    fn request_serializes_filter_and_range() {
        let query = ReportQuery::dimensional(&["eventCount"], &["eventName"])
            .with_filter("eventName", "purchase");
        let request = RunReportRequest::from_query(&query);
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["metrics"][0]["name"], "eventCount");
        assert_eq!(json["dimensions"][0]["name"], "eventName");
        assert_eq!(
            json["dimensionFilter"]["filter"]["stringFilter"]["value"],
            "purchase"
        );
        assert_eq!(
            json["dimensionFilter"]["filter"]["stringFilter"]["matchType"],
            "EXACT"
        );
        assert!(json["dateRanges"][0]["startDate"].is_string());
    }

    #[test]
    fn aggregate_request_omits_dimensions() {
        let query = ReportQuery::aggregate(&["sessions"]);
        let json = serde_json::to_value(RunReportRequest::from_query(&query)).expect("serialize");
        assert!(json.get("dimensions").is_none());
        assert!(json.get("dimensionFilter").is_none());
    }
}
