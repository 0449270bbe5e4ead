//! GA4 API boundary: OAuth token handling and the Data / Admin API clients.
//!
//! Everything network-facing lives under this module. The pipeline core
//! never sees HTTP — it consumes [`ReportTable`](crate::report::table::ReportTable)
//! values through the [`data::ReportFetcher`] and [`admin::AdminFetcher`]
//! trait seams, so tests stub the fetchers with zero token handling.

pub mod admin;
pub mod auth;
pub mod data;

use std::time::Duration;

use serde_json::Value;

use crate::error::{AuditError, AuditResult};

use auth::AccessToken;

/// Bounded per-request timeout. The pipeline is strictly sequential, so a
/// hung request would otherwise stall the whole run indefinitely.
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Blocking client with the audit timeout applied.
pub(crate) fn http_client() -> AuditResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|source| AuditError::Transport {
            endpoint: "client initialization".to_string(),
            source,
        })
}

/// Normalize a property identifier to the `properties/<id>` resource form
/// both APIs expect. Accepts either a bare numeric id or the full form.
pub fn property_resource(property: &str) -> String {
    if property.starts_with("properties/") {
        property.to_string()
    } else {
        format!("properties/{property}")
    }
}

/// Read a response body and surface failures as distinguishable errors: a
/// non-success status or a body carrying an `error` object is never passed
/// off as an empty result.
pub(crate) fn check_response(
    endpoint: &str,
    response: reqwest::blocking::Response,
) -> AuditResult<Value> {
    let status = response.status();
    let text = response.text().map_err(|source| AuditError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;
    let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

    if !status.is_success() || body.get("error").is_some() {
        // Prefer the structured message; fall back to the raw body for
        // non-JSON error pages.
        let message = body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| text.chars().take(200).collect());
        return Err(AuditError::Api {
            status: status.as_u16(),
            message,
        });
    }
    if body.is_null() && !text.trim().is_empty() {
        return Err(AuditError::Api {
            status: status.as_u16(),
            message: "response body was not valid JSON".to_string(),
        });
    }
    Ok(body)
}

/// Authenticated GET returning the checked JSON body.
pub(crate) fn get_json(
    client: &reqwest::blocking::Client,
    endpoint: &str,
    token: &AccessToken,
) -> AuditResult<Value> {
    tracing::debug!(endpoint, "GET");
    let response = client
        .get(endpoint)
        .bearer_auth(token.as_str())
        .send()
        .map_err(|source| AuditError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
    check_response(endpoint, response)
}
