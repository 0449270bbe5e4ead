//! Property configuration checks over the Admin API.
//!
//! Two low-complexity audits that feed the same export as the report
//! pipeline: whether event-data retention is long enough for a 90-day
//! audit window, and which kind of data stream the property has configured.

use serde::Serialize;
use serde_json::Value;

use crate::error::AuditResult;
use crate::ga4::admin::{AdminFetcher, AdminResource};

/// The two-month retention setting identifier.
const TWO_MONTH_RETENTION: &str = "TWO_MONTHS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionVerdict {
    Ok,
    TooShort,
}

impl std::fmt::Display for RetentionVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::TooShort => write!(f, "too short"),
        }
    }
}

/// Result of the data-retention check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionCheck {
    /// Raw setting identifier as returned by the API.
    pub setting: String,
    pub verdict: RetentionVerdict,
}

/// Evaluate the retention adequacy flag from a raw setting identifier.
///
/// Flagged "too short" when the setting is the two-month value or when the
/// identifier does not carry "14" (the 14-month retention marker).
pub fn retention_verdict(setting: &str) -> RetentionVerdict {
    if setting == TWO_MONTH_RETENTION || !setting.contains("14") {
        RetentionVerdict::TooShort
    } else {
        RetentionVerdict::Ok
    }
}

/// Fetch and evaluate the property's event-data retention setting.
pub fn audit_retention(admin: &dyn AdminFetcher, property: &str) -> AuditResult<RetentionCheck> {
    let body = admin.fetch_admin_resource(property, AdminResource::RetentionSettings)?;
    let setting = body
        .get("eventDataRetention")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let verdict = retention_verdict(&setting);
    tracing::debug!(%setting, ?verdict, "retention check");
    Ok(RetentionCheck { setting, verdict })
}

/// Kind of data stream found on the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Web,
    Ios,
    Android,
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Ios => write!(f, "iOS"),
            Self::Android => write!(f, "Android"),
        }
    }
}

/// Result of the data-stream presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamCheck {
    /// First stream type that yielded a non-error, non-empty listing, in
    /// web → iOS → Android fallback order. `None` when none did.
    pub stream_type: Option<StreamType>,
}

impl std::fmt::Display for StreamCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stream_type {
            Some(kind) => write!(f, "{kind}"),
            None => write!(f, "none found"),
        }
    }
}

/// Detect which kind of data stream the property has configured.
///
/// Fallback errors are swallowed here on purpose: an iOS-only property
/// answers the web-stream listing with an error or an empty collection,
/// and the point of the cascade is to keep trying.
pub fn detect_streams(admin: &dyn AdminFetcher, property: &str) -> StreamCheck {
    let candidates = [
        (AdminResource::WebStreams, StreamType::Web),
        (AdminResource::IosStreams, StreamType::Ios),
        (AdminResource::AndroidStreams, StreamType::Android),
    ];
    for (resource, stream_type) in candidates {
        match admin.fetch_admin_resource(property, resource) {
            Ok(body) => {
                let non_empty = resource
                    .collection_key()
                    .and_then(|key| body.get(key))
                    .and_then(Value::as_array)
                    .is_some_and(|streams| !streams.is_empty());
                if non_empty {
                    return StreamCheck {
                        stream_type: Some(stream_type),
                    };
                }
            }
            Err(err) => {
                tracing::debug!(?resource, %err, "stream listing failed, trying next");
            }
        }
    }
    StreamCheck { stream_type: None }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
