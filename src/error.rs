//! Crate-wide error type for the audit pipeline and its API boundaries.
//!
//! Nothing here is retried automatically: a transport or API failure halts
//! the current audit run rather than presenting partial numbers. Guarded
//! divisions (zero denominators) are *not* errors — they yield `0` by
//! contract and never surface here.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type AuditResult<T> = std::result::Result<T, AuditError>;

/// Errors produced by the audit pipeline and the GA4 API boundaries.
#[derive(Error, Debug)]
pub enum AuditError {
    /// HTTP-level failure reaching a GA4 endpoint. Halts the run.
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a structured error payload. Halts the run.
    #[error("GA4 API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// An aggregate query returned zero rows where exactly one was expected.
    ///
    /// Policy: this is a hard error for every aggregate fetch — an empty
    /// 90-day totals response means a wrong property or missing scope, and
    /// an all-zero "audit" would be worse than failing loudly.
    #[error("aggregate report '{0}' returned no rows")]
    EmptyAggregateResult(String),

    /// A row or header shape violates the report-table contract. Defensive;
    /// halts the computation that observed it.
    #[error("malformed report row: {0}")]
    MalformedRow(String),

    /// A derivation needed a metric that the extracted set does not carry.
    #[error("metric '{0}' missing from aggregate result")]
    MissingMetric(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
