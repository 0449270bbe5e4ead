//! GA4 property audit tool.
//!
//! Fetches a fixed battery of 90-day reports from the Google Analytics
//! Data API, derives KPIs (guarded ratios, a per-segment conversion join,
//! a top-events ranking), checks property configuration via the Admin API,
//! and renders an executive summary plus a flat CSV export.
//!
//! The pipeline core lives in [`report`]; everything network-facing is
//! behind the trait seams in [`ga4`], so the core is testable with stub
//! fetchers and no token handling.

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ga4;
pub mod render;
pub mod report;

pub use cli::{Cli, Commands, run};
pub use error::{AuditError, AuditResult};
