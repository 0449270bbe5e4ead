//! The metrics-derivation pipeline.
//!
//! Four cooperating stages turn raw report tables into the audit's derived
//! values: KPI extraction over aggregate totals ([`kpi`]), a key-based join
//! across independently fetched segment tables ([`join`]), top-N ranking
//! ([`rank`]), and the orchestration that runs them in dependency order
//! ([`audit`]). [`query`] and [`table`] carry the validated contract
//! between the stages and the fetch boundary.

pub mod audit;
pub mod join;
pub mod kpi;
pub mod query;
pub mod rank;
pub mod table;
