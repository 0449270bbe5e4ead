//! The fixed audit battery: which reports run, in which order, and how
//! their rows become the final [`AuditReport`].
//!
//! Every fetch completes before the next stage runs; the stages are ordered
//! by data dependency (the channel/source-medium tables must both exist
//! before the conversion join). Any halting error stops the run — partial
//! audits are never presented.

use serde::Serialize;

use crate::checks::{self, RetentionCheck, StreamCheck};
use crate::error::AuditResult;
use crate::ga4::admin::AdminFetcher;
use crate::ga4::data::ReportFetcher;

use super::join::{self, JoinedRow};
use super::kpi::{self, NamedMetrics, SegmentShare};
use super::query::{DateRange, ReportQuery};
use super::rank::{self, RankedEntry};

// Dimension names used by the battery.
const CHANNEL_GROUPING: &str = "sessionDefaultChannelGrouping";
const SOURCE_MEDIUM: &str = "sessionSourceMedium";
const DEVICE_CATEGORY: &str = "deviceCategory";
const EVENT_NAME: &str = "eventName";

/// Wire metric for raw event tallies; renamed to
/// [`kpi::PURCHASE_EVENT_COUNT`] after the purchase-filtered extraction.
const EVENT_COUNT: &str = "eventCount";

const PURCHASE_EVENT: &str = "purchase";

const CONVERSION_LABEL_PREFIX: &str = "CVR";
const EVENT_LABEL_PREFIX: &str = "Event";

/// Everything one audit run produced, in presentation order. Immutable
/// once built; discarded at the end of the run.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub property: String,
    pub range: DateRange,
    pub kpis: NamedMetrics,
    pub retention: RetentionCheck,
    pub streams: StreamCheck,
    pub device_mix: Vec<SegmentShare>,
    pub conversions: Vec<JoinedRow>,
    pub top_events: Vec<RankedEntry>,
}

/// Run the full battery against one property.
pub fn run_audit(
    reports: &dyn ReportFetcher,
    admin: &dyn AdminFetcher,
    property: &str,
) -> AuditResult<AuditReport> {
    let range = DateRange::audit_window();
    tracing::info!(property, %range, "starting audit");

    // 1. Unsegmented totals.
    let core = reports.fetch_report(&ReportQuery::aggregate(&[
        kpi::SESSIONS,
        kpi::TOTAL_USERS,
        kpi::ENGAGED_SESSIONS,
        kpi::PURCHASE_REVENUE,
    ]))?;
    let mut kpis = kpi::extract_aggregate(&core, "core KPIs")?;

    // 2. Purchase count is a separate filtered aggregate; its wire header
    //    is eventCount, stored under the purchase-count name.
    let purchases = reports.fetch_report(
        &ReportQuery::aggregate(&[EVENT_COUNT]).with_filter(EVENT_NAME, PURCHASE_EVENT),
    )?;
    let purchase_metrics = kpi::extract_aggregate(&purchases, "purchase count")?;
    kpis.insert(
        kpi::PURCHASE_EVENT_COUNT,
        purchase_metrics.require(EVENT_COUNT)?,
    );

    // 3. Ratio KPIs over the primaries.
    kpi::derive_ratios(&mut kpis)?;

    // 4. Sessions by channel grouping, for the unassigned-traffic share.
    let channels =
        reports.fetch_report(&ReportQuery::dimensional(&[kpi::SESSIONS], &[CHANNEL_GROUPING]))?;
    kpis.insert(
        kpi::PERCENT_UNASSIGNED_SESSIONS,
        kpi::percent_unassigned(&channels)?,
    );

    // 5. Device mix.
    let devices =
        reports.fetch_report(&ReportQuery::dimensional(&[kpi::SESSIONS], &[DEVICE_CATEGORY]))?;
    let device_mix = kpi::segment_shares(&devices)?;

    // 6. Conversion rate per channel/source-medium segment: sessions on the
    //    base side, purchase events on the value side.
    let base = reports.fetch_report(&ReportQuery::dimensional(
        &[kpi::SESSIONS],
        &[CHANNEL_GROUPING, SOURCE_MEDIUM],
    ))?;
    let conversions_by_segment = reports.fetch_report(
        &ReportQuery::dimensional(&[EVENT_COUNT], &[CHANNEL_GROUPING, SOURCE_MEDIUM])
            .with_filter(EVENT_NAME, PURCHASE_EVENT),
    )?;
    let conversions = join::join_ratio(&base, &conversions_by_segment, CONVERSION_LABEL_PREFIX)?;

    // 7. Top events.
    let events =
        reports.fetch_report(&ReportQuery::dimensional(&[EVENT_COUNT], &[EVENT_NAME]))?;
    let top_events = rank::top_entries(&events, EVENT_LABEL_PREFIX)?;

    // 8. Configuration checks.
    let retention = checks::audit_retention(admin, property)?;
    let streams = checks::detect_streams(admin, property);

    tracing::info!(
        property,
        kpi_count = kpis.iter().count(),
        segments = conversions.len(),
        "audit complete"
    );

    Ok(AuditReport {
        property: property.to_string(),
        range,
        kpis,
        retention,
        streams,
        device_mix,
        conversions,
        top_events,
    })
}
