//! Counter and bucket aggregation for the admin dashboard.

use adserve_core::types::{AdCampaign, AdTargeting, Billing, DailyBucket};
use adserve_store::AdStore;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Daily buckets returned by the per-campaign report.
pub const DEFAULT_REPORT_WINDOW: usize = 30;

/// Snapshot of everything currently live, for the dashboard header.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdsOverview {
    pub active_count: u64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub avg_ctr: f64,
    pub monthly_revenue: f64,
}

/// Per-campaign trend report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignReport {
    pub advertiser: String,
    pub title: String,
    pub period: String,
    pub targeting: AdTargeting,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub billing: Billing,
    pub daily_stats: Vec<DailyBucket>,
}

/// A campaign annotated with its own CTR for the admin list view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdListItem {
    #[serde(flatten)]
    pub campaign: AdCampaign,
    pub ctr: f64,
}

/// CTR as a percentage rounded to two decimals. Zero impressions is 0.00,
/// never a division by zero.
pub fn ctr_percent(clicks: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    let pct = clicks as f64 / impressions as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Aggregate every campaign that is live today (schedule + kill-switch).
pub fn overview(store: &AdStore, today: NaiveDate) -> AdsOverview {
    let active: Vec<AdCampaign> = store
        .snapshot()
        .into_iter()
        .filter(|ad| ad.is_live(today))
        .collect();

    let total_impressions: u64 = active.iter().map(|a| a.stats.impressions).sum();
    let total_clicks: u64 = active.iter().map(|a| a.stats.clicks).sum();
    let monthly_revenue: f64 = active.iter().map(|a| a.billing.amount).sum();

    AdsOverview {
        active_count: active.len() as u64,
        total_impressions,
        total_clicks,
        avg_ctr: ctr_percent(total_clicks, total_impressions),
        monthly_revenue,
    }
}

/// Lifetime counters, CTR, and the most recent `window` daily buckets.
pub fn campaign_report(store: &AdStore, id: Uuid, window: usize) -> Option<CampaignReport> {
    let ad = store.get(id)?;
    let skip = ad.stats.daily.len().saturating_sub(window);
    Some(CampaignReport {
        advertiser: ad.advertiser.company.clone(),
        title: ad.title.clone(),
        period: format!("{} ~ {}", ad.start_date, ad.end_date),
        targeting: ad.targeting.clone(),
        impressions: ad.stats.impressions,
        clicks: ad.stats.clicks,
        ctr: ctr_percent(ad.stats.clicks, ad.stats.impressions),
        billing: ad.billing.clone(),
        daily_stats: ad.stats.daily[skip..].to_vec(),
    })
}

/// All campaigns in dashboard order, each annotated with its CTR.
pub fn list_with_ctr(store: &AdStore) -> Vec<AdListItem> {
    store
        .list()
        .into_iter()
        .map(|campaign| {
            let ctr = ctr_percent(campaign.stats.clicks, campaign.stats.impressions);
            AdListItem { campaign, ctr }
        })
        .collect()
}
