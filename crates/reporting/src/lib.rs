//! Dashboard reporting over the ad catalog. Read-only; all views here are
//! operator-facing.

pub mod aggregator;

pub use aggregator::{
    campaign_report, ctr_percent, list_with_ctr, overview, AdListItem, AdsOverview,
    CampaignReport, DEFAULT_REPORT_WINDOW,
};
