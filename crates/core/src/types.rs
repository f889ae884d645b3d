//! Ad domain types — campaigns, targeting, placements, counters.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire-format tag for "eligible regardless of visitor category".
/// Internally the wildcard is the [`CategoryTargeting::Any`] variant;
/// the literal tag survives only at the serde boundary.
pub const WILDCARD_TAG: &str = "all";

// ─── Campaign ──────────────────────────────────────────────────────────────

/// A sponsored placement with its targeting rules, schedule, and counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCampaign {
    pub id: Uuid,
    #[serde(default)]
    pub advertiser: Advertiser,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub link_url: String,
    pub cta_text: String,
    #[serde(rename = "type")]
    pub creative_type: CreativeType,
    pub placement: Placement,
    pub targeting: AdTargeting,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub billing: Billing,
    pub priority: i32,
    pub stats: AdStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdCampaign {
    /// Schedule + kill-switch check. Both dates are inclusive.
    pub fn is_live(&self, today: NaiveDate) -> bool {
        self.is_active && self.start_date <= today && today <= self.end_date
    }
}

/// Advertiser contact block. Opaque strings, never matched on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertiser {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CreativeType {
    BannerHorizontal,
    BannerSidebar,
    NativeCard,
    TextLink,
}

impl Default for CreativeType {
    fn default() -> Self {
        CreativeType::NativeCard
    }
}

/// Named slot in the page layout where one ad may render.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    SearchTop,
    SearchMiddle,
    SearchBottom,
    Sidebar,
    ReportBottom,
    MobileSticky,
}

impl Default for Placement {
    fn default() -> Self {
        Placement::SearchTop
    }
}

impl Placement {
    /// Parse the query-string slug. Unknown slugs are `None`, never an error,
    /// so the visitor-facing match path can degrade to an empty result.
    pub fn from_slug(s: &str) -> Option<Self> {
        match s {
            "search_top" => Some(Placement::SearchTop),
            "search_middle" => Some(Placement::SearchMiddle),
            "search_bottom" => Some(Placement::SearchBottom),
            "sidebar" => Some(Placement::Sidebar),
            "report_bottom" => Some(Placement::ReportBottom),
            "mobile_sticky" => Some(Placement::MobileSticky),
            _ => None,
        }
    }

    pub fn as_slug(&self) -> &'static str {
        match self {
            Placement::SearchTop => "search_top",
            Placement::SearchMiddle => "search_middle",
            Placement::SearchBottom => "search_bottom",
            Placement::Sidebar => "sidebar",
            Placement::ReportBottom => "report_bottom",
            Placement::MobileSticky => "mobile_sticky",
        }
    }
}

// ─── Targeting ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdTargeting {
    pub business_types: CategoryTargeting,
    /// Region names the ad targets. Empty means nationwide, not "never".
    #[serde(default)]
    pub regions: Vec<String>,
}

impl Default for AdTargeting {
    fn default() -> Self {
        Self {
            business_types: CategoryTargeting::Any,
            regions: Vec::new(),
        }
    }
}

impl AdTargeting {
    /// Region predicate: empty set is nationwide; no requested region skips
    /// the filter entirely.
    pub fn accepts_region(&self, region: Option<&str>) -> bool {
        match region {
            None => true,
            Some(r) => self.regions.is_empty() || self.regions.iter().any(|x| x == r),
        }
    }
}

/// Category targeting with the wildcard as a first-class case.
///
/// On the wire this stays a plain JSON array for compatibility with stored
/// campaign payloads: `["all"]` (or any array containing `"all"`) is `Any`,
/// anything else is `Specific`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryTargeting {
    Any,
    Specific(Vec<String>),
}

impl CategoryTargeting {
    pub fn is_any(&self) -> bool {
        matches!(self, CategoryTargeting::Any)
    }
}

impl Serialize for CategoryTargeting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryTargeting::Any => serializer.collect_seq([WILDCARD_TAG]),
            CategoryTargeting::Specific(tags) => serializer.collect_seq(tags),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryTargeting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tags = Vec::<String>::deserialize(deserializer)?;
        if tags.iter().any(|t| t == WILDCARD_TAG) {
            Ok(CategoryTargeting::Any)
        } else {
            Ok(CategoryTargeting::Specific(tags))
        }
    }
}

// ─── Billing ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    pub model: BillingModel,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
}

impl Default for Billing {
    fn default() -> Self {
        Self {
            model: BillingModel::Monthly,
            amount: 0.0,
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillingModel {
    Monthly,
    Weekly,
    Cpc,
    FreeTrial,
}

// ─── Counters ──────────────────────────────────────────────────────────────

/// Lifetime counters plus the per-day breakdown.
///
/// The lifetime counters are authoritative; `daily` is a derived, best-effort
/// series keyed by calendar date, at most one bucket per date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdStats {
    pub impressions: u64,
    pub clicks: u64,
    #[serde(default)]
    pub daily: Vec<DailyBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub impressions: u64,
    pub clicks: u64,
}

/// Attribution event class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Impression,
    Click,
}

// ─── Visitor context ───────────────────────────────────────────────────────

/// Ephemeral per-request context; lives only for one matching call.
#[derive(Debug, Clone, Default)]
pub struct VisitorContext {
    pub topic: Option<String>,
    pub keyword: Option<String>,
    pub region: Option<String>,
}

/// The projection the visitor-facing match path returns. Counters, billing,
/// and the destination URL are never exposed here; clicks go through the
/// redirect endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdPlacementView {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub cta_text: String,
    #[serde(rename = "type")]
    pub creative_type: CreativeType,
    pub placement: Placement,
}

impl From<&AdCampaign> for AdPlacementView {
    fn from(ad: &AdCampaign) -> Self {
        Self {
            title: ad.title.clone(),
            description: ad.description.clone(),
            image_url: ad.image_url.clone(),
            cta_text: ad.cta_text.clone(),
            creative_type: ad.creative_type,
            placement: ad.placement,
        }
    }
}

// ─── API request types ─────────────────────────────────────────────────────

fn default_cta_text() -> String {
    "Learn more".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdRequest {
    #[serde(default)]
    pub advertiser: Advertiser,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub link_url: String,
    #[serde(default = "default_cta_text")]
    pub cta_text: String,
    #[serde(rename = "type", default)]
    pub creative_type: CreativeType,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub targeting: AdTargeting,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub billing: Billing,
    #[serde(default)]
    pub priority: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdRequest {
    pub advertiser: Option<Advertiser>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub cta_text: Option<String>,
    #[serde(rename = "type")]
    pub creative_type: Option<CreativeType>,
    pub placement: Option<Placement>,
    pub targeting: Option<AdTargeting>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub billing: Option<Billing>,
    pub priority: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_targeting_roundtrip() {
        let any: CategoryTargeting = serde_json::from_str(r#"["all"]"#).unwrap();
        assert_eq!(any, CategoryTargeting::Any);
        assert_eq!(serde_json::to_string(&any).unwrap(), r#"["all"]"#);

        // The wildcard wins even when mixed with concrete tags.
        let mixed: CategoryTargeting = serde_json::from_str(r#"["dining","all"]"#).unwrap();
        assert_eq!(mixed, CategoryTargeting::Any);
    }

    #[test]
    fn test_specific_targeting_roundtrip() {
        let t: CategoryTargeting = serde_json::from_str(r#"["dining","cafe"]"#).unwrap();
        assert_eq!(
            t,
            CategoryTargeting::Specific(vec!["dining".into(), "cafe".into()])
        );
        assert_eq!(serde_json::to_string(&t).unwrap(), r#"["dining","cafe"]"#);
    }

    #[test]
    fn test_placement_slugs() {
        for slug in [
            "search_top",
            "search_middle",
            "search_bottom",
            "sidebar",
            "report_bottom",
            "mobile_sticky",
        ] {
            let p = Placement::from_slug(slug).unwrap();
            assert_eq!(p.as_slug(), slug);
        }
        assert!(Placement::from_slug("header").is_none());
    }

    #[test]
    fn test_region_predicate() {
        let nationwide = AdTargeting::default();
        assert!(nationwide.accepts_region(None));
        assert!(nationwide.accepts_region(Some("busan")));

        let local = AdTargeting {
            business_types: CategoryTargeting::Any,
            regions: vec!["gimhae".into(), "busan".into()],
        };
        assert!(local.accepts_region(Some("busan")));
        assert!(!local.accepts_region(Some("seoul")));
        // No requested region skips the filter, it is not a non-match.
        assert!(local.accepts_region(None));
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateAdRequest = serde_json::from_str(
            r#"{
                "title": "POS terminals for diners",
                "linkUrl": "https://pos.example",
                "startDate": "2026-01-01",
                "endDate": "2026-12-31"
            }"#,
        )
        .unwrap();
        assert_eq!(req.cta_text, "Learn more");
        assert_eq!(req.creative_type, CreativeType::NativeCard);
        assert_eq!(req.placement, Placement::SearchTop);
        assert!(req.targeting.business_types.is_any());
        assert!(req.is_active);
        assert_eq!(req.priority, 0);
    }
}
