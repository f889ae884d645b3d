//! In-memory ad catalog backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! The entry locks stand in for the backing store's atomic update
//! primitives: every counter mutation below is a single operation under
//! one lock, never a read-then-write across calls.

use adserve_core::error::{AdResult, AdServeError};
use adserve_core::types::*;
use chrono::{Duration, NaiveDate, Utc};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

/// Thread-safe catalog of ad campaigns. Safe for unlimited concurrent
/// readers (matcher, reporting) and concurrent attribution writers.
pub struct AdStore {
    campaigns: DashMap<Uuid, AdCampaign>,
}

impl AdStore {
    pub fn new() -> Self {
        info!("Ad store initialized (in-memory, development mode)");
        Self {
            campaigns: DashMap::new(),
        }
    }

    // ─── Catalog reads ─────────────────────────────────────────────────────

    /// Unordered snapshot for the match path.
    pub fn snapshot(&self) -> Vec<AdCampaign> {
        self.campaigns.iter().map(|r| r.value().clone()).collect()
    }

    /// All campaigns in dashboard order: priority desc, then recency desc.
    pub fn list(&self) -> Vec<AdCampaign> {
        let mut ads = self.snapshot();
        ads.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        ads
    }

    pub fn get(&self, id: Uuid) -> Option<AdCampaign> {
        self.campaigns.get(&id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    // ─── Operator CRUD ─────────────────────────────────────────────────────

    pub fn create(&self, req: CreateAdRequest) -> AdResult<AdCampaign> {
        validate(&req.title, &req.link_url, req.start_date, req.end_date, &req.targeting)?;
        let now = Utc::now();
        let ad = AdCampaign {
            id: Uuid::new_v4(),
            advertiser: req.advertiser,
            title: req.title,
            description: req.description,
            image_url: req.image_url,
            link_url: req.link_url,
            cta_text: req.cta_text,
            creative_type: req.creative_type,
            placement: req.placement,
            targeting: req.targeting,
            start_date: req.start_date,
            end_date: req.end_date,
            is_active: req.is_active,
            billing: req.billing,
            priority: req.priority,
            stats: AdStats::default(),
            created_at: now,
            updated_at: now,
        };
        self.campaigns.insert(ad.id, ad.clone());
        info!(ad_id = %ad.id, title = %ad.title, "Ad campaign created");
        Ok(ad)
    }

    /// Apply a partial update. The resulting campaign is re-validated before
    /// anything is written; a rejected update leaves the record untouched.
    pub fn update(&self, id: Uuid, req: UpdateAdRequest) -> AdResult<AdCampaign> {
        let mut entry = self
            .campaigns
            .get_mut(&id)
            .ok_or_else(|| AdServeError::NotFound(format!("ad {id}")))?;

        let mut candidate = entry.value().clone();
        if let Some(advertiser) = req.advertiser {
            candidate.advertiser = advertiser;
        }
        if let Some(title) = req.title {
            candidate.title = title;
        }
        if let Some(description) = req.description {
            candidate.description = description;
        }
        if let Some(image_url) = req.image_url {
            candidate.image_url = image_url;
        }
        if let Some(link_url) = req.link_url {
            candidate.link_url = link_url;
        }
        if let Some(cta_text) = req.cta_text {
            candidate.cta_text = cta_text;
        }
        if let Some(creative_type) = req.creative_type {
            candidate.creative_type = creative_type;
        }
        if let Some(placement) = req.placement {
            candidate.placement = placement;
        }
        if let Some(targeting) = req.targeting {
            candidate.targeting = targeting;
        }
        if let Some(start) = req.start_date {
            candidate.start_date = start;
        }
        if let Some(end) = req.end_date {
            candidate.end_date = end;
        }
        if let Some(active) = req.is_active {
            candidate.is_active = active;
        }
        if let Some(billing) = req.billing {
            candidate.billing = billing;
        }
        if let Some(priority) = req.priority {
            candidate.priority = priority;
        }

        validate(
            &candidate.title,
            &candidate.link_url,
            candidate.start_date,
            candidate.end_date,
            &candidate.targeting,
        )?;
        candidate.updated_at = Utc::now();
        *entry.value_mut() = candidate.clone();
        Ok(candidate)
    }

    pub fn delete(&self, id: Uuid) -> bool {
        let removed = self.campaigns.remove(&id).is_some();
        if removed {
            info!(ad_id = %id, "Ad campaign deleted");
        }
        removed
    }

    // ─── Attribution primitives ────────────────────────────────────────────
    //
    // Each of these is one atomic store operation. The recorder composes
    // them into the two-step counter+bucket protocol.

    /// Increment the authoritative lifetime counter. Returns the campaign's
    /// destination URL so the click path can redirect, `None` if the id does
    /// not resolve.
    pub fn increment_lifetime(&self, id: Uuid, kind: EventKind) -> Option<String> {
        self.campaigns.get_mut(&id).map(|mut entry| {
            let ad = entry.value_mut();
            match kind {
                EventKind::Impression => ad.stats.impressions += 1,
                EventKind::Click => ad.stats.clicks += 1,
            }
            ad.link_url.clone()
        })
    }

    /// Conditional atomic increment: bump the bucket for `date` only if it
    /// already exists. `false` is the zero-rows-affected signal telling the
    /// caller to fall back to the guarded append.
    pub fn try_increment_daily(&self, id: Uuid, date: NaiveDate, kind: EventKind) -> bool {
        let Some(mut entry) = self.campaigns.get_mut(&id) else {
            return false;
        };
        match entry
            .value_mut()
            .stats
            .daily
            .iter_mut()
            .find(|b| b.date == date)
        {
            Some(bucket) => {
                bump(bucket, kind);
                true
            }
            None => false,
        }
    }

    /// Guarded fallback append. Re-checks for the bucket under the entry
    /// lock and merges into it if a concurrent writer created one between
    /// the conditional increment and this call, so at most one bucket ever
    /// exists per (campaign, date).
    pub fn append_daily_bucket(&self, id: Uuid, date: NaiveDate, kind: EventKind) {
        if let Some(mut entry) = self.campaigns.get_mut(&id) {
            let daily = &mut entry.value_mut().stats.daily;
            match daily.iter_mut().find(|b| b.date == date) {
                Some(bucket) => bump(bucket, kind),
                None => {
                    let mut bucket = DailyBucket {
                        date,
                        impressions: 0,
                        clicks: 0,
                    };
                    bump(&mut bucket, kind);
                    daily.push(bucket);
                }
            }
        }
    }

    // ─── Demo data ─────────────────────────────────────────────────────────

    /// Seed a handful of local-business campaigns for development. Opt-in
    /// via `--seed-demo`; never runs by default.
    pub fn seed_demo(&self) {
        let today = Utc::now().date_naive();
        let demos = [
            (
                "SmartPOS",
                "POS terminals for restaurants",
                "Cut order mistakes with a tablet POS built for diners.",
                "https://smartpos.example/landing",
                CreativeType::NativeCard,
                Placement::SearchTop,
                CategoryTargeting::Specific(vec!["dining".into(), "restaurant".into()]),
                vec![],
                BillingModel::Monthly,
                300_000.0,
                5,
            ),
            (
                "LensWholesale",
                "Wholesale lenses for opticians",
                "Stock frames and lenses at trade prices, next-day delivery.",
                "https://lens.example/trade",
                CreativeType::BannerSidebar,
                Placement::Sidebar,
                CategoryTargeting::Specific(vec!["optician".into()]),
                vec!["gimhae".into(), "busan".into()],
                BillingModel::Weekly,
                90_000.0,
                3,
            ),
            (
                "AdReach",
                "Grow any local business",
                "Flyers, signage and local search ads in one package.",
                "https://adreach.example",
                CreativeType::TextLink,
                Placement::SearchBottom,
                CategoryTargeting::Any,
                vec![],
                BillingModel::FreeTrial,
                0.0,
                0,
            ),
        ];

        for (company, title, description, link, creative_type, placement, business_types, regions, model, amount, priority) in demos {
            let _ = self.create(CreateAdRequest {
                advertiser: Advertiser {
                    company: company.to_string(),
                    ..Advertiser::default()
                },
                title: title.to_string(),
                description: description.to_string(),
                image_url: String::new(),
                link_url: link.to_string(),
                cta_text: "Learn more".to_string(),
                creative_type,
                placement,
                targeting: AdTargeting {
                    business_types,
                    regions,
                },
                start_date: today - Duration::days(7),
                end_date: today + Duration::days(30),
                is_active: true,
                billing: Billing {
                    model,
                    amount,
                    notes: String::new(),
                },
                priority,
            });
        }
        info!(count = self.campaigns.len(), "Seeded demo ad campaigns");
    }
}

impl Default for AdStore {
    fn default() -> Self {
        Self::new()
    }
}

fn bump(bucket: &mut DailyBucket, kind: EventKind) {
    match kind {
        EventKind::Impression => bucket.impressions += 1,
        EventKind::Click => bucket.clicks += 1,
    }
}

fn validate(
    title: &str,
    link_url: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    targeting: &AdTargeting,
) -> AdResult<()> {
    if title.trim().is_empty() {
        return Err(AdServeError::Validation("title must not be empty".into()));
    }
    if link_url.trim().is_empty() {
        return Err(AdServeError::Validation(
            "linkUrl must not be empty".into(),
        ));
    }
    if start_date > end_date {
        return Err(AdServeError::Validation(format!(
            "startDate {start_date} is after endDate {end_date}"
        )));
    }
    // An empty specific set could never match a visitor; wildcard targeting
    // is the way to say "everyone".
    if matches!(&targeting.business_types, CategoryTargeting::Specific(tags) if tags.is_empty()) {
        return Err(AdServeError::Validation(
            "businessTypes must not be empty; use [\"all\"] to target every category".into(),
        ));
    }
    Ok(())
}
