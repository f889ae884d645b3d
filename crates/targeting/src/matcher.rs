//! Eligibility matcher — selects the ranked, eligible ads for a placement
//! slot. Pure read over a campaign snapshot.

use crate::inference::{infer, CategorySet};
use adserve_core::types::{AdCampaign, AdPlacementView, Placement, VisitorContext};
use chrono::NaiveDate;

/// One primary ad per slot plus one alternate.
pub const DEFAULT_MATCH_LIMIT: usize = 2;

/// Full eligibility predicate. An ad qualifies iff it is live today
/// (kill-switch + inclusive schedule), sits in the requested placement,
/// its category targeting accepts the inferred set, and its region
/// targeting accepts the requested region.
pub fn is_eligible(
    ad: &AdCampaign,
    placement: Option<Placement>,
    categories: &CategorySet,
    region: Option<&str>,
    today: NaiveDate,
) -> bool {
    if !ad.is_live(today) {
        return false;
    }
    if let Some(p) = placement {
        if ad.placement != p {
            return false;
        }
    }
    if !categories.matches(&ad.targeting.business_types) {
        return false;
    }
    ad.targeting.accepts_region(region)
}

/// Rank eligible ads and project the visitor-safe view.
///
/// Ranking is priority descending, tie-broken by creation time descending
/// (newer campaigns win ties), truncated to `limit`. An empty result means
/// "no ad available", never an error.
pub fn select_ads(
    ads: &[AdCampaign],
    ctx: &VisitorContext,
    placement: Option<Placement>,
    today: NaiveDate,
    limit: usize,
) -> Vec<AdPlacementView> {
    let categories = infer(ctx.topic.as_deref(), ctx.keyword.as_deref());

    let mut eligible: Vec<&AdCampaign> = ads
        .iter()
        .filter(|ad| is_eligible(ad, placement, &categories, ctx.region.as_deref(), today))
        .collect();

    eligible.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    eligible.truncate(limit);

    eligible.into_iter().map(AdPlacementView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adserve_core::types::*;
    use chrono::{Duration, TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    fn campaign(
        title: &str,
        placement: Placement,
        business_types: CategoryTargeting,
        regions: Vec<String>,
        priority: i32,
    ) -> AdCampaign {
        let created = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        AdCampaign {
            id: Uuid::new_v4(),
            advertiser: Advertiser::default(),
            title: title.to_string(),
            description: String::new(),
            image_url: String::new(),
            link_url: "https://x.example".to_string(),
            cta_text: "Learn more".to_string(),
            creative_type: CreativeType::NativeCard,
            placement,
            targeting: AdTargeting {
                business_types,
                regions,
            },
            start_date: today() - Duration::days(1),
            end_date: today() + Duration::days(1),
            is_active: true,
            billing: Billing::default(),
            priority,
            stats: AdStats::default(),
            created_at: created,
            updated_at: created,
        }
    }

    fn ctx(topic: &str) -> VisitorContext {
        VisitorContext {
            topic: Some(topic.to_string()),
            keyword: None,
            region: None,
        }
    }

    #[test]
    fn test_concrete_scenario_priority_order_and_kill_switch() {
        let a = campaign(
            "A",
            Placement::SearchTop,
            CategoryTargeting::Specific(vec!["dining".into()]),
            vec![],
            5,
        );
        let b = campaign("B", Placement::SearchTop, CategoryTargeting::Any, vec![], 1);
        let mut ads = vec![b.clone(), a.clone()];

        let result = select_ads(
            &ads,
            &ctx("restaurant"),
            Some(Placement::SearchTop),
            today(),
            DEFAULT_MATCH_LIMIT,
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "A");
        assert_eq!(result[1].title, "B");

        // Operator kill-switch drops A regardless of schedule.
        ads[1].is_active = false;
        let result = select_ads(
            &ads,
            &ctx("restaurant"),
            Some(Placement::SearchTop),
            today(),
            DEFAULT_MATCH_LIMIT,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "B");
    }

    #[test]
    fn test_placement_must_match_exactly() {
        let ad = campaign(
            "sidebar only",
            Placement::Sidebar,
            CategoryTargeting::Any,
            vec![],
            0,
        );
        let result = select_ads(&[ad], &ctx("restaurant"), Some(Placement::SearchTop), today(), 2);
        assert!(result.is_empty());
    }

    #[test]
    fn test_schedule_bounds_are_inclusive() {
        let mut ad = campaign("a", Placement::SearchTop, CategoryTargeting::Any, vec![], 0);
        ad.start_date = today();
        ad.end_date = today();
        let cats = CategorySet::Any;
        assert!(is_eligible(&ad, None, &cats, None, today()));
        assert!(!is_eligible(&ad, None, &cats, None, today() + Duration::days(1)));
        assert!(!is_eligible(&ad, None, &cats, None, today() - Duration::days(1)));
    }

    #[test]
    fn test_wildcard_campaign_matches_every_inferred_category() {
        let ad = campaign("w", Placement::SearchTop, CategoryTargeting::Any, vec![], 0);
        for topic in ["restaurant", "cafe", "pets", "unknown-topic"] {
            let result = select_ads(&[ad.clone()], &ctx(topic), Some(Placement::SearchTop), today(), 2);
            assert_eq!(result.len(), 1, "topic {topic} should match wildcard ad");
        }
    }

    #[test]
    fn test_empty_regions_means_nationwide() {
        let nationwide = campaign("n", Placement::SearchTop, CategoryTargeting::Any, vec![], 0);
        let local = campaign(
            "l",
            Placement::SearchTop,
            CategoryTargeting::Any,
            vec!["gimhae".into()],
            0,
        );
        let mut c = ctx("restaurant");
        c.region = Some("busan".into());

        let result = select_ads(
            &[nationwide.clone(), local.clone()],
            &c,
            Some(Placement::SearchTop),
            today(),
            5,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "n");

        // No requested region skips the region filter entirely.
        c.region = None;
        let result = select_ads(&[nationwide, local], &c, Some(Placement::SearchTop), today(), 5);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_limit_truncates_eligible_set() {
        let ads: Vec<AdCampaign> = (0..6)
            .map(|i| {
                campaign(
                    &format!("ad{i}"),
                    Placement::SearchTop,
                    CategoryTargeting::Any,
                    vec![],
                    i,
                )
            })
            .collect();
        let result = select_ads(&ads, &ctx("restaurant"), Some(Placement::SearchTop), today(), 2);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "ad5");
        assert_eq!(result[1].title, "ad4");
    }

    #[test]
    fn test_ranking_ties_broken_by_recency() {
        let mut older = campaign("older", Placement::SearchTop, CategoryTargeting::Any, vec![], 3);
        let mut newer = campaign("newer", Placement::SearchTop, CategoryTargeting::Any, vec![], 3);
        older.created_at = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        newer.created_at = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();

        let ads = vec![older, newer];
        let first = select_ads(&ads, &ctx("restaurant"), Some(Placement::SearchTop), today(), 5);
        let second = select_ads(&ads, &ctx("restaurant"), Some(Placement::SearchTop), today(), 5);

        assert_eq!(first[0].title, "newer");
        assert_eq!(first[1].title, "older");
        // Deterministic on unchanged data.
        let order: Vec<&str> = first.iter().map(|v| v.title.as_str()).collect();
        let order2: Vec<&str> = second.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(order, order2);
    }

    #[test]
    fn test_projection_hides_counters_and_destination() {
        let ad = campaign("p", Placement::SearchTop, CategoryTargeting::Any, vec![], 0);
        let result = select_ads(&[ad], &ctx("restaurant"), Some(Placement::SearchTop), today(), 2);
        let json = serde_json::to_value(&result[0]).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("title"));
        assert!(obj.contains_key("imageUrl"));
        assert!(obj.contains_key("ctaText"));
        assert!(obj.contains_key("type"));
        assert!(!obj.contains_key("linkUrl"));
        assert!(!obj.contains_key("stats"));
        assert!(!obj.contains_key("billing"));
    }

    #[test]
    fn test_randomized_eligibility_matches_predicate_oracle() {
        let mut rng = StdRng::seed_from_u64(0xAD5);
        let regions = ["gimhae", "busan", "seoul"];
        let categories = ["dining", "cafe", "optician"];

        for _ in 0..500 {
            let mut ad = campaign("r", Placement::SearchTop, CategoryTargeting::Any, vec![], 0);
            ad.is_active = rng.gen_bool(0.7);
            ad.start_date = today() + Duration::days(rng.gen_range(-5..3));
            ad.end_date = ad.start_date + Duration::days(rng.gen_range(0..6));
            ad.placement = if rng.gen_bool(0.5) {
                Placement::SearchTop
            } else {
                Placement::Sidebar
            };
            ad.targeting.business_types = if rng.gen_bool(0.3) {
                CategoryTargeting::Any
            } else {
                let n = rng.gen_range(1..=2);
                CategoryTargeting::Specific(
                    (0..n)
                        .map(|_| categories[rng.gen_range(0..categories.len())].to_string())
                        .collect(),
                )
            };
            ad.targeting.regions = if rng.gen_bool(0.4) {
                vec![]
            } else {
                vec![regions[rng.gen_range(0..regions.len())].to_string()]
            };

            let want_region: Option<&str> = if rng.gen_bool(0.3) {
                None
            } else {
                Some(regions[rng.gen_range(0..regions.len())])
            };
            let inferred = CategorySet::Tags(&["dining", "restaurant"]);

            let expected = ad.is_active
                && ad.start_date <= today()
                && today() <= ad.end_date
                && ad.placement == Placement::SearchTop
                && (match &ad.targeting.business_types {
                    CategoryTargeting::Any => true,
                    CategoryTargeting::Specific(tags) => {
                        tags.iter().any(|t| t == "dining" || t == "restaurant")
                    }
                })
                && (match want_region {
                    None => true,
                    Some(r) => {
                        ad.targeting.regions.is_empty()
                            || ad.targeting.regions.iter().any(|x| x == r)
                    }
                });

            assert_eq!(
                is_eligible(&ad, Some(Placement::SearchTop), &inferred, want_region, today()),
                expected,
                "ad: {ad:?}, region: {want_region:?}"
            );
        }
    }
}
