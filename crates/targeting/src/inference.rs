//! Business-type inference — maps a visitor's search topic or free-text
//! keyword to the advertiser categories that visitor is likely to run.
//!
//! Topic lookup is the priority path; keyword substring rules apply in
//! order; anything else falls back to the wildcard set.

use adserve_core::types::CategoryTargeting;

/// Candidate advertiser categories inferred for one visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySet {
    /// Nothing could be inferred; only wildcard-targeted ads qualify.
    Any,
    Tags(&'static [&'static str]),
}

impl CategorySet {
    /// Category predicate of the matcher: the ad's targeting must either be
    /// the wildcard or intersect the inferred set.
    pub fn matches(&self, targeting: &CategoryTargeting) -> bool {
        match (targeting, self) {
            (CategoryTargeting::Any, _) => true,
            (CategoryTargeting::Specific(tags), CategorySet::Tags(cats)) => {
                tags.iter().any(|t| cats.contains(&t.as_str()))
            }
            (CategoryTargeting::Specific(_), CategorySet::Any) => false,
        }
    }
}

/// Fixed topic → categories table. Keys are the blog search topics the
/// dashboard exposes.
const TOPIC_CATEGORIES: &[(&str, &[&str])] = &[
    ("restaurant", &["dining", "restaurant"]),
    ("cooking", &["dining", "restaurant"]),
    ("cafe", &["cafe"]),
    ("fashion_beauty", &["beauty", "salon", "nails"]),
    ("health", &["clinic", "pharmacy", "optician"]),
    ("domestic_travel", &["lodging", "pension", "hotel"]),
    ("world_travel", &["travel_agency"]),
    ("education", &["academy", "education"]),
    ("product_review", &["retail", "shopping"]),
    ("interior_diy", &["interior", "construction"]),
    ("pets", &["vet", "pet_shop"]),
    ("cars", &["garage", "car_wash"]),
    ("sports", &["gym", "sports"]),
    ("photography", &["studio"]),
];

/// Ordered keyword substring rules; the first matching rule wins.
const KEYWORD_RULES: &[(&[&str], &[&str])] = &[
    (&["food", "restaurant", "diner", "eatery"], &["dining", "restaurant"]),
    (&["cafe", "coffee"], &["cafe"]),
    (&["beauty", "nail", "skin"], &["beauty"]),
    (&["optic", "glasses", "lens"], &["optician"]),
    (&["hospital", "clinic", "dental"], &["clinic"]),
    (&["academy", "tutoring"], &["academy", "education"]),
    (&["hotel", "pension", "motel"], &["lodging"]),
];

/// Infer candidate advertiser categories from a search topic and keyword.
/// Pure function; the only "failure" is the wildcard fallback.
pub fn infer(topic: Option<&str>, keyword: Option<&str>) -> CategorySet {
    if let Some(topic) = topic {
        if let Some((_, cats)) = TOPIC_CATEGORIES.iter().find(|(t, _)| *t == topic) {
            return CategorySet::Tags(cats);
        }
    }

    if let Some(keyword) = keyword {
        let kw = keyword.to_lowercase();
        for (needles, cats) in KEYWORD_RULES {
            if needles.iter().any(|n| kw.contains(n)) {
                return CategorySet::Tags(cats);
            }
        }
    }

    CategorySet::Any
}
