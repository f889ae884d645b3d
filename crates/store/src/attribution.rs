//! Attribution recorder — the two-step counter+bucket write protocol.
//!
//! Step (a) bumps the authoritative lifetime counter in one atomic store
//! operation. Step (b) maintains today's daily bucket: a conditional
//! atomic increment first, and only when that reports zero rows affected,
//! a guarded insert-or-merge. The daily series is best-effort; the
//! lifetime counter is always exact because step (a) is a single
//! increment.

use crate::store::AdStore;
use adserve_core::types::EventKind;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Records impression/click events against the catalog. Every operation is
/// a no-op for unknown ids; a duplicate call legitimately counts as a
/// second event (there is no dedup key in scope).
pub struct AttributionRecorder {
    store: Arc<AdStore>,
}

impl AttributionRecorder {
    pub fn new(store: Arc<AdStore>) -> Self {
        Self { store }
    }

    /// Record one impression against today's date. Returns false when the
    /// id does not resolve; callers treat that as a no-op, not an error.
    pub fn record_impression(&self, ad_id: Uuid) -> bool {
        self.record(ad_id, EventKind::Impression, Utc::now().date_naive())
            .is_some()
    }

    /// Record one click and return the destination URL for the redirect.
    /// `None` for unknown ids; the caller answers with an empty URL.
    pub fn record_click(&self, ad_id: Uuid) -> Option<String> {
        self.record(ad_id, EventKind::Click, Utc::now().date_naive())
    }

    fn record(&self, ad_id: Uuid, kind: EventKind, today: NaiveDate) -> Option<String> {
        // Step (a): lifetime counter, authoritative.
        let Some(link_url) = self.store.increment_lifetime(ad_id, kind) else {
            metrics::counter!("ads.attribution.unknown_id").increment(1);
            debug!(%ad_id, "Attribution event for unknown ad, dropping");
            return None;
        };

        // Step (b): today's bucket. Conditional increment first; zero rows
        // affected means the bucket does not exist yet and we fall back to
        // the guarded append.
        if !self.store.try_increment_daily(ad_id, today, kind) {
            self.store.append_daily_bucket(ad_id, today, kind);
        }

        match kind {
            EventKind::Impression => metrics::counter!("ads.impressions.recorded").increment(1),
            EventKind::Click => metrics::counter!("ads.clicks.recorded").increment(1),
        }
        Some(link_url)
    }
}
