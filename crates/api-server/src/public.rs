//! Visitor-facing handlers. This path never surfaces an internal failure:
//! a match that cannot be served answers with an empty list and attribution
//! problems are swallowed (counted in metrics) — the page already rendered.

use adserve_core::types::{AdPlacementView, Placement, VisitorContext};
use adserve_store::{AdStore, AttributionRecorder};
use adserve_targeting::select_ads;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Shared state for the visitor endpoints.
#[derive(Clone)]
pub struct AdsState {
    pub store: Arc<AdStore>,
    pub recorder: Arc<AttributionRecorder>,
    pub match_limit: usize,
    pub start_time: Instant,
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub placement: Option<String>,
    pub topic: Option<String>,
    pub region: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickResponse {
    pub redirect_url: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// GET /ads/match — eligible ads for one placement slot.
pub async fn match_ads(
    State(state): State<AdsState>,
    Query(query): Query<MatchQuery>,
) -> Json<Vec<AdPlacementView>> {
    metrics::counter!("ads.match.requests").increment(1);

    // An unknown placement slug can never satisfy the exact-placement
    // predicate; answer "no ad available" instead of erroring.
    let placement = match query.placement.as_deref() {
        Some(slug) => match Placement::from_slug(slug) {
            Some(p) => Some(p),
            None => {
                debug!(slug, "Unknown placement slug on match request");
                return Json(Vec::new());
            }
        },
        None => None,
    };

    let ctx = VisitorContext {
        topic: query.topic,
        keyword: query.keyword,
        region: query.region,
    };
    let today = Utc::now().date_naive();
    let ads = state.store.snapshot();

    Json(select_ads(&ads, &ctx, placement, today, state.match_limit))
}

/// POST /ads/impression/{adId} — fire-and-forget impression event.
/// Answers `{ok: true}` unconditionally, unknown or malformed ids included.
pub async fn record_impression(
    State(state): State<AdsState>,
    Path(ad_id): Path<String>,
) -> Json<AckResponse> {
    match Uuid::parse_str(&ad_id) {
        Ok(id) => {
            state.recorder.record_impression(id);
        }
        Err(_) => {
            metrics::counter!("ads.attribution.errors").increment(1);
            debug!(ad_id, "Malformed ad id on impression, dropping");
        }
    }
    Json(AckResponse { ok: true })
}

/// POST /ads/click/{adId} — click event plus the redirect destination.
/// An id that does not resolve yields an empty URL, never an error.
pub async fn record_click(
    State(state): State<AdsState>,
    Path(ad_id): Path<String>,
) -> Json<ClickResponse> {
    let redirect_url = match Uuid::parse_str(&ad_id) {
        Ok(id) => state.recorder.record_click(id).unwrap_or_default(),
        Err(_) => {
            metrics::counter!("ads.attribution.errors").increment(1);
            debug!(ad_id, "Malformed ad id on click, dropping");
            String::new()
        }
    };
    Json(ClickResponse { redirect_url })
}

// ─── Operational endpoints ─────────────────────────────────────────────────

/// GET /health
pub async fn health_check(State(state): State<AdsState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — readiness probe.
pub async fn readiness(State(state): State<AdsState>) -> StatusCode {
    // The store is in-process; readiness is just "the catalog is reachable".
    let _ = state.store.len();
    StatusCode::OK
}

/// GET /live — liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
