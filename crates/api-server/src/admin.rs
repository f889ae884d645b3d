//! Operator handlers — campaign CRUD, dashboard stats, per-campaign report.
//! Unlike the visitor surface these return raw error detail: validation
//! failures are 400, unknown ids are 404, anything else is 500.

use crate::auth::{self, ErrorResponse, LoginRequest, LoginResponse};
use adserve_core::error::AdServeError;
use adserve_core::types::{AdCampaign, CreateAdRequest, UpdateAdRequest};
use adserve_reporting::{AdListItem, AdsOverview, CampaignReport};
use adserve_store::AdStore;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Shared state for the operator endpoints.
#[derive(Clone)]
pub struct AdminState {
    pub store: Arc<AdStore>,
    pub report_window: usize,
}

fn error_response(err: AdServeError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        AdServeError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
        AdServeError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: err.to_string(),
        }),
    )
}

// ─── Auth ──────────────────────────────────────────────────────────────────

pub async fn handle_login(
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    match auth::authenticate(&req) {
        Ok(resp) => Ok(Json(resp)),
        Err(msg) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "auth_failed".to_string(),
                message: msg,
            }),
        )),
    }
}

// ─── Campaign CRUD ─────────────────────────────────────────────────────────

/// GET /admin/ads — full list with counters and CTR annotations.
pub async fn list_ads(State(state): State<AdminState>) -> Json<Vec<AdListItem>> {
    Json(adserve_reporting::list_with_ctr(&state.store))
}

/// GET /admin/ads/{id}
pub async fn get_ad(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdCampaign>, StatusCode> {
    state.store.get(id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// POST /admin/ads
pub async fn create_ad(
    State(state): State<AdminState>,
    Json(req): Json<CreateAdRequest>,
) -> Result<(StatusCode, Json<AdCampaign>), (StatusCode, Json<ErrorResponse>)> {
    match state.store.create(req) {
        Ok(ad) => {
            metrics::counter!("admin.ads.created").increment(1);
            Ok((StatusCode::CREATED, Json(ad)))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// PUT /admin/ads/{id}
pub async fn update_ad(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAdRequest>,
) -> Result<Json<AdCampaign>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.update(id, req) {
        Ok(ad) => Ok(Json(ad)),
        Err(e) => Err(error_response(e)),
    }
}

/// DELETE /admin/ads/{id}
pub async fn delete_ad(State(state): State<AdminState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.store.delete(id) {
        metrics::counter!("admin.ads.deleted").increment(1);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// ─── Reporting ─────────────────────────────────────────────────────────────

/// GET /admin/ads/stats — dashboard header snapshot.
pub async fn ads_stats(State(state): State<AdminState>) -> Json<AdsOverview> {
    let today = Utc::now().date_naive();
    Json(adserve_reporting::overview(&state.store, today))
}

/// GET /admin/ads/{id}/report — per-campaign trend report.
pub async fn ad_report(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CampaignReport>, StatusCode> {
    adserve_reporting::campaign_report(&state.store, id, state.report_window)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
