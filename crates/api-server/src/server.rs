//! HTTP server assembly — visitor router, admin router behind the operator
//! auth layer, and the Prometheus exporter on its own port.

use crate::admin::{self, AdminState};
use crate::auth;
use crate::public::{self, AdsState};
use adserve_core::config::AppConfig;
use adserve_store::{AdStore, AttributionRecorder};
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    store: Arc<AdStore>,
}

impl ApiServer {
    pub fn new(config: AppConfig, store: Arc<AdStore>) -> Self {
        Self { config, store }
    }

    /// Build the full application router. Public for integration tests.
    pub fn router(&self) -> Router {
        let recorder = Arc::new(AttributionRecorder::new(self.store.clone()));
        let ads_state = AdsState {
            store: self.store.clone(),
            recorder,
            match_limit: self.config.ads.match_limit,
            start_time: Instant::now(),
        };

        let visitor = Router::new()
            .route("/ads/match", get(public::match_ads))
            .route("/ads/impression/:ad_id", post(public::record_impression))
            .route("/ads/click/:ad_id", post(public::record_click))
            .route("/health", get(public::health_check))
            .route("/ready", get(public::readiness))
            .route("/live", get(public::liveness))
            .with_state(ads_state);

        let admin_state = AdminState {
            store: self.store.clone(),
            report_window: self.config.ads.report_window_days,
        };
        let operator = Router::new()
            .route("/admin/auth/login", post(admin::handle_login))
            .route("/admin/ads", get(admin::list_ads).post(admin::create_ad))
            .route("/admin/ads/stats", get(admin::ads_stats))
            .route(
                "/admin/ads/:id",
                get(admin::get_ad)
                    .put(admin::update_ad)
                    .delete(admin::delete_ad),
            )
            .route("/admin/ads/:id/report", get(admin::ad_report))
            .route_layer(middleware::from_fn(auth::require_operator))
            .with_state(admin_state);

        Router::new()
            .merge(visitor)
            .merge(operator)
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP server. Blocks until shutdown.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = self.router();
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
