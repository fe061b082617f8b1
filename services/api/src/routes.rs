use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use estate_metrics::engine::{metrics_router, MetricsEngine};
use estate_metrics::listings::{listing_router, ListingRepository, ListingService};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Calculation and listing routes plus the operational endpoints.
pub(crate) fn with_service_routes<R>(
    engine: Arc<MetricsEngine>,
    listings: Arc<ListingService<R>>,
) -> Router
where
    R: ListingRepository + 'static,
{
    metrics_router(engine)
        .merge(listing_router(listings))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Acquire) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryListingRepository;
    use axum::body::Body;
    use axum::http::Request;
    use estate_metrics::listings::ListingGenerator;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> Router {
        let engine = Arc::new(MetricsEngine::default());
        let service = Arc::new(ListingService::new(
            Arc::new(InMemoryListingRepository::default()),
            engine.clone(),
        ));
        let mut generator = ListingGenerator::standard(8).expect("templates valid");
        service.seed(&mut generator, 12).expect("seeded");

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(engine, service).layer(Extension(state))
    }

    async fn get_json(router: Router, path: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, body) = get_json(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get_json(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn health_and_metrics_respond() {
        let (status, body) = get_json(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let response = app(true)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn merged_routers_share_one_app() {
        let (status, body) = get_json(app(true), "/api/v1/metrics/mobility/paris").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scores"]["walk_score"], 92);

        let (status, body) = get_json(app(true), "/api/v1/listings?limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 12);
        assert_eq!(body["items"].as_array().unwrap().len(), 5);
    }
}
