use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::engine::MetricsEngine;
use crate::listings::router::listing_router;
use crate::listings::service::ListingService;

#[tokio::test]
async fn post_listing_returns_created_card() {
    let (service, _) = build_service();
    let router = listing_router(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/listings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&listing("P-9", "Paris", 300_000.0, 100.0)).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["listing"]["id"], "P-9");
    assert_eq!(body["metrics"]["price_per_area"]["outcome"], "computed");
    assert_eq!(body["metrics"]["energy"]["result"]["letter_grade"], "C");
}

#[tokio::test]
async fn post_duplicate_listing_conflicts() {
    let (service, _) = build_service();
    service
        .create(listing("P-10", "Paris", 300_000.0, 100.0))
        .expect("seeded");
    let router = listing_router(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/listings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&listing("P-10", "Paris", 310_000.0, 100.0)).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn post_invalid_listing_is_unprocessable() {
    let (service, _) = build_service();
    let router = listing_router(service);

    let mut payload = serde_json::to_value(listing("P-11", "Nice", 300_000.0, 80.0)).unwrap();
    payload["surface_area"] = json!(0.0);

    let response = router
        .oneshot(
            Request::post("/api/v1/listings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn search_route_applies_query_filter() {
    let (service, _) = build_service();
    service
        .create(listing("L-1", "Lyon", 200_000.0, 50.0))
        .expect("stored");
    service
        .create(listing("N-1", "Nantes", 180_000.0, 55.0))
        .expect("stored");
    let router = listing_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/listings?city=lyon&kind=apartment&limit=5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["items"][0]["listing"]["id"], "L-1");
}

#[tokio::test]
async fn report_route_returns_city_entries() {
    let (service, _) = build_service();
    service
        .create(listing("L-1", "Lyon", 200_000.0, 50.0))
        .expect("stored");
    let router = listing_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/listings/report")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["total_listings"], 1);
    assert_eq!(body["cities"][0]["city"], "Lyon");
    assert_eq!(body["cities"][0]["mean_price_per_area"], 4000.0);
}

#[tokio::test]
async fn unavailable_repository_maps_to_internal_error() {
    let service = Arc::new(ListingService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MetricsEngine::default()),
    ));
    let router = listing_router(service);

    let response = router
        .oneshot(Request::get("/api/v1/listings").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
