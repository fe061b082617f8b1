use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Listing, ListingFilter, Pagination, PropertyKind};
use super::repository::{ListingRepository, RepositoryError};
use super::service::{ListingService, ListingServiceError};

/// Router builder exposing listing search, intake and market reporting.
pub fn listing_router<R>(service: Arc<ListingService<R>>) -> Router
where
    R: ListingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/listings",
            get(search_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/v1/listings/report", get(report_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub city: Option<String>,
    pub kind: Option<PropertyKind>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_surface: Option<f64>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl ListingQuery {
    fn filter(&self) -> ListingFilter {
        ListingFilter {
            city: self.city.clone(),
            kind: self.kind,
            min_price: self.min_price,
            max_price: self.max_price,
            min_surface: self.min_surface,
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination::from_query(self.offset, self.limit)
    }
}

fn error_response(error: ListingServiceError) -> Response {
    let status = match &error {
        ListingServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ListingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ListingServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match service.search(&query.filter(), query.pagination()) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    axum::Json(listing): axum::Json<Listing>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match service.create(listing) {
        Ok(card) => (StatusCode::CREATED, axum::Json(card)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<ListingService<R>>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    R: ListingRepository + 'static,
{
    match service.report(&query.filter()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}
