use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::engine::MetricsEngine;
use crate::listings::domain::{Listing, ListingFilter, ListingId, Pagination, PropertyKind};
use crate::listings::repository::{ListingRepository, RepositoryError};
use crate::listings::service::ListingService;

pub(super) fn listing(id: &str, city: &str, price: f64, surface: f64) -> Listing {
    Listing {
        id: ListingId(id.to_string()),
        title: format!("Apartment in {city}"),
        city: city.to_string(),
        kind: PropertyKind::Apartment,
        price,
        surface_area: surface,
        rooms: 3,
        energy_consumption: Some(150.0),
        emissions: Some(12.0),
        listed_on: NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date"),
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<BTreeMap<ListingId, Listing>>,
}

impl ListingRepository for MemoryRepository {
    fn find(
        &self,
        filter: &ListingFilter,
        pagination: Pagination,
    ) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|listing| filter.matches(listing))
            .skip(pagination.offset)
            .take(pagination.limit)
            .cloned()
            .collect())
    }

    fn count(&self, filter: &ListingFilter) -> Result<usize, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().filter(|listing| filter.matches(listing)).count())
    }

    fn insert(&self, record: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }
}

pub(super) struct UnavailableRepository;

impl ListingRepository for UnavailableRepository {
    fn find(
        &self,
        _filter: &ListingFilter,
        _pagination: Pagination,
    ) -> Result<Vec<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }

    fn count(&self, _filter: &ListingFilter) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }

    fn insert(&self, _record: Listing) -> Result<Listing, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<ListingService<MemoryRepository>>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(ListingService::new(
        repository.clone(),
        Arc::new(MetricsEngine::default()),
    ));
    (service, repository)
}

pub(super) async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
