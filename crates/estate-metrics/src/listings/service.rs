use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{Listing, ListingFilter, ListingValidationError, Pagination};
use super::report::MarketReport;
use super::repository::{ListingRepository, RepositoryError};
use super::synthetic::ListingGenerator;
use crate::engine::{ListingMetrics, MetricsEngine};

/// Listing plus the figures its card displays.
#[derive(Debug, Clone, Serialize)]
pub struct ListingCard {
    pub listing: Listing,
    pub metrics: ListingMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub items: Vec<ListingCard>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

/// Service composing the listing repository with the metrics engine.
pub struct ListingService<R> {
    repository: Arc<R>,
    engine: Arc<MetricsEngine>,
}

impl<R> ListingService<R>
where
    R: ListingRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: Arc<MetricsEngine>) -> Self {
        Self { repository, engine }
    }

    pub fn engine(&self) -> &Arc<MetricsEngine> {
        &self.engine
    }

    fn card(&self, listing: Listing) -> ListingCard {
        let metrics = self.engine.listing_metrics(&listing);
        ListingCard { listing, metrics }
    }

    pub fn search(
        &self,
        filter: &ListingFilter,
        pagination: Pagination,
    ) -> Result<ListingPage, ListingServiceError> {
        let total = self.repository.count(filter)?;
        let items = self
            .repository
            .find(filter, pagination)?
            .into_iter()
            .map(|listing| self.card(listing))
            .collect();

        Ok(ListingPage {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    /// Validate and store a listing, returning it with its computed metrics.
    pub fn create(&self, listing: Listing) -> Result<ListingCard, ListingServiceError> {
        listing.validate()?;
        let stored = self.repository.insert(listing)?;
        debug!(listing_id = %stored.id, city = %stored.city, "listing stored");
        Ok(self.card(stored))
    }

    /// Market report over every listing matching `filter`.
    pub fn report(&self, filter: &ListingFilter) -> Result<MarketReport, ListingServiceError> {
        let mut listings = Vec::new();
        let mut offset = 0;
        loop {
            let page = self
                .repository
                .find(filter, Pagination::new(offset, Pagination::MAX_LIMIT))?;
            let fetched = page.len();
            listings.extend(page);
            if fetched < Pagination::MAX_LIMIT {
                break;
            }
            offset += fetched;
        }

        Ok(MarketReport::build(&listings, &self.engine))
    }

    /// Insert `count` generated listings; conflicting ids are skipped.
    pub fn seed(
        &self,
        generator: &mut ListingGenerator,
        count: usize,
    ) -> Result<usize, ListingServiceError> {
        let mut inserted = 0;
        for listing in generator.generate(count) {
            match self.repository.insert(listing) {
                Ok(_) => inserted += 1,
                Err(RepositoryError::Conflict) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        info!(requested = count, inserted, "seeded synthetic listings");
        Ok(inserted)
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error(transparent)]
    Validation(#[from] ListingValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
