use chrono::NaiveDate;
use estate_metrics::listings::{
    Listing, ListingFilter, ListingId, ListingRepository, Pagination, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Listing store kept in process memory, ordered by id.
#[derive(Default, Clone)]
pub(crate) struct InMemoryListingRepository {
    records: Arc<Mutex<BTreeMap<ListingId, Listing>>>,
}

impl InMemoryListingRepository {
    fn records(&self) -> Result<MutexGuard<'_, BTreeMap<ListingId, Listing>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("listing store mutex poisoned".to_string()))
    }
}

impl ListingRepository for InMemoryListingRepository {
    fn find(
        &self,
        filter: &ListingFilter,
        pagination: Pagination,
    ) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard
            .values()
            .filter(|listing| filter.matches(listing))
            .skip(pagination.offset)
            .take(pagination.limit)
            .cloned()
            .collect())
    }

    fn count(&self, filter: &ListingFilter) -> Result<usize, RepositoryError> {
        let guard = self.records()?;
        Ok(guard.values().filter(|listing| filter.matches(listing)).count())
    }

    fn insert(&self, record: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_metrics::listings::ListingGenerator;

    #[test]
    fn pages_through_filtered_records() {
        let repository = InMemoryListingRepository::default();
        for listing in ListingGenerator::standard(1)
            .expect("templates valid")
            .generate(30)
        {
            repository.insert(listing).expect("unique id");
        }

        let all = ListingFilter::default();
        assert_eq!(repository.count(&all).expect("count"), 30);

        let page = repository
            .find(&all, Pagination::new(25, 10))
            .expect("find");
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].id, ListingId("demo-00026".to_string()));
    }

    #[test]
    fn duplicate_ids_conflict() {
        let repository = InMemoryListingRepository::default();
        let listing = ListingGenerator::standard(2)
            .expect("templates valid")
            .next_listing();

        repository.insert(listing.clone()).expect("first insert");
        assert!(matches!(
            repository.insert(listing),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2025-03-01 "),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"))
        );
        assert!(parse_date("03/01/2025").is_err());
    }
}
