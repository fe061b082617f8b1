use super::domain::{Listing, ListingFilter, Pagination};

/// Storage abstraction so listing services can run against any document store.
pub trait ListingRepository: Send + Sync {
    fn find(
        &self,
        filter: &ListingFilter,
        pagination: Pagination,
    ) -> Result<Vec<Listing>, RepositoryError>;
    fn count(&self, filter: &ListingFilter) -> Result<usize, RepositoryError>;
    fn insert(&self, record: Listing) -> Result<Listing, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
