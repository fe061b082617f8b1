//! Listing records, the repository seam, demo-data generation and market reports.

pub mod domain;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod synthetic;

#[cfg(test)]
mod tests;

pub use domain::{
    Listing, ListingFilter, ListingId, ListingValidationError, Pagination, PropertyKind,
};
pub use report::{CityMarketEntry, GradeShare, MarketReport};
pub use repository::{ListingRepository, RepositoryError};
pub use router::listing_router;
pub use service::{ListingCard, ListingPage, ListingService, ListingServiceError};
pub use synthetic::{
    CityProfile, GradeTemplate, KindTemplate, ListingGenerator, SyntheticTemplates, TemplateError,
};
