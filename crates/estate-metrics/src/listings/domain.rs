use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Studio,
    Apartment,
    Loft,
    House,
    Villa,
}

impl PropertyKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Studio,
            Self::Apartment,
            Self::Loft,
            Self::House,
            Self::Villa,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Studio => "Studio",
            Self::Apartment => "Apartment",
            Self::Loft => "Loft",
            Self::House => "House",
            Self::Villa => "Villa",
        }
    }
}

/// Property listing as stored by a [`super::ListingRepository`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub city: String,
    pub kind: PropertyKind,
    pub price: f64,
    pub surface_area: f64,
    pub rooms: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissions: Option<f64>,
    pub listed_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("listing id must not be empty")]
    MissingId,
    #[error("listing city must not be empty")]
    MissingCity,
    #[error("listing price must be a non-negative number")]
    InvalidPrice,
    #[error("listing surface area must be greater than zero")]
    InvalidSurface,
    #[error("energy and emissions values must be non-negative numbers")]
    InvalidMeasurement,
}

impl Listing {
    pub fn validate(&self) -> Result<(), ListingValidationError> {
        if self.id.0.trim().is_empty() {
            return Err(ListingValidationError::MissingId);
        }
        if self.city.trim().is_empty() {
            return Err(ListingValidationError::MissingCity);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ListingValidationError::InvalidPrice);
        }
        if !self.surface_area.is_finite() || self.surface_area <= 0.0 {
            return Err(ListingValidationError::InvalidSurface);
        }
        let bad_measurement = [self.energy_consumption, self.emissions]
            .into_iter()
            .flatten()
            .any(|value| !value.is_finite() || value < 0.0);
        if bad_measurement {
            return Err(ListingValidationError::InvalidMeasurement);
        }
        Ok(())
    }
}

/// Narrow search criteria; every `None` field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingFilter {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub kind: Option<PropertyKind>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_surface: Option<f64>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(city) = &self.city {
            if !listing.city.trim().eq_ignore_ascii_case(city.trim()) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if listing.kind != kind {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| listing.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| listing.price > max) {
            return false;
        }
        if self
            .min_surface
            .is_some_and(|min| listing.surface_area < min)
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Pagination {
    pub const DEFAULT_LIMIT: usize = 20;
    pub const MAX_LIMIT: usize = 100;

    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn from_query(offset: Option<usize>, limit: Option<usize>) -> Self {
        Self::new(offset.unwrap_or(0), limit.unwrap_or(Self::DEFAULT_LIMIT))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}
