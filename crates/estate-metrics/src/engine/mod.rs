//! Pure, stateless real-estate metrics.
//!
//! Every operation depends only on its arguments and the immutable
//! [`MetricsPolicy`] held by [`MetricsEngine`], so one engine can be shared
//! behind an `Arc` by any number of request handlers.

pub mod banding;
pub mod energy;
pub mod mobility;
pub mod mortgage;
mod outcome;
pub mod policy;
pub mod router;
pub mod sampling;
pub mod valuation;

pub use banding::{Band, BandDirection, BandError, ThresholdBands};
pub use energy::{EnergyGrade, EnergyPolicy, EnergyRating};
pub use mobility::{MobilityAssessment, MobilityLabel, MobilityScoreSet, MobilityTable};
pub use mortgage::{
    amortization_schedule, loan_to_value, AmortizationResult, AmortizationYear, EscrowPolicy,
    LoanTerms, MortgageCalculator, PropertyFinancials,
};
pub use outcome::{Computation, InsufficientInput, MetricOutcome};
pub use policy::{MetricsPolicy, PolicyError};
pub use router::{metrics_router, mortgage_report, MortgageReport, MortgageRequest};
pub use sampling::{SamplingError, WeightedChoice};
pub use valuation::{
    price_history_stats, price_per_area, valuation_delta, PriceHistoryStats, PricePerArea,
    PricePoint, ValuationDelta,
};

use crate::listings::Listing;
use serde::Serialize;

/// Derived figures shown on a listing card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingMetrics {
    pub price_per_area: MetricOutcome<PricePerArea>,
    pub energy: MetricOutcome<EnergyRating>,
    pub mobility: MobilityAssessment,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    policy: MetricsPolicy,
    mortgage: MortgageCalculator,
}

impl MetricsEngine {
    pub fn new(policy: MetricsPolicy) -> Self {
        let mortgage = MortgageCalculator::new(policy.escrow);
        Self { policy, mortgage }
    }

    pub fn policy(&self) -> &MetricsPolicy {
        &self.policy
    }

    pub fn mortgage_quote(
        &self,
        terms: &LoanTerms,
        property_price: f64,
    ) -> Computation<AmortizationResult> {
        self.mortgage.quote(terms, property_price)
    }

    pub fn amortization_schedule(&self, terms: &LoanTerms) -> Computation<Vec<AmortizationYear>> {
        amortization_schedule(terms)
    }

    pub fn price_per_area(&self, price: f64, surface_area: f64) -> Computation<PricePerArea> {
        price_per_area(price, surface_area)
    }

    pub fn valuation_delta(&self, reference: f64, candidate: f64) -> Computation<ValuationDelta> {
        valuation_delta(reference, candidate)
    }

    pub fn price_history(&self, points: &[PricePoint]) -> Computation<PriceHistoryStats> {
        price_history_stats(points)
    }

    pub fn energy_rating(
        &self,
        consumption: Option<f64>,
        emissions: Option<f64>,
    ) -> Computation<EnergyRating> {
        self.policy.energy.rate(consumption, emissions)
    }

    pub fn mobility(&self, location: &str) -> MobilityAssessment {
        self.policy.mobility.assess(location)
    }

    pub fn listing_metrics(&self, listing: &Listing) -> ListingMetrics {
        ListingMetrics {
            price_per_area: self
                .price_per_area(listing.price, listing.surface_area)
                .into(),
            energy: self
                .energy_rating(listing.energy_consumption, listing.emissions)
                .into(),
            mobility: self.mobility(&listing.city),
        }
    }
}
