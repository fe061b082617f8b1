use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{
    loan_to_value, AmortizationResult, AmortizationYear, Computation, EnergyRating, LoanTerms,
    MetricOutcome, MetricsEngine, MobilityAssessment, PriceHistoryStats, PricePerArea,
    PricePoint, ValuationDelta,
};

/// Router builder exposing the calculation endpoints.
pub fn metrics_router(engine: Arc<MetricsEngine>) -> Router {
    Router::new()
        .route("/api/v1/metrics/mortgage", post(mortgage_handler))
        .route("/api/v1/metrics/price-per-area", post(price_per_area_handler))
        .route("/api/v1/metrics/price-history", post(price_history_handler))
        .route("/api/v1/metrics/energy", post(energy_handler))
        .route("/api/v1/metrics/mobility/:city", get(mobility_handler))
        .with_state(engine)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MortgageRequest {
    pub property_price: f64,
    /// Defaults to `property_price - down_payment`.
    #[serde(default)]
    pub principal: Option<f64>,
    #[serde(default)]
    pub down_payment: Option<f64>,
    pub annual_rate_percent: f64,
    pub term_years: u32,
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MortgageReport {
    pub principal: f64,
    pub loan_to_value_percent: f64,
    pub quote: AmortizationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationYear>>,
}

impl MortgageRequest {
    fn terms(&self) -> Computation<LoanTerms> {
        match self.principal {
            Some(principal) => Ok(LoanTerms::new(
                principal,
                self.annual_rate_percent,
                self.term_years,
            )),
            None => LoanTerms::from_financials(
                &super::PropertyFinancials {
                    price: self.property_price,
                    surface_area: 1.0,
                    down_payment: self.down_payment.unwrap_or(0.0),
                },
                self.annual_rate_percent,
                self.term_years,
            ),
        }
    }
}

pub fn mortgage_report(
    engine: &MetricsEngine,
    request: &MortgageRequest,
) -> Computation<MortgageReport> {
    let terms = request.terms()?;
    let quote = engine.mortgage_quote(&terms, request.property_price)?;
    let loan_to_value_percent = loan_to_value(terms.principal, request.property_price)?;
    let schedule = if request.include_schedule {
        Some(engine.amortization_schedule(&terms)?)
    } else {
        None
    };

    Ok(MortgageReport {
        principal: terms.principal,
        loan_to_value_percent,
        quote,
        schedule,
    })
}

pub(crate) async fn mortgage_handler(
    State(engine): State<Arc<MetricsEngine>>,
    Json(request): Json<MortgageRequest>,
) -> Json<MetricOutcome<MortgageReport>> {
    Json(mortgage_report(&engine, &request).into())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricePerAreaRequest {
    pub price: f64,
    pub surface_area: f64,
    /// Optional estimate compared against the asking price.
    #[serde(default)]
    pub estimated_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    pub price_per_area: PricePerArea,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation_delta: Option<ValuationDelta>,
}

pub(crate) async fn price_per_area_handler(
    State(engine): State<Arc<MetricsEngine>>,
    Json(request): Json<PricePerAreaRequest>,
) -> Json<MetricOutcome<PriceReport>> {
    let report = engine
        .price_per_area(request.price, request.surface_area)
        .and_then(|price_per_area| {
            let valuation_delta = request
                .estimated_value
                .map(|estimate| engine.valuation_delta(request.price, estimate))
                .transpose()?;
            Ok(PriceReport {
                price_per_area,
                valuation_delta,
            })
        });
    Json(report.into())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceHistoryRequest {
    pub points: Vec<PricePoint>,
}

pub(crate) async fn price_history_handler(
    State(engine): State<Arc<MetricsEngine>>,
    Json(request): Json<PriceHistoryRequest>,
) -> Json<MetricOutcome<PriceHistoryStats>> {
    Json(engine.price_history(&request.points).into())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnergyRequest {
    #[serde(default)]
    pub consumption: Option<f64>,
    #[serde(default)]
    pub emissions: Option<f64>,
}

pub(crate) async fn energy_handler(
    State(engine): State<Arc<MetricsEngine>>,
    Json(request): Json<EnergyRequest>,
) -> Json<MetricOutcome<EnergyRating>> {
    Json(
        engine
            .energy_rating(request.consumption, request.emissions)
            .into(),
    )
}

pub(crate) async fn mobility_handler(
    State(engine): State<Arc<MetricsEngine>>,
    Path(city): Path<String>,
) -> Json<MobilityAssessment> {
    Json(engine.mobility(&city))
}
