use super::outcome::{ensure_finite, Computation, InsufficientInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price per square metre. `exact` feeds further arithmetic; `display` is
/// rounded to the currency minor unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePerArea {
    pub exact: f64,
    pub display: f64,
}

pub fn price_per_area(price: f64, surface_area: f64) -> Computation<PricePerArea> {
    ensure_finite(&[price, surface_area])?;
    if surface_area <= 0.0 {
        return Err(InsufficientInput::NonPositiveArea);
    }
    if price < 0.0 {
        return Err(InsufficientInput::NegativePrice);
    }

    let exact = price / surface_area;
    Ok(PricePerArea {
        exact,
        display: round_minor_unit(exact),
    })
}

fn round_minor_unit(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationDelta {
    pub absolute: f64,
    pub percent: f64,
}

/// Difference of `candidate` against `reference`, e.g. estimate vs. asking price.
pub fn valuation_delta(reference: f64, candidate: f64) -> Computation<ValuationDelta> {
    ensure_finite(&[reference, candidate])?;
    if reference <= 0.0 {
        return Err(InsufficientInput::NonPositiveReference);
    }
    if candidate < 0.0 {
        return Err(InsufficientInput::NegativePrice);
    }

    let absolute = candidate - reference;
    Ok(ValuationDelta {
        absolute,
        percent: absolute / reference * 100.0,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub at: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryStats {
    pub samples: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub trend_percent: f64,
    pub volatility_percent: f64,
}

/// Summary statistics over a price history, ordered by timestamp.
///
/// A single point has zero trend and zero volatility. A first price of zero
/// reports zero trend, and a zero mean reports zero volatility.
pub fn price_history_stats(points: &[PricePoint]) -> Computation<PriceHistoryStats> {
    if points.is_empty() {
        return Err(InsufficientInput::EmptySeries);
    }

    let mut ordered = points.to_vec();
    ordered.sort_by_key(|point| point.at);

    let prices: Vec<f64> = ordered.iter().map(|point| point.price).collect();
    ensure_finite(&prices)?;
    if prices.iter().any(|price| *price < 0.0) {
        return Err(InsufficientInput::NegativePrice);
    }

    let samples = prices.len();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = prices.iter().sum::<f64>() / samples as f64;

    let first = prices[0];
    let last = prices[samples - 1];
    let trend_percent = if samples < 2 || first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    };

    let volatility_percent = if samples < 2 || mean == 0.0 || min == max {
        0.0
    } else {
        let variance = prices
            .iter()
            .map(|price| (price - mean).powi(2))
            .sum::<f64>()
            / samples as f64;
        variance.sqrt() / mean * 100.0
    };

    Ok(PriceHistoryStats {
        samples,
        min,
        max,
        mean,
        trend_percent,
        volatility_percent,
    })
}
