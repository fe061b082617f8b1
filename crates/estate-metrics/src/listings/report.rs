use super::domain::Listing;
use crate::engine::{EnergyGrade, MetricsEngine, MobilityScoreSet};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeShare {
    pub grade: EnergyGrade,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMarketEntry {
    pub city: String,
    pub listings: usize,
    pub mean_price: f64,
    pub mean_price_per_area: f64,
    pub min_price_per_area: f64,
    pub max_price_per_area: f64,
    pub energy_grades: Vec<GradeShare>,
    pub ungraded: usize,
    pub mobility: MobilityScoreSet,
}

/// Per-city aggregation of listing metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
    pub total_listings: usize,
    /// Listings without a computable price per area.
    pub skipped: usize,
    pub cities: Vec<CityMarketEntry>,
}

#[derive(Default)]
struct CityAccumulator {
    display_name: String,
    price_total: f64,
    price_per_area: Vec<f64>,
    grades: BTreeMap<EnergyGrade, usize>,
    ungraded: usize,
}

impl MarketReport {
    pub fn build(listings: &[Listing], engine: &MetricsEngine) -> Self {
        let mut by_city: BTreeMap<String, CityAccumulator> = BTreeMap::new();
        let mut skipped = 0;

        for listing in listings {
            let Ok(ppa) = engine.price_per_area(listing.price, listing.surface_area) else {
                skipped += 1;
                continue;
            };

            let key = listing.city.trim().to_lowercase();
            let entry = by_city.entry(key).or_insert_with(|| CityAccumulator {
                display_name: listing.city.trim().to_string(),
                ..CityAccumulator::default()
            });

            entry.price_total += listing.price;
            entry.price_per_area.push(ppa.exact);
            match engine.energy_rating(listing.energy_consumption, listing.emissions) {
                Ok(rating) => *entry.grades.entry(rating.letter_grade).or_default() += 1,
                Err(_) => entry.ungraded += 1,
            }
        }

        let cities = by_city
            .into_values()
            .map(|acc| {
                let count = acc.price_per_area.len();
                let ppa_total: f64 = acc.price_per_area.iter().sum();
                let min = acc
                    .price_per_area
                    .iter()
                    .copied()
                    .fold(f64::INFINITY, f64::min);
                let max = acc
                    .price_per_area
                    .iter()
                    .copied()
                    .fold(f64::NEG_INFINITY, f64::max);

                CityMarketEntry {
                    mobility: engine.policy().mobility.lookup(&acc.display_name),
                    city: acc.display_name,
                    listings: count,
                    mean_price: acc.price_total / count as f64,
                    mean_price_per_area: ppa_total / count as f64,
                    min_price_per_area: min,
                    max_price_per_area: max,
                    energy_grades: acc
                        .grades
                        .into_iter()
                        .map(|(grade, count)| GradeShare { grade, count })
                        .collect(),
                    ungraded: acc.ungraded,
                }
            })
            .collect();

        Self {
            total_listings: listings.len(),
            skipped,
            cities,
        }
    }

    pub fn city(&self, name: &str) -> Option<&CityMarketEntry> {
        self.cities
            .iter()
            .find(|entry| entry.city.eq_ignore_ascii_case(name.trim()))
    }
}
