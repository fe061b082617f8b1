use super::domain::{Listing, ListingId, PropertyKind};
use crate::engine::{EnergyGrade, SamplingError, WeightedChoice};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityProfile {
    pub name: String,
    pub base_price_per_area: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindTemplate {
    pub kind: PropertyKind,
    pub weight: f64,
    pub min_surface: f64,
    pub max_surface: f64,
    pub price_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeTemplate {
    pub grade: EnergyGrade,
    pub weight: f64,
    pub consumption: (f64, f64),
    pub emissions: (f64, f64),
    /// Price premium (or discount) attached to the grade.
    pub price_factor: f64,
}

/// Typed seed data for the demo listing generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticTemplates {
    pub cities: Vec<CityProfile>,
    pub kinds: Vec<KindTemplate>,
    pub grades: Vec<GradeTemplate>,
    pub first_listed_on: NaiveDate,
    pub listing_window_days: u32,
}

impl SyntheticTemplates {
    pub fn standard() -> Self {
        let city = |name: &str, base_price_per_area: f64, weight: f64| CityProfile {
            name: name.to_string(),
            base_price_per_area,
            weight,
        };
        let kind = |kind, weight, min_surface, max_surface, price_multiplier| KindTemplate {
            kind,
            weight,
            min_surface,
            max_surface,
            price_multiplier,
        };
        let grade = |grade, weight, consumption, emissions, price_factor| GradeTemplate {
            grade,
            weight,
            consumption,
            emissions,
            price_factor,
        };

        Self {
            cities: vec![
                city("Paris", 10_400.0, 5.0),
                city("Lyon", 5_100.0, 3.0),
                city("Bordeaux", 4_700.0, 2.0),
                city("Marseille", 3_700.0, 2.0),
                city("Nantes", 3_900.0, 1.5),
                city("Lille", 3_500.0, 1.5),
                city("Annecy", 5_600.0, 0.5),
            ],
            kinds: vec![
                kind(PropertyKind::Studio, 2.0, 16.0, 32.0, 1.15),
                kind(PropertyKind::Apartment, 5.0, 35.0, 110.0, 1.0),
                kind(PropertyKind::Loft, 0.8, 70.0, 160.0, 1.1),
                kind(PropertyKind::House, 2.5, 80.0, 200.0, 0.85),
                kind(PropertyKind::Villa, 0.5, 150.0, 320.0, 1.2),
            ],
            grades: vec![
                grade(EnergyGrade::A, 0.5, (20.0, 50.0), (1.0, 5.0), 1.08),
                grade(EnergyGrade::B, 1.0, (51.0, 90.0), (6.0, 10.0), 1.05),
                grade(EnergyGrade::C, 2.5, (91.0, 150.0), (11.0, 20.0), 1.02),
                grade(EnergyGrade::D, 3.0, (151.0, 230.0), (21.0, 35.0), 1.0),
                grade(EnergyGrade::E, 2.0, (231.0, 330.0), (36.0, 55.0), 0.96),
                grade(EnergyGrade::F, 0.7, (331.0, 450.0), (56.0, 80.0), 0.92),
                grade(EnergyGrade::G, 0.3, (451.0, 600.0), (81.0, 110.0), 0.88),
            ],
            first_listed_on: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            listing_window_days: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),
    #[error("template range for {field} is invalid ({min} to {max})")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("city {0} has a non-positive base price per area")]
    InvalidBasePrice(String),
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), TemplateError> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        Err(TemplateError::InvalidRange { field, min, max })
    }
}

/// Deterministic demo-listing source; the same seed yields the same listings.
pub struct ListingGenerator {
    cities: WeightedChoice<CityProfile>,
    kinds: WeightedChoice<KindTemplate>,
    grades: WeightedChoice<GradeTemplate>,
    first_listed_on: NaiveDate,
    listing_window_days: u32,
    rng: StdRng,
    sequence: u32,
}

impl ListingGenerator {
    pub fn new(templates: SyntheticTemplates, seed: u64) -> Result<Self, TemplateError> {
        for city in &templates.cities {
            if !city.base_price_per_area.is_finite() || city.base_price_per_area <= 0.0 {
                return Err(TemplateError::InvalidBasePrice(city.name.clone()));
            }
        }
        for kind in &templates.kinds {
            check_range("surface", kind.min_surface, kind.max_surface)?;
            if kind.min_surface <= 0.0 {
                return Err(TemplateError::InvalidRange {
                    field: "surface",
                    min: kind.min_surface,
                    max: kind.max_surface,
                });
            }
        }
        for grade in &templates.grades {
            check_range("consumption", grade.consumption.0, grade.consumption.1)?;
            check_range("emissions", grade.emissions.0, grade.emissions.1)?;
        }

        let cities = WeightedChoice::new(
            templates
                .cities
                .into_iter()
                .map(|city| {
                    let weight = city.weight;
                    (city, weight)
                })
                .collect(),
        )?;
        let kinds = WeightedChoice::new(
            templates
                .kinds
                .into_iter()
                .map(|kind| {
                    let weight = kind.weight;
                    (kind, weight)
                })
                .collect(),
        )?;
        let grades = WeightedChoice::new(
            templates
                .grades
                .into_iter()
                .map(|grade| {
                    let weight = grade.weight;
                    (grade, weight)
                })
                .collect(),
        )?;

        Ok(Self {
            cities,
            kinds,
            grades,
            first_listed_on: templates.first_listed_on,
            listing_window_days: templates.listing_window_days,
            rng: StdRng::seed_from_u64(seed),
            sequence: 0,
        })
    }

    pub fn standard(seed: u64) -> Result<Self, TemplateError> {
        Self::new(SyntheticTemplates::standard(), seed)
    }

    pub fn next_listing(&mut self) -> Listing {
        self.sequence += 1;

        let city = self.cities.sample(&mut self.rng).clone();
        let kind = self.kinds.sample(&mut self.rng).clone();
        let grade = self.grades.sample(&mut self.rng).clone();

        let surface = self
            .rng
            .gen_range(kind.min_surface..=kind.max_surface)
            .round()
            .max(1.0);
        let rooms = ((surface / 22.0).round() as u8).clamp(1, 12);
        let consumption = self
            .rng
            .gen_range(grade.consumption.0..=grade.consumption.1)
            .round();
        let emissions = self
            .rng
            .gen_range(grade.emissions.0..=grade.emissions.1)
            .round();
        let jitter = self.rng.gen_range(0.9..=1.1);
        let raw_price = city.base_price_per_area
            * kind.price_multiplier
            * grade.price_factor
            * surface
            * jitter;
        let price = (raw_price / 1_000.0).round() * 1_000.0;
        let offset = if self.listing_window_days == 0 {
            0
        } else {
            self.rng.gen_range(0..self.listing_window_days)
        };

        Listing {
            id: ListingId(format!("demo-{:05}", self.sequence)),
            title: format!(
                "{} {} m² in {} ({} room{})",
                kind.kind.label(),
                surface,
                city.name,
                rooms,
                if rooms == 1 { "" } else { "s" }
            ),
            city: city.name,
            kind: kind.kind,
            price,
            surface_area: surface,
            rooms,
            energy_consumption: Some(consumption),
            emissions: Some(emissions),
            listed_on: self.first_listed_on + Duration::days(i64::from(offset)),
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<Listing> {
        (0..count).map(|_| self.next_listing()).collect()
    }
}
