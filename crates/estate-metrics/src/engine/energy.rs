use super::banding::{Band, BandDirection, BandError, ThresholdBands};
use super::outcome::{Computation, InsufficientInput};
use serde::{Deserialize, Serialize};

/// DPE/GES letter grade. `A` is the best band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnergyGrade {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl EnergyGrade {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::A,
            Self::B,
            Self::C,
            Self::D,
            Self::E,
            Self::F,
            Self::G,
        ]
    }

    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
        }
    }

    /// Colour of the grade's band on the regulatory label.
    pub const fn color(self) -> &'static str {
        match self {
            Self::A => "#009c6d",
            Self::B => "#52b153",
            Self::C => "#78bd76",
            Self::D => "#f4e70f",
            Self::E => "#f0b50f",
            Self::F => "#eb8235",
            Self::G => "#d7221f",
        }
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|grade| grade.letter().eq_ignore_ascii_case(letter.trim()))
    }
}

/// Independent A-G tables for the consumption and emissions axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPolicy {
    pub consumption: ThresholdBands<EnergyGrade>,
    pub emissions: ThresholdBands<EnergyGrade>,
}

impl EnergyPolicy {
    /// kWh/m²/yr and kg CO₂/m²/yr thresholds of the French DPE/GES labels.
    pub fn standard() -> Self {
        let consumption = grade_table([50.0, 90.0, 150.0, 230.0, 330.0, 450.0]);
        let emissions = grade_table([5.0, 10.0, 20.0, 35.0, 55.0, 80.0]);
        Self {
            consumption,
            emissions,
        }
    }

    pub fn from_upper_bounds(
        consumption: [f64; 6],
        emissions: [f64; 6],
    ) -> Result<Self, BandError> {
        Ok(Self {
            consumption: try_grade_table(consumption)?,
            emissions: try_grade_table(emissions)?,
        })
    }

    /// Both axes run at-most, with grades worsening from A toward G.
    pub fn validate(&self) -> Result<(), BandError> {
        self.consumption.validate_graded(BandDirection::AtMost)?;
        self.emissions.validate_graded(BandDirection::AtMost)
    }

    pub fn grade_consumption(&self, kwh_per_area_year: f64) -> Computation<EnergyGrade> {
        grade_measurement(&self.consumption, kwh_per_area_year)
    }

    pub fn grade_emissions(&self, co2_per_area_year: f64) -> Computation<EnergyGrade> {
        grade_measurement(&self.emissions, co2_per_area_year)
    }

    /// Grades either or both axes. The overall letter is the worse of the two.
    pub fn rate(
        &self,
        consumption: Option<f64>,
        emissions: Option<f64>,
    ) -> Computation<EnergyRating> {
        let consumption_grade = consumption
            .map(|value| self.grade_consumption(value))
            .transpose()?;
        let emissions_grade = emissions
            .map(|value| self.grade_emissions(value))
            .transpose()?;

        let letter_grade = match (consumption_grade, emissions_grade) {
            (Some(energy), Some(co2)) => energy.max(co2),
            (Some(grade), None) | (None, Some(grade)) => grade,
            (None, None) => return Err(InsufficientInput::MissingMeasurement),
        };

        Ok(EnergyRating {
            letter_grade,
            color: letter_grade.color(),
            numeric_score: consumption,
            co2_per_area_per_year: emissions,
            consumption_grade,
            emissions_grade,
        })
    }
}

impl Default for EnergyPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn grade_measurement(table: &ThresholdBands<EnergyGrade>, value: f64) -> Computation<EnergyGrade> {
    if !value.is_finite() {
        return Err(InsufficientInput::NonFinite);
    }
    if value < 0.0 {
        return Err(InsufficientInput::NegativeMeasurement);
    }
    Ok(*table.classify(value))
}

fn grade_bands(upper_bounds: [f64; 6]) -> Vec<Band<EnergyGrade>> {
    EnergyGrade::ordered()
        .into_iter()
        .zip(upper_bounds)
        .map(|(grade, bound)| Band::new(bound, grade))
        .collect()
}

fn try_grade_table(upper_bounds: [f64; 6]) -> Result<ThresholdBands<EnergyGrade>, BandError> {
    ThresholdBands::new(
        BandDirection::AtMost,
        grade_bands(upper_bounds),
        EnergyGrade::G,
    )
}

fn grade_table(upper_bounds: [f64; 6]) -> ThresholdBands<EnergyGrade> {
    ThresholdBands::from_trusted(
        BandDirection::AtMost,
        grade_bands(upper_bounds),
        EnergyGrade::G,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyRating {
    pub letter_grade: EnergyGrade,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_per_area_per_year: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption_grade: Option<EnergyGrade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissions_grade: Option<EnergyGrade>,
}
